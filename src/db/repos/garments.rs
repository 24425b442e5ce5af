use rusqlite::{params, Connection, Row, TransactionBehavior};

use crate::db::models::{CreateGarmentInput, Garment, UpdateGarmentInput};
use crate::db::DbPool;
use crate::error::AppError;
use crate::validation::{require_non_empty, require_non_empty_if_present};

fn row_to_garment(row: &Row) -> rusqlite::Result<Garment> {
    Ok(Garment {
        id: row.get("id")?,
        name: row.get("name")?,
        category: row.get("category")?,
        color: row.get("color")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn fetch(conn: &Connection, id: &str) -> Result<Garment, AppError> {
    conn.query_row(
        "SELECT * FROM garments WHERE id = ?1",
        params![id],
        row_to_garment,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => AppError::NotFound(format!("Garment ID '{id}'")),
        other => AppError::Database(other),
    })
}

/// All garments in insertion order.
pub fn get_all(pool: &DbPool) -> Result<Vec<Garment>, AppError> {
    let conn = pool.get()?;
    let mut stmt = conn.prepare("SELECT * FROM garments ORDER BY rowid")?;
    let rows = stmt.query_map([], row_to_garment)?;
    let results: Vec<Garment> = rows.collect::<Result<Vec<_>, _>>()?;
    Ok(results)
}

pub fn create(pool: &DbPool, input: CreateGarmentInput) -> Result<Garment, AppError> {
    require_non_empty("name", &input.name)?;
    require_non_empty("category", &input.category)?;
    require_non_empty("color", &input.color)?;

    let id = uuid::Uuid::new_v4().to_string();
    let now = chrono::Utc::now().to_rfc3339();

    let conn = pool.get()?;
    conn.execute(
        "INSERT INTO garments (id, name, category, color, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
        params![id, input.name, input.category, input.color, now],
    )?;

    tracing::debug!(garment_id = %id, "Garment created");
    fetch(&conn, &id)
}

/// Apply only the fields present in `input`.
///
/// The existence check and the write share one IMMEDIATE transaction, so a
/// concurrent delete cannot land between them.
pub fn update(pool: &DbPool, id: &str, input: UpdateGarmentInput) -> Result<Garment, AppError> {
    if input.is_empty() {
        return Err(AppError::Validation("No fields provided for update".into()));
    }
    require_non_empty_if_present("name", input.name.as_deref())?;
    require_non_empty_if_present("category", input.category.as_deref())?;
    require_non_empty_if_present("color", input.color.as_deref())?;

    let now = chrono::Utc::now().to_rfc3339();
    let mut conn = pool.get()?;
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    // Verify exists
    fetch(&tx, id)?;

    // Build dynamic SET clause
    let mut sets: Vec<String> = vec!["updated_at = ?1".into()];
    let mut param_idx = 2u32;

    push_field!(input.name, "name", sets, param_idx);
    push_field!(input.category, "category", sets, param_idx);
    push_field!(input.color, "color", sets, param_idx);

    let sql = format!(
        "UPDATE garments SET {} WHERE id = ?{}",
        sets.join(", "),
        param_idx
    );

    let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = vec![Box::new(now)];
    if let Some(v) = input.name {
        param_values.push(Box::new(v));
    }
    if let Some(v) = input.category {
        param_values.push(Box::new(v));
    }
    if let Some(v) = input.color {
        param_values.push(Box::new(v));
    }
    param_values.push(Box::new(id.to_string()));

    let params_ref: Vec<&dyn rusqlite::types::ToSql> =
        param_values.iter().map(|p| p.as_ref()).collect();
    tx.execute(&sql, params_ref.as_slice())?;

    let updated = fetch(&tx, id)?;
    tx.commit()?;

    tracing::debug!(garment_id = %id, "Garment updated");
    Ok(updated)
}

/// Delete by id. Returns whether a row was removed; a missing id is not an error.
pub fn delete(pool: &DbPool, id: &str) -> Result<bool, AppError> {
    let conn = pool.get()?;
    let rows = conn.execute("DELETE FROM garments WHERE id = ?1", params![id])?;
    Ok(rows > 0)
}
