use rusqlite::Connection;

use crate::error::AppError;

/// Create the schema. Every statement is idempotent so this runs on each start.
pub fn run(conn: &Connection) -> Result<(), AppError> {
    tracing::debug!("Running database migrations");

    conn.execute_batch(SCHEMA)?;

    tracing::info!("Database migrations complete");
    Ok(())
}

// `garments` keeps its implicit rowid: listing orders by it, which is
// insertion order.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS garments (
    id          TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    category    TEXT NOT NULL,
    color       TEXT NOT NULL,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_garments_category ON garments(category);
"#;
