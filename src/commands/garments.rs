use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db::models::{CreateGarmentInput, Garment, UpdateGarmentInput};
use crate::db::repos::garments as repo;
use crate::error::AppError;
use crate::AppState;

/// Public shape of a garment. Internal bookkeeping fields stay private.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GarmentResponse {
    pub id: String,
    pub name: String,
    pub category: String,
    pub color: String,
}

impl From<Garment> for GarmentResponse {
    fn from(g: Garment) -> Self {
        Self {
            id: g.id,
            name: g.name,
            category: g.category,
            color: g.color,
        }
    }
}

/// GET /api/garments
pub async fn list_garments(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<GarmentResponse>>, AppError> {
    let garments = repo::get_all(&state.db)?;
    Ok(Json(garments.into_iter().map(GarmentResponse::from).collect()))
}

/// POST /api/garments
pub async fn create_garment(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateGarmentInput>, JsonRejection>,
) -> Result<(StatusCode, Json<GarmentResponse>), AppError> {
    let Json(input) = payload?;
    let garment = repo::create(&state.db, input)?;
    tracing::info!(garment_id = %garment.id, "Garment added");
    Ok((StatusCode::CREATED, Json(garment.into())))
}

/// PUT /api/garments/{id}
pub async fn update_garment(
    State(state): State<Arc<AppState>>,
    Path(garment_id): Path<String>,
    payload: Result<Json<UpdateGarmentInput>, JsonRejection>,
) -> Result<Json<GarmentResponse>, AppError> {
    let Json(input) = payload?;
    let garment = repo::update(&state.db, &garment_id, input)?;
    Ok(Json(garment.into()))
}

/// DELETE /api/garments/{id}. 204 whether or not the id existed.
pub async fn delete_garment(
    State(state): State<Arc<AppState>>,
    Path(garment_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let removed = repo::delete(&state.db, &garment_id)?;
    tracing::info!(garment_id = %garment_id, removed, "Garment delete");
    Ok(StatusCode::NO_CONTENT)
}
