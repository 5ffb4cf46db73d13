//! Crop catalogue HTTP handlers

use axum::{extract::State, http::StatusCode, Extension, Json};

use shared::models::Crop;

use crate::error::AppResult;
use crate::middleware::{AuthUser, JsonBody};
use crate::services::crop::{CreateCropInput, CropService};
use crate::AppState;

pub async fn list_crops(State(state): State<AppState>) -> AppResult<Json<Vec<Crop>>> {
    let service = CropService::new(state.store.clone());
    Ok(Json(service.list_crops().await?))
}

pub async fn create_crop(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    JsonBody(input): JsonBody<CreateCropInput>,
) -> AppResult<(StatusCode, Json<Crop>)> {
    user.require_owner()?;
    let service = CropService::new(state.store.clone());
    let crop = service.create_crop(input).await?;
    Ok((StatusCode::CREATED, Json(crop)))
}
