//! Lot management HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use shared::models::{Lot, ProjectOverview};

use crate::error::AppResult;
use crate::middleware::{AuthUser, JsonBody};
use crate::services::lot::{CreateLotInput, LotService};
use crate::AppState;

/// List lots owned by the current user
pub async fn list_lots(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> AppResult<Json<Vec<Lot>>> {
    let service = LotService::new(state.store.clone());
    Ok(Json(service.list_lots(user.user_id).await?))
}

/// Create a lot
pub async fn create_lot(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    JsonBody(input): JsonBody<CreateLotInput>,
) -> AppResult<(StatusCode, Json<Lot>)> {
    user.require_owner()?;
    let service = LotService::new(state.store.clone());
    let lot = service.create_lot(user.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(lot)))
}

/// Get a specific lot
pub async fn get_lot(
    State(state): State<AppState>,
    Path(lot_id): Path<Uuid>,
) -> AppResult<Json<Lot>> {
    let service = LotService::new(state.store.clone());
    Ok(Json(service.get_lot(lot_id).await?))
}

/// List the projects of a lot
pub async fn list_lot_projects(
    State(state): State<AppState>,
    Path(lot_id): Path<Uuid>,
) -> AppResult<Json<Vec<ProjectOverview>>> {
    let service = LotService::new(state.store.clone());
    let today = chrono::Utc::now().date_naive();
    let projects = service
        .list_projects(lot_id)
        .await?
        .into_iter()
        .map(|p| ProjectOverview::new(p, today))
        .collect();
    Ok(Json(projects))
}
