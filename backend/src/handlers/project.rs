//! Project and cultivation HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use shared::models::{Cultivation, ProjectOverview};

use crate::error::AppResult;
use crate::middleware::{AuthUser, JsonBody};
use crate::services::project::{AddCultivationInput, CreateProjectInput, ProjectService};
use crate::AppState;

/// List all projects
pub async fn list_projects(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ProjectOverview>>> {
    let service = ProjectService::new(state.store.clone());
    Ok(Json(service.list_projects().await?))
}

/// Create a project on one of the caller's lots
pub async fn create_project(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    JsonBody(input): JsonBody<CreateProjectInput>,
) -> AppResult<(StatusCode, Json<ProjectOverview>)> {
    user.require_owner()?;
    let service = ProjectService::new(state.store.clone());
    let project = service.create_project(user.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// Get a specific project
pub async fn get_project(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
) -> AppResult<Json<ProjectOverview>> {
    let service = ProjectService::new(state.store.clone());
    let project = service.get_project(project_id).await?;
    Ok(Json(ProjectOverview::new(project, chrono::Utc::now().date_naive())))
}

/// List the cultivations of a project
pub async fn list_cultivations(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
) -> AppResult<Json<Vec<Cultivation>>> {
    let service = ProjectService::new(state.store.clone());
    Ok(Json(service.list_cultivations(project_id).await?))
}

/// Add a cultivation of a crop to a project
pub async fn add_cultivation(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(project_id): Path<Uuid>,
    JsonBody(input): JsonBody<AddCultivationInput>,
) -> AppResult<(StatusCode, Json<Cultivation>)> {
    user.require_owner()?;
    let service = ProjectService::new(state.store.clone());
    let cultivation = service.add_cultivation(project_id, input).await?;
    Ok((StatusCode::CREATED, Json(cultivation)))
}

pub async fn get_cultivation(
    State(state): State<AppState>,
    Path(cultivation_id): Path<Uuid>,
) -> AppResult<Json<Cultivation>> {
    let service = ProjectService::new(state.store.clone());
    Ok(Json(service.get_cultivation(cultivation_id).await?))
}
