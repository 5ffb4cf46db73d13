//! Activity HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use shared::models::{Activity, ActivityPatch};

use crate::error::AppResult;
use crate::middleware::{AuthUser, JsonBody};
use crate::services::activity::{ActivityService, RecordActivityInput};
use crate::AppState;

/// List the activities of a cultivation
pub async fn list_activities(
    State(state): State<AppState>,
    Path(cultivation_id): Path<Uuid>,
) -> AppResult<Json<Vec<Activity>>> {
    let service = ActivityService::new(state.store.clone());
    Ok(Json(service.list_activities(cultivation_id).await?))
}

/// Record a new activity
pub async fn record_activity(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(cultivation_id): Path<Uuid>,
    JsonBody(input): JsonBody<RecordActivityInput>,
) -> AppResult<(StatusCode, Json<Activity>)> {
    let service = ActivityService::new(state.store.clone());
    let activity = service
        .record_activity(user.user_id, cultivation_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(activity)))
}

/// Update an activity
pub async fn update_activity(
    State(state): State<AppState>,
    Path(activity_id): Path<Uuid>,
    JsonBody(patch): JsonBody<ActivityPatch>,
) -> AppResult<Json<Activity>> {
    let service = ActivityService::new(state.store.clone());
    Ok(Json(service.update_activity(activity_id, patch).await?))
}

/// Delete an activity
pub async fn delete_activity(
    State(state): State<AppState>,
    Path(activity_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let service = ActivityService::new(state.store.clone());
    service.delete_activity(activity_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
