//! Authentication handlers

use axum::{extract::State, http::StatusCode, Extension, Json};

use shared::models::User;

use crate::error::AppResult;
use crate::middleware::{AuthUser, JsonBody};
use crate::services::auth::{AuthTokens, LoginInput, RegisterInput};
use crate::services::AuthService;
use crate::AppState;

/// Register endpoint handler
pub async fn register(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<RegisterInput>,
) -> AppResult<(StatusCode, Json<AuthTokens>)> {
    let auth_service = AuthService::new(state.store.clone(), &state.config.auth);
    let tokens = auth_service.register(body).await?;
    Ok((StatusCode::CREATED, Json(tokens)))
}

/// Login endpoint handler
pub async fn login(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<LoginInput>,
) -> AppResult<Json<AuthTokens>> {
    let auth_service = AuthService::new(state.store.clone(), &state.config.auth);
    let tokens = auth_service.login(body).await?;
    Ok(Json(tokens))
}

/// The authenticated caller's own profile
pub async fn current_user(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> AppResult<Json<User>> {
    let auth_service = AuthService::new(state.store.clone(), &state.config.auth);
    Ok(Json(auth_service.get_user(user.user_id).await?))
}
