//! User directory handlers

use axum::{extract::State, Json};

use shared::models::User;

use crate::error::AppResult;
use crate::services::AuthService;
use crate::AppState;

/// List farmers that activities can be assigned to
pub async fn list_farmers(State(state): State<AppState>) -> AppResult<Json<Vec<User>>> {
    let service = AuthService::new(state.store.clone(), &state.config.auth);
    Ok(Json(service.list_farmers().await?))
}
