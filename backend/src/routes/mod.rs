//! Route definitions for the BioGarden API

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
///
/// Everything except health and authentication requires a bearer token.
pub fn api_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/auth/me", get(handlers::current_user))
        .nest("/users", user_routes())
        .nest("/lots", lot_routes())
        .nest("/crops", crop_routes())
        .nest("/projects", project_routes())
        .nest("/cultivations", cultivation_routes())
        .nest("/activities", activity_routes())
        .nest("/reports", report_routes())
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes (public)
        .nest("/auth", auth_routes())
        .merge(protected)
}

/// Authentication routes (public)
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
}

fn user_routes() -> Router<AppState> {
    Router::new().route("/farmers", get(handlers::list_farmers))
}

/// Lot management routes
fn lot_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_lots).post(handlers::create_lot))
        .route("/:lot_id", get(handlers::get_lot))
        .route("/:lot_id/projects", get(handlers::list_lot_projects))
}

fn crop_routes() -> Router<AppState> {
    Router::new().route("/", get(handlers::list_crops).post(handlers::create_crop))
}

/// Project and cultivation routes
fn project_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_projects).post(handlers::create_project))
        .route("/:project_id", get(handlers::get_project))
        .route(
            "/:project_id/cultivations",
            get(handlers::list_cultivations).post(handlers::add_cultivation),
        )
}

fn cultivation_routes() -> Router<AppState> {
    Router::new()
        .route("/:cultivation_id", get(handlers::get_cultivation))
        .route(
            "/:cultivation_id/activities",
            get(handlers::list_activities).post(handlers::record_activity),
        )
}

/// Activity routes
fn activity_routes() -> Router<AppState> {
    Router::new().route(
        "/:activity_id",
        put(handlers::update_activity).delete(handlers::delete_activity),
    )
}

/// Reporting routes
fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/harvest", get(handlers::get_harvest_report))
        .route("/dashboard", get(handlers::get_dashboard))
}
