//! Route definitions for the JoeView HTTP API.
//!
//! All routes are mounted under `/api`. The router receives `AppState` and
//! passes it to handlers via Axum's `State` extractor.

use axum::{Router, routing::get};

use crate::handlers;
use crate::state::AppState;

/// Build the API router with all routes bound to `state`.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new().merge(admin_routes()).merge(health_routes());

    Router::new().nest("/api", api_routes).with_state(state)
}

/// Admin endpoints
fn admin_routes() -> Router<AppState> {
    Router::new().route("/admin/users", get(handlers::admin::users::list_users))
}

/// Health endpoints
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
