// src/dashboard/routes.rs

use axum::{routing::get, Router};

use super::handlers;

/// Create the dashboard router
pub fn dashboard_routes() -> Router {
    Router::new()
        .route("/dashboard/stats", get(handlers::get_stats))
        .route("/dashboard/analytics", get(handlers::get_analytics))
}
