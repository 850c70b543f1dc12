// src/profile/routes.rs

use axum::{routing::get, Router};

use super::handlers;

/// Create the profile router
pub fn profile_routes() -> Router {
    Router::new().route(
        "/user",
        get(handlers::get_profile).patch(handlers::update_profile),
    )
}
