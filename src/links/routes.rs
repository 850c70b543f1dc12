// src/links/routes.rs

use axum::{
    routing::{get, patch},
    Router,
};

use super::handlers;

/// Create the links router
pub fn links_routes() -> Router {
    Router::new()
        .route(
            "/links",
            get(handlers::list_links).post(handlers::create_link),
        )
        .route(
            "/links/:id",
            patch(handlers::update_link).delete(handlers::delete_link),
        )
}
