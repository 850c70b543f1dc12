// src/auth/routes.rs

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;

/// Create the auth router with session and OAuth flow routes
pub fn auth_routes() -> Router {
    Router::new()
        // Session endpoints
        .route("/auth/me", get(handlers::me_handler))
        .route("/auth/refresh", post(handlers::refresh_handler))
        // Google OAuth (PKCE)
        .route("/auth/google", get(handlers::google_start))
        .route("/auth/google/callback", get(handlers::google_callback))
        // GitHub OAuth
        .route("/auth/github", get(handlers::github_start))
        .route("/auth/github/callback", get(handlers::github_callback))
}
