// src/main.rs
use axum::{
    extract::Extension,
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use dotenv::dotenv;
use reqwest::Client;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

// ============================================================================
// MODULE IMPORTS
// ============================================================================

mod auth;
mod common;
mod dashboard;
mod links;
mod profile;
mod services;

use common::{AppConfig, AppState};

// ============================================================================
// MAIN APPLICATION ENTRY POINT
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = AppConfig::from_env()?;

    // ========================================================================
    // DATABASE SETUP
    // ========================================================================

    let connect_options =
        SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .connect_with(connect_options)
        .await?;

    common::migrations::run_migrations(&pool).await?;

    // ========================================================================
    // APPLICATION STATE
    // ========================================================================

    let http = Client::new();
    let cors = cors_layer(config.cookie_domain.clone());
    let port = config.port;

    let state = Arc::new(RwLock::new(AppState::new(pool, http, config)));

    // ========================================================================
    // ROUTER
    // ========================================================================

    let app = Router::new()
        .route("/", get(|| async { "OK" }))
        .merge(auth::auth_routes())
        .merge(links::links_routes())
        .merge(dashboard::dashboard_routes())
        .merge(profile::profile_routes())
        .layer(Extension(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// CORS for the frontend: credentials allowed, origins restricted to the
/// configured apex domain and its subdomains
fn cors_layer(domain: String) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(move |origin: &HeaderValue, _| {
            origin
                .to_str()
                .map(|o| origin_allowed(o, &domain))
                .unwrap_or(false)
        }))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}

/// True when the origin's host is the apex domain or one of its subdomains
fn origin_allowed(origin: &str, domain: &str) -> bool {
    let host = origin
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(origin);
    let host = host.split(':').next().unwrap_or(host);

    host == domain || host.ends_with(&format!(".{}", domain))
}

#[cfg(test)]
mod tests {
    use super::origin_allowed;

    #[test]
    fn test_origin_allowed_accepts_apex_and_subdomains() {
        assert!(origin_allowed("https://example.com", "example.com"));
        assert!(origin_allowed("https://app.example.com", "example.com"));
        assert!(origin_allowed("http://app.example.com:3000", "example.com"));
    }

    #[test]
    fn test_origin_allowed_rejects_lookalike_domains() {
        assert!(!origin_allowed("https://evilexample.com", "example.com"));
        assert!(!origin_allowed("https://example.com.evil.io", "example.com"));
        assert!(!origin_allowed("https://other.org", "example.com"));
    }
}
