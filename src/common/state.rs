// Application state shared across all modules

use reqwest::Client;
use sqlx::SqlitePool;
use std::sync::Arc;

use super::config::AppConfig;
use crate::services::{GitHubOAuth, GoogleOAuth};

/// Application state containing the database pool, configuration and the
/// provider OAuth clients
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    pub google: GoogleOAuth,
    pub github: GitHubOAuth,
}

impl AppState {
    /// Both provider clients share one HTTP client's connection pool
    pub fn new(db: SqlitePool, http: Client, config: AppConfig) -> Self {
        let google = GoogleOAuth::new(config.google.clone(), http.clone());
        let github = GitHubOAuth::new(config.github.clone(), http);
        Self {
            db,
            config: Arc::new(config),
            google,
            github,
        }
    }
}
