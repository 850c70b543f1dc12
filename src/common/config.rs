// Process-wide configuration, loaded once at startup

use anyhow::Context;
use std::env;

/// OAuth client credentials for one provider
#[derive(Debug, Clone)]
pub struct OAuthCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

/// Immutable application configuration
///
/// Built once in `main` from the environment and injected through
/// `AppState`. No other component reads environment variables directly.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    /// Canonical base URL of this API, used as the JWT `iss` claim and to
    /// derive the OAuth redirect URIs
    pub api_url: String,
    /// Canonical frontend URL, used as the JWT `aud` claim and as the
    /// post-login redirect target
    pub frontend_url: String,
    /// Apex domain the auth cookies are scoped to
    pub cookie_domain: String,
    /// Shared HS256 signing secret for both token types
    pub jwt_secret: String,
    pub google: OAuthCredentials,
    pub github: OAuthCredentials,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://shortlink.db".to_string());
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(8080);

        let api_url = env::var("API_URL").context("API_URL must be set")?;
        let frontend_url = env::var("FRONTEND_URL").context("FRONTEND_URL must be set")?;
        let cookie_domain = env::var("DOMAIN").context("DOMAIN must be set")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET must be set")?;

        let google = OAuthCredentials {
            client_id: env::var("GOOGLE_CLIENT_ID").context("GOOGLE_CLIENT_ID must be set")?,
            client_secret: env::var("GOOGLE_CLIENT_SECRET")
                .context("GOOGLE_CLIENT_SECRET must be set")?,
            redirect_uri: format!("{}/auth/google/callback", api_url),
        };
        let github = OAuthCredentials {
            client_id: env::var("GITHUB_CLIENT_ID").context("GITHUB_CLIENT_ID must be set")?,
            client_secret: env::var("GITHUB_CLIENT_SECRET")
                .context("GITHUB_CLIENT_SECRET must be set")?,
            redirect_uri: format!("{}/auth/github/callback", api_url),
        };

        Ok(Self {
            database_url,
            port,
            api_url,
            frontend_url,
            cookie_domain,
            jwt_secret,
            google,
            github,
        })
    }

    /// Post-login redirect target
    pub fn dashboard_url(&self) -> String {
        format!("{}/dashboard", self.frontend_url)
    }
}
