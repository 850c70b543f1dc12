//! # Provider Services Module
//!
//! OAuth2 clients for the configured identity providers and the
//! normalization of their differing claim shapes into one `OAuthData`.

pub mod github;
pub mod google;

use thiserror::Error;

use crate::auth::models::OAuthData;
use crate::common::ApiError;
use github::{GitHubEmail, GitHubProfile};
use google::GoogleIdClaims;

pub use github::GitHubOAuth;
pub use google::GoogleOAuth;

/// Errors surfaced by the provider clients
///
/// `Protocol` and `Transport` map to the documented 400 responses; every
/// other variant is an internal-error class for the callback pipeline.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider rejected the exchange at the OAuth protocol level;
    /// carries the provider's error code
    #[error("OAuth protocol error: {0}")]
    Protocol(String),

    /// Network or transport failure reaching the provider
    #[error("fetch failed: {0}")]
    Transport(String),

    #[error("Email not verified")]
    EmailNotVerified,

    #[error("no verified email on provider account")]
    NoVerifiedEmail,

    #[error("malformed provider response: {0}")]
    Malformed(String),
}

impl From<ProviderError> for ApiError {
    fn from(e: ProviderError) -> Self {
        match e {
            ProviderError::Protocol(code) => ApiError::OAuthProtocol(code),
            ProviderError::Transport(msg) => ApiError::OAuthTransport(msg),
            other => ApiError::InternalServer(other.to_string()),
        }
    }
}

/// Provider-asserted identity, one closed variant per configured provider
#[derive(Debug)]
pub enum ProviderProfile {
    Google(GoogleIdClaims),
    GitHub {
        profile: GitHubProfile,
        emails: Vec<GitHubEmail>,
    },
}

impl ProviderProfile {
    /// Pure normalization into the common `OAuthData` shape.
    ///
    /// Google requires a verified email claim. GitHub picks the
    /// primary+verified email, falling back to the first verified one.
    pub fn normalize(self) -> Result<OAuthData, ProviderError> {
        match self {
            ProviderProfile::Google(claims) => {
                if !claims.email_verified {
                    return Err(ProviderError::EmailNotVerified);
                }
                Ok(OAuthData {
                    provider: "google".to_string(),
                    provider_user_id: claims.sub,
                    name: claims.name,
                    email: claims.email,
                    avatar_url: claims.picture,
                })
            }
            ProviderProfile::GitHub { profile, emails } => {
                let email = emails
                    .iter()
                    .find(|e| e.primary && e.verified)
                    .or_else(|| emails.iter().find(|e| e.verified))
                    .map(|e| e.email.clone())
                    .ok_or(ProviderError::NoVerifiedEmail)?;

                Ok(OAuthData {
                    provider: "github".to_string(),
                    provider_user_id: profile.id.to_string(),
                    name: profile.name.unwrap_or(profile.login),
                    email,
                    avatar_url: profile.avatar_url,
                })
            }
        }
    }
}
