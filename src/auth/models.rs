//! Authentication data models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Access token lifetime in seconds (15 minutes)
pub const ACCESS_TOKEN_EXPIRY: i64 = 15 * 60;
/// Refresh token lifetime in seconds (7 days)
pub const REFRESH_TOKEN_EXPIRY: i64 = 7 * 24 * 60 * 60;

/// User database model
#[derive(FromRow, Serialize, Deserialize, Debug, Clone)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub avatar_url: Option<String>,
    pub created_at: Option<String>,
}

/// Normalized provider identity, the common shape both providers reduce to
#[derive(Debug, Clone, PartialEq)]
pub struct OAuthData {
    pub provider: String,
    pub provider_user_id: String,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
}

/// Claims carried by the access token. Profile fields are denormalized so
/// authenticated requests never need a store round-trip.
#[derive(Serialize, Deserialize, Debug)]
pub struct AccessClaims {
    pub typ: String,
    pub sub: String,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
    pub name: String,
    pub email: String,
    #[serde(rename = "avatarUrl")]
    pub avatar_url: Option<String>,
}

/// Claims carried by the refresh token; subject only
#[derive(Serialize, Deserialize, Debug)]
pub struct RefreshClaims {
    pub typ: String,
    pub sub: String,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

/// A freshly issued access/refresh pair
#[derive(Serialize, Debug)]
pub struct TokenPair {
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
}
