//! Identity resolution and token issuance

use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use sqlx::SqlitePool;
use tracing::{debug, info};

use super::models::{
    AccessClaims, OAuthData, RefreshClaims, TokenPair, User, ACCESS_TOKEN_EXPIRY,
    REFRESH_TOKEN_EXPIRY,
};
use crate::common::{safe_email_log, ApiError, AppConfig};

/// Resolves a provider-asserted identity to a durable user, creating the
/// user and the provider account link as needed.
///
/// Race safety comes from the store's unique constraints, not from any
/// in-process lock: the insert is a no-op on an email conflict and the
/// loser falls through to the read-back, so concurrent first logins from
/// two providers still converge on a single user row.
pub async fn upsert_oauth_user(pool: &SqlitePool, data: &OAuthData) -> Result<User, sqlx::Error> {
    let inserted = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (email, name, avatar_url)
        VALUES (?, ?, ?)
        ON CONFLICT (email) DO NOTHING
        RETURNING *
        "#,
    )
    .bind(&data.email)
    .bind(&data.name)
    .bind(&data.avatar_url)
    .fetch_optional(pool)
    .await?;

    let user = match inserted {
        Some(user) => {
            info!(
                user_id = user.id,
                email = %safe_email_log(&user.email),
                provider = %data.provider,
                "Created new user from OAuth login"
            );
            user
        }
        None => {
            // Email already existed; read back the winning row
            debug!(
                email = %safe_email_log(&data.email),
                provider = %data.provider,
                "Email already registered, linking provider to existing user"
            );
            sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ? LIMIT 1")
                .bind(&data.email)
                .fetch_one(pool)
                .await?
        }
    };

    // Idempotent: repeat logins from the same provider identity are no-ops
    sqlx::query(
        r#"
        INSERT INTO accounts (user_id, provider, provider_user_id)
        VALUES (?, ?, ?)
        ON CONFLICT (provider, provider_user_id) DO NOTHING
        "#,
    )
    .bind(user.id)
    .bind(&data.provider)
    .bind(&data.provider_user_id)
    .execute(pool)
    .await?;

    Ok(user)
}

/// Mints an access/refresh pair for a resolved user. Pure derivation, no
/// persistence: both tokens are HS256-signed with the shared secret, with
/// `iss` set to the API URL and `aud` to the frontend URL.
pub fn generate_token(
    config: &AppConfig,
    user: &User,
) -> Result<TokenPair, jsonwebtoken::errors::Error> {
    let now = Utc::now().timestamp();
    let key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
    let header = Header::new(Algorithm::HS256);

    let access_claims = AccessClaims {
        typ: "access".to_string(),
        sub: user.id.to_string(),
        iss: config.api_url.clone(),
        aud: config.frontend_url.clone(),
        iat: now,
        exp: now + ACCESS_TOKEN_EXPIRY,
        name: user.name.clone(),
        email: user.email.clone(),
        avatar_url: user.avatar_url.clone(),
    };
    let access_token = encode(&header, &access_claims, &key)?;

    let refresh_claims = RefreshClaims {
        typ: "refresh".to_string(),
        sub: user.id.to_string(),
        iss: config.api_url.clone(),
        aud: config.frontend_url.clone(),
        iat: now,
        exp: now + REFRESH_TOKEN_EXPIRY,
    };
    let refresh_token = encode(&header, &refresh_claims, &key)?;

    Ok(TokenPair {
        access_token,
        refresh_token,
    })
}

fn hs256_validation(audience: &str) -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[audience]);
    validation
}

/// Verifies an access token.
///
/// Expiry maps to its own 401; any other verification failure maps to the
/// 500 path. The conflation is the documented contract - do not "fix" the
/// status codes here.
pub fn verify_access_token(config: &AppConfig, token: &str) -> Result<AccessClaims, ApiError> {
    let data = decode::<AccessClaims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &hs256_validation(&config.frontend_url),
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => ApiError::TokenExpired,
        _ => ApiError::TokenVerification,
    })?;

    Ok(data.claims)
}

/// Verifies a refresh token and returns the subject user id.
///
/// Rejects with 401 on any signature/expiry failure, on a non-refresh
/// `typ`, and on a missing or non-numeric subject.
pub fn verify_refresh_token(config: &AppConfig, token: &str) -> Result<i64, ApiError> {
    let data = decode::<RefreshClaims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &hs256_validation(&config.frontend_url),
    )
    .map_err(|_| ApiError::Unauthorized("Invalid refresh token".to_string()))?;

    if data.claims.typ != "refresh" {
        return Err(ApiError::Unauthorized("Invalid refresh token".to_string()));
    }

    data.claims
        .sub
        .parse::<i64>()
        .map_err(|_| ApiError::Unauthorized("Invalid refresh token".to_string()))
}
