//! Authentication handlers
//!
//! OAuth initiation and callback endpoints for both providers, the session
//! probe (`/auth/me`) and the refresh endpoint. Cookies are only written
//! after the full resolve-and-issue pipeline has succeeded; any failure
//! leaves the caller's cookies untouched.

use axum::{
    extract::{Extension, Query},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use super::cookies::{
    access_cookie, code_verifier_cookie, refresh_cookie, removal_cookie, state_cookie,
    CODE_VERIFIER_COOKIE, REFRESH_COOKIE, STATE_COOKIE,
};
use super::extractors::AuthedUser;
use super::models::{TokenPair, User};
use super::services::{generate_token, upsert_oauth_user, verify_refresh_token};
use crate::common::helpers::{code_challenge_s256, generate_code_verifier, generate_state};
use crate::common::{safe_email_log, ApiError, AppState};
use crate::services::ProviderProfile;

/// 302 redirect. `axum::response::Redirect` issues 303/307; the OAuth
/// user-agent round-trips here use 302.
fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

/// GET /auth/me
/// Returns the identity projected from the verified access token
pub async fn me_handler(user: AuthedUser) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "user": {
            "userId": user.user_id.to_string(),
            "name": user.name,
            "email": user.email,
            "avatarUrl": user.avatar_url,
        }
    }))
}

/// POST /auth/refresh
/// Verifies the refresh-token cookie and re-issues both tokens in the
/// response body. Cookies are not re-set here; the caller persists them.
pub async fn refresh_handler(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    jar: CookieJar,
) -> Result<Json<TokenPair>, ApiError> {
    let state = state_lock.read().await.clone();

    let token = jar
        .get(REFRESH_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or_else(|| ApiError::Unauthorized("Invalid refresh token".to_string()))?;

    let user_id = verify_refresh_token(&state.config, &token)?;

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(&state.db)
        .await
        .map_err(|e| {
            error!(error = %e, user_id, "Database error during token refresh");
            ApiError::InternalServer("Failed to refresh token".to_string())
        })?
        .ok_or_else(|| {
            error!(user_id, "Refresh token subject no longer exists");
            ApiError::InternalServer("Failed to refresh token".to_string())
        })?;

    let pair = generate_token(&state.config, &user).map_err(|e| {
        error!(error = %e, user_id, "JWT encoding error during refresh");
        ApiError::InternalServer("Failed to refresh token".to_string())
    })?;

    info!(user_id, "Token pair refreshed");
    Ok(Json(pair))
}

/// GET /auth/google
/// Starts the Google flow: state + PKCE verifier into short-lived cookies,
/// 302 to the provider
pub async fn google_start(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    jar: CookieJar,
) -> (CookieJar, Response) {
    let state = state_lock.read().await.clone();

    let oauth_state = generate_state();
    let verifier = generate_code_verifier();
    let challenge = code_challenge_s256(&verifier);

    let url = state.google.authorization_url(&oauth_state, &challenge);
    let domain = &state.config.cookie_domain;

    let jar = jar
        .add(state_cookie(oauth_state, domain))
        .add(code_verifier_cookie(verifier, domain));

    (jar, found(&url))
}

/// GET /auth/google/callback
pub async fn google_callback(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Query(params): Query<HashMap<String, String>>,
    jar: CookieJar,
) -> Result<(CookieJar, Response), ApiError> {
    let state = state_lock.read().await.clone();

    let code = params.get("code");
    let query_state = params.get("state");
    let stored_state = jar.get(STATE_COOKIE).map(|c| c.value().to_string());
    let stored_verifier = jar
        .get(CODE_VERIFIER_COOKIE)
        .map(|c| c.value().to_string());

    // All four values must be present and the state must round-trip intact
    let (code, verifier) = match (code, query_state, stored_state, stored_verifier) {
        (Some(code), Some(qs), Some(ss), Some(verifier)) if *qs == ss => (code.clone(), verifier),
        _ => {
            warn!("Google callback missing code/state/verifier or state mismatch");
            return Err(ApiError::BadRequest("Invalid request".to_string()));
        }
    };

    let claims = state.google.exchange_code(&code, &verifier).await?;
    let data = ProviderProfile::Google(claims).normalize().map_err(|e| {
        error!(error = %e, provider = "google", "Provider identity rejected");
        ApiError::from(e)
    })?;

    let user = upsert_oauth_user(&state.db, &data).await.map_err(|e| {
        error!(error = %e, email = %safe_email_log(&data.email), "Identity resolution failed");
        ApiError::InternalServer("identity resolution failed".to_string())
    })?;

    let pair = generate_token(&state.config, &user)
        .map_err(|e| ApiError::InternalServer(format!("jwt error: {}", e)))?;

    info!(
        user_id = user.id,
        email = %safe_email_log(&user.email),
        provider = "google",
        "User authenticated via Google OAuth"
    );

    let domain = &state.config.cookie_domain;
    let jar = jar
        .remove(removal_cookie(STATE_COOKIE, domain))
        .remove(removal_cookie(CODE_VERIFIER_COOKIE, domain))
        .add(access_cookie(pair.access_token, domain))
        .add(refresh_cookie(pair.refresh_token, domain));

    Ok((jar, found(&state.config.dashboard_url())))
}

/// GET /auth/github
/// Starts the GitHub flow; no PKCE, state travels in the URL only
pub async fn github_start(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
) -> Response {
    let state = state_lock.read().await.clone();
    let url = state.github.authorization_url(&generate_state());
    found(&url)
}

/// GET /auth/github/callback
pub async fn github_callback(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Query(params): Query<HashMap<String, String>>,
    jar: CookieJar,
) -> Result<(CookieJar, Response), ApiError> {
    let state = state_lock.read().await.clone();

    let code = params
        .get("code")
        .ok_or_else(|| ApiError::BadRequest("Invalid request".to_string()))?;

    let access_token = state.github.exchange_code(code).await?;
    let (profile, emails) = state.github.fetch_identity(&access_token).await?;

    let data = ProviderProfile::GitHub { profile, emails }
        .normalize()
        .map_err(|e| {
            error!(error = %e, provider = "github", "Provider identity rejected");
            ApiError::from(e)
        })?;

    let user = upsert_oauth_user(&state.db, &data).await.map_err(|e| {
        error!(error = %e, email = %safe_email_log(&data.email), "Identity resolution failed");
        ApiError::InternalServer("identity resolution failed".to_string())
    })?;

    let pair = generate_token(&state.config, &user)
        .map_err(|e| ApiError::InternalServer(format!("jwt error: {}", e)))?;

    info!(
        user_id = user.id,
        email = %safe_email_log(&user.email),
        provider = "github",
        "User authenticated via GitHub OAuth"
    );

    let domain = &state.config.cookie_domain;
    let jar = jar
        .add(access_cookie(pair.access_token, domain))
        .add(refresh_cookie(pair.refresh_token, domain));

    Ok((jar, found(&state.config.dashboard_url())))
}
