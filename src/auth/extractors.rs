//! Authentication extractors for Axum

use async_trait::async_trait;
use axum::{
    extract::{Extension, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::cookie::CookieJar;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::warn;

use super::cookies::ACCESS_COOKIE;
use super::services::verify_access_token;
use crate::common::{ApiError, AppState};

/// Authenticated user extractor
///
/// Validates the access-token cookie and projects the identity straight
/// from the claims - no database lookup on the request path. Rejection
/// follows the documented contract: missing cookie is 401 `{"user":null}`,
/// expired is 401, any other verification failure is 500.
#[derive(Debug, Clone)]
pub struct AuthedUser {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Extension(state_lock): Extension<Arc<RwLock<AppState>>> =
            Extension::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::InternalServer("missing app state".to_string()))?;

        let app_state = state_lock.read().await.clone();

        let jar = CookieJar::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::MissingToken)?;

        let token = match jar.get(ACCESS_COOKIE) {
            Some(cookie) => cookie.value().to_string(),
            None => return Err(ApiError::MissingToken),
        };

        let claims = verify_access_token(&app_state.config, &token)?;

        let user_id = claims.sub.parse::<i64>().map_err(|_| {
            warn!(sub = %claims.sub, "Access token carried a non-numeric subject");
            ApiError::TokenVerification
        })?;

        Ok(AuthedUser {
            user_id,
            name: claims.name,
            email: claims.email,
            avatar_url: claims.avatar_url,
        })
    }
}

/// Optional-auth extractor for routes anonymous visitors may hit.
///
/// "No cookie" and "invalid token" are both treated as anonymous; this
/// extractor never rejects the request.
#[derive(Debug)]
pub struct MaybeUser(pub Option<AuthedUser>);

#[async_trait]
impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(
            AuthedUser::from_request_parts(parts, state).await.ok(),
        ))
    }
}
