// Error handling types for the API

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::fmt;
use tracing::error;

/// API error types
///
/// Several variants carry a fixed wire body that clients depend on (the
/// auth cookie contract): `MissingToken` renders `{"user":null}`,
/// `TokenExpired` and `TokenVerification` render their documented messages.
/// Internal detail is logged, never returned.
#[derive(Debug)]
pub enum ApiError {
    /// No access-token cookie on a protected route
    MissingToken,
    /// Access token past its `exp`
    TokenExpired,
    /// Access token present but failed verification for any non-expiry
    /// reason. Returns 500, not 401 - documented behavior clients rely on.
    TokenVerification,
    Unauthorized(String),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    /// Provider rejected the OAuth exchange at the protocol level
    OAuthProtocol(String),
    /// Transport failure talking to the provider
    OAuthTransport(String),
    InternalServer(String),
    DatabaseError(sqlx::Error),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::MissingToken => write!(f, "Unauthorized: missing access token"),
            ApiError::TokenExpired => write!(f, "Unauthorized: token expired"),
            ApiError::TokenVerification => write!(f, "Token verification failed"),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::OAuthProtocol(code) => write!(f, "OAuth Error: {}", code),
            ApiError::OAuthTransport(msg) => write!(f, "Fetch Error: {}", msg),
            ApiError::InternalServer(msg) => write!(f, "Internal Server Error: {}", msg),
            ApiError::DatabaseError(e) => write!(f, "Database Error: {}", e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            ApiError::MissingToken => (StatusCode::UNAUTHORIZED, json!({ "user": null })),
            ApiError::TokenExpired => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": "Token expired" }),
            ),
            ApiError::TokenVerification => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Token verification failed" }),
            ),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, json!({ "error": msg })),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, json!({ "error": msg })),
            ApiError::OAuthProtocol(code) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "OAuth Error", "detail": code }),
            ),
            ApiError::OAuthTransport(msg) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Fetch Error", "detail": msg }),
            ),
            ApiError::InternalServer(msg) => {
                error!(detail = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal Server Error" }),
                )
            }
            ApiError::DatabaseError(e) => {
                error!(error = %e, "Database error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal Server Error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::DatabaseError(e)
    }
}

/// True when a sqlx error is a unique-constraint violation. Used to map
/// duplicate short codes to 409 instead of 500.
pub fn is_unique_violation(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Database(db) => db.message().contains("UNIQUE constraint failed"),
        _ => false,
    }
}
