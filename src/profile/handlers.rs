use axum::{extract::Extension, response::IntoResponse, Json};
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use super::models::UpdateProfileRequest;
use crate::auth::{AuthedUser, User};
use crate::common::{ApiError, AppState};

/// GET /user - full account row for the caller
pub async fn get_profile(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
) -> Result<impl IntoResponse, ApiError> {
    let app_state = state.read().await;
    let profile = fetch_profile(&app_state.db, user.user_id).await?;
    Ok(Json(profile))
}

/// PATCH /user - rename the account
pub async fn update_profile(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let app_state = state.read().await;
    let profile = rename_profile(&app_state.db, user.user_id, request).await?;
    Ok(Json(profile))
}

pub(crate) async fn fetch_profile(db: &SqlitePool, user_id: i64) -> Result<User, ApiError> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(db)
        .await
        .map_err(ApiError::DatabaseError)?
        .ok_or_else(|| ApiError::NotFound("User not found.".to_string()))
}

pub(crate) async fn rename_profile(
    db: &SqlitePool,
    user_id: i64,
    request: UpdateProfileRequest,
) -> Result<User, ApiError> {
    let name = match request.name {
        Some(name) if !name.trim().is_empty() => name,
        _ => {
            return Err(ApiError::BadRequest(
                "No data provided for update.".to_string(),
            ))
        }
    };

    let profile = sqlx::query_as::<_, User>(
        "UPDATE users SET name = COALESCE(?, name) WHERE id = ? RETURNING *",
    )
    .bind(&name)
    .bind(user_id)
    .fetch_optional(db)
    .await
    .map_err(ApiError::DatabaseError)?
    .ok_or_else(|| ApiError::NotFound("User not found or nothing changed.".to_string()))?;

    info!(user_id, "Profile name updated");

    Ok(profile)
}
