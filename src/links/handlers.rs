use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::models::{CreateLinkRequest, ListLinksQuery, UpdateLinkRequest};
use super::services::LinksService;
use crate::auth::{AuthedUser, MaybeUser};
use crate::common::{ApiError, AppState};

/// GET /links - paginated listing of the caller's links
pub async fn list_links(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Query(query): Query<ListLinksQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let app_state = state.read().await;
    let service = LinksService::new(app_state.db.clone());

    let page = service.list_links(user.user_id, &query).await?;

    Ok(Json(page))
}

/// POST /links - create a link; anonymous callers are allowed but get the
/// restricted policy
pub async fn create_link(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    MaybeUser(user): MaybeUser,
    Json(request): Json<CreateLinkRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let app_state = state.read().await;
    let service = LinksService::new(app_state.db.clone());

    let link = service
        .create_link(user.map(|u| u.user_id), request)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Link created", "data": link })),
    ))
}

/// PATCH /links/:id - owner-scoped partial update
pub async fn update_link(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Path(link_id): Path<i64>,
    Json(request): Json<UpdateLinkRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let app_state = state.read().await;
    let service = LinksService::new(app_state.db.clone());

    let link = service.update_link(user.user_id, link_id, request).await?;

    Ok(Json(json!({
        "message": "Link updated successfully",
        "data": link
    })))
}

/// DELETE /links/:id - owner-scoped delete
pub async fn delete_link(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Path(link_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let app_state = state.read().await;
    let service = LinksService::new(app_state.db.clone());

    service.delete_link(user.user_id, link_id).await?;

    Ok(Json(json!({ "message": "Link deleted successfully" })))
}
