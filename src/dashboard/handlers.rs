use axum::{extract::Extension, response::IntoResponse, Json};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::services::DashboardService;
use crate::auth::AuthedUser;
use crate::common::{ApiError, AppState};

/// GET /dashboard/stats
pub async fn get_stats(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
) -> Result<impl IntoResponse, ApiError> {
    let app_state = state.read().await;
    let service = DashboardService::new(app_state.db.clone());

    let stats = service.stats(user.user_id).await?;

    Ok(Json(stats))
}

/// GET /dashboard/analytics
pub async fn get_analytics(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
) -> Result<impl IntoResponse, ApiError> {
    let app_state = state.read().await;
    let service = DashboardService::new(app_state.db.clone());

    let analytics = service.analytics(user.user_id).await?;

    Ok(Json(analytics))
}
