//! Handlers for the caller's notifications.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use catchlog_db::repositories::NotificationRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 200;

#[derive(Debug, Deserialize)]
pub struct NotificationQuery {
    pub limit: Option<i64>,
}

/// GET /api/v1/user/notifications
///
/// Newest first. `limit` defaults to 50 and is capped at 200.
pub async fn list_notifications(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<NotificationQuery>,
) -> AppResult<impl IntoResponse> {
    let limit = match params.limit {
        None => DEFAULT_LIMIT,
        Some(n) if n < 1 => return Err(AppError::BadRequest("limit must be at least 1".into())),
        Some(n) => n.min(MAX_LIMIT),
    };
    let notifications = NotificationRepo::list_for_user(&state.pool, auth.user_id, limit).await?;
    Ok(Json(DataResponse {
        data: notifications,
    }))
}
