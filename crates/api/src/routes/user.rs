//! Routes scoped to the authenticated user.

use axum::routing::get;
use axum::Router;

use crate::handlers::{notification, review};
use crate::state::AppState;

/// Routes mounted at `/user`.
///
/// ```text
/// GET    /review-queue              review_queue
/// GET    /notifications             list_notifications
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/review-queue", get(review::review_queue))
        .route("/notifications", get(notification::list_notifications))
}
