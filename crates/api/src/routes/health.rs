use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use catchlog_db::repositories::SessionRepo;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok`, or `unavailable` when the database cannot be queried.
    pub status: &'static str,
    pub version: &'static str,
    /// Closed sessions with a fully decided ledger that are not finalized
    /// yet. A number that keeps growing means the sweep is not running.
    pub awaiting_finalization: Option<i64>,
}

/// GET /health
///
/// 200 while the database answers, 503 otherwise so load balancers stop
/// routing review traffic here.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let version = env!("CARGO_PKG_VERSION");

    match SessionRepo::count_awaiting_finalization(&state.pool).await {
        Ok(backlog) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok",
                version,
                awaiting_finalization: Some(backlog),
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Health check could not reach the database");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "unavailable",
                    version,
                    awaiting_finalization: None,
                }),
            )
        }
    }
}

/// Mounted at the root, outside `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
