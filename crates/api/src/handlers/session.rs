//! Handlers for fishing sessions.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use catchlog_core::error::CoreError;
use catchlog_core::types::DbId;
use catchlog_db::models::session::{CreateSession, Session, SessionView};
use catchlog_db::repositories::{GroupRepo, SessionRepo};
use catchlog_db::DbPool;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Load a session or fail with 404.
pub async fn find_session(pool: &DbPool, id: DbId) -> AppResult<Session> {
    SessionRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| CoreError::NotFound { entity: "Session", id }.into())
}

/// POST /api/v1/sessions
///
/// Start a new session owned by the caller.
pub async fn create_session(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateSession>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    GroupRepo::find_by_id(&state.pool, input.group_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Group",
            id: input.group_id,
        })?;

    let session = SessionRepo::create(&state.pool, auth.user_id, &input).await?;

    tracing::info!(
        user_id = auth.user_id,
        session_id = session.id,
        group_id = session.group_id,
        "Session created"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: SessionView::from(session),
        }),
    ))
}

/// GET /api/v1/sessions/{id}
pub async fn get_session(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let session = find_session(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: SessionView::from(session),
    }))
}

/// POST /api/v1/sessions/{id}/close
///
/// End an open session. Closed sessions become eligible for the sweep.
pub async fn close_session(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let session = find_session(&state.pool, id).await?;
    auth.require_owner(&session)?;

    let closed = SessionRepo::close(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::Conflict(format!("Session {id} is already closed")))?;

    tracing::info!(user_id = auth.user_id, session_id = id, "Session closed");

    Ok(Json(DataResponse {
        data: SessionView::from(closed),
    }))
}
