//! Handlers for catches logged within a session.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use catchlog_core::types::DbId;
use catchlog_db::models::catch::CreateCatch;
use catchlog_db::repositories::CatchRepo;

use crate::error::AppResult;
use crate::handlers::session::find_session;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/sessions/{id}/catches
///
/// Log a catch. Owner only; refused once the session is finalized.
pub async fn create_catch(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(session_id): Path<DbId>,
    Json(input): Json<CreateCatch>,
) -> AppResult<impl IntoResponse> {
    let catch = state.review.log_catch(session_id, auth.user_id, &input).await?;

    tracing::info!(
        user_id = auth.user_id,
        session_id,
        catch_id = catch.id,
        "Catch logged"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: catch })))
}

/// GET /api/v1/sessions/{id}/catches
pub async fn list_catches(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(session_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    find_session(&state.pool, session_id).await?;
    let catches = CatchRepo::list_for_session(&state.pool, session_id).await?;
    Ok(Json(DataResponse { data: catches }))
}
