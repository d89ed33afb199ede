//! Handlers for the session review workflow.
//!
//! Provides endpoints for nominating reviewers, recording decisions (as an
//! authenticated reviewer or through a decision link), inspecting the
//! review ledger, triggering finalization and listing a reviewer's queue.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use catchlog_core::error::CoreError;
use catchlog_core::review::{evaluate, Decision, LedgerState, LedgerTally};
use catchlog_core::tokens::hash_decision_token;
use catchlog_core::types::DbId;
use catchlog_db::models::confirmation::{Confirmation, DecisionRequest, NominateRequest};
use catchlog_db::repositories::ConfirmationRepo;
use catchlog_review::Reviewer;

use crate::error::AppResult;
use crate::handlers::session::find_session;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Confirmation records of a session with the ledger evaluated over them.
#[derive(Debug, Serialize)]
pub struct ConfirmationsResponse {
    pub session_id: DbId,
    pub ledger: LedgerState,
    pub tally: LedgerTally,
    pub records: Vec<Confirmation>,
}

/// The record behind a decision link.
#[derive(Debug, Serialize)]
pub struct TokenConfirmationResponse {
    pub session_id: DbId,
    pub session_title: String,
    pub confirmation: Confirmation,
}

/// POST /api/v1/sessions/{id}/reviewers
///
/// Nominate reviewers for a session. Only the owner may nominate.
pub async fn nominate_reviewers(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(session_id): Path<DbId>,
    Json(input): Json<NominateRequest>,
) -> AppResult<impl IntoResponse> {
    let session = find_session(&state.pool, session_id).await?;
    auth.require_owner(&session)?;

    let outcome = state.review.nominate(session_id, &input.reviewer_ids).await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: outcome })))
}

/// GET /api/v1/sessions/{id}/confirmations
pub async fn list_confirmations(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(session_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    find_session(&state.pool, session_id).await?;

    let records = ConfirmationRepo::list_for_session(&state.pool, session_id).await?;
    let statuses: Vec<_> = records.iter().map(Confirmation::status).collect();

    Ok(Json(DataResponse {
        data: ConfirmationsResponse {
            session_id,
            ledger: evaluate(statuses.iter().copied()),
            tally: LedgerTally::from_statuses(statuses),
            records,
        },
    }))
}

/// POST /api/v1/sessions/{id}/decision
///
/// Record the caller's decision on a session they were nominated for.
/// Repeat submissions return the stored record with `recorded: false`.
pub async fn decide(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(session_id): Path<DbId>,
    Json(input): Json<DecisionRequest>,
) -> AppResult<impl IntoResponse> {
    let decision = Decision::parse(&input.decision)?;
    find_session(&state.pool, session_id).await?;

    let outcome = state
        .review
        .decide(
            Reviewer::Account {
                session_id,
                reviewer_id: auth.user_id,
            },
            decision,
            input.note.as_deref(),
        )
        .await?;

    Ok(Json(DataResponse { data: outcome }))
}

/// GET /api/v1/confirmations/{token}
///
/// Show the record a decision link refers to. No authentication.
pub async fn get_by_token(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> AppResult<impl IntoResponse> {
    let token_hash = hash_decision_token(&token);
    let confirmation = ConfirmationRepo::find_by_token_hash(&state.pool, &token_hash)
        .await?
        .ok_or(CoreError::NotFoundByKey {
            entity: "Confirmation",
            key: "token",
        })?;
    let session = find_session(&state.pool, confirmation.session_id).await?;

    Ok(Json(DataResponse {
        data: TokenConfirmationResponse {
            session_id: session.id,
            session_title: session.title,
            confirmation,
        },
    }))
}

/// POST /api/v1/confirmations/{token}/decision
///
/// Record a decision through a decision link. No authentication.
pub async fn decide_by_token(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(input): Json<DecisionRequest>,
) -> AppResult<impl IntoResponse> {
    let decision = Decision::parse(&input.decision)?;

    let outcome = state
        .review
        .decide(Reviewer::Token(&token), decision, input.note.as_deref())
        .await?;

    Ok(Json(DataResponse { data: outcome }))
}

/// POST /api/v1/sessions/{id}/finalize
///
/// Attempt finalization now. Owner or admin only.
pub async fn finalize_session(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(session_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let session = find_session(&state.pool, session_id).await?;
    if !auth.is_admin() {
        auth.require_owner(&session)?;
    }

    let outcome = state.review.maybe_finalize(session_id).await?;

    tracing::info!(
        user_id = auth.user_id,
        role = auth.role.as_str(),
        session_id,
        ?outcome,
        "Finalization requested"
    );

    Ok(Json(DataResponse { data: outcome }))
}

/// GET /api/v1/user/review-queue
///
/// Pending confirmations assigned to the caller, oldest first.
pub async fn review_queue(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let items = ConfirmationRepo::review_queue_for_reviewer(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: items }))
}
