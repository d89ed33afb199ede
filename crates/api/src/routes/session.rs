//! Route definitions for sessions, their catches and their review.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{catch, review, session};
use crate::state::AppState;

/// Routes mounted at `/sessions`.
///
/// ```text
/// POST   /                          create_session
/// GET    /{id}                      get_session
/// POST   /{id}/close                close_session
/// GET    /{id}/catches              list_catches
/// POST   /{id}/catches              create_catch
/// POST   /{id}/reviewers            nominate_reviewers
/// GET    /{id}/confirmations        list_confirmations
/// POST   /{id}/decision             decide
/// POST   /{id}/finalize             finalize_session
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(session::create_session))
        .route("/{id}", get(session::get_session))
        .route("/{id}/close", post(session::close_session))
        .route(
            "/{id}/catches",
            get(catch::list_catches).post(catch::create_catch),
        )
        .route("/{id}/reviewers", post(review::nominate_reviewers))
        .route("/{id}/confirmations", get(review::list_confirmations))
        .route("/{id}/decision", post(review::decide))
        .route("/{id}/finalize", post(review::finalize_session))
}
