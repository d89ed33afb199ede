pub mod confirmation;
pub mod health;
pub mod session;
pub mod user;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /sessions                                  create (POST)
/// /sessions/{id}                             get
/// /sessions/{id}/close                       close (POST, owner)
/// /sessions/{id}/catches                     list, create (owner)
/// /sessions/{id}/reviewers                   nominate (POST, owner)
/// /sessions/{id}/confirmations               records + ledger
/// /sessions/{id}/decision                    decide as reviewer (POST)
/// /sessions/{id}/finalize                    finalize (POST, owner or admin)
///
/// /confirmations/{token}                     record behind a decision link (public)
/// /confirmations/{token}/decision            decide by token (POST, public)
///
/// /user/review-queue                         caller's pending confirmations
/// /user/notifications                        caller's notifications
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/sessions", session::router())
        .nest("/confirmations", confirmation::router())
        .nest("/user", user::router())
}
