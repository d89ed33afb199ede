//! Public decision-link routes. These carry no bearer token; the decision
//! token in the path is the credential.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::review;
use crate::state::AppState;

/// Routes mounted at `/confirmations`.
///
/// ```text
/// GET    /{token}                   get_by_token
/// POST   /{token}/decision          decide_by_token
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{token}", get(review::get_by_token))
        .route("/{token}/decision", post(review::decide_by_token))
}
