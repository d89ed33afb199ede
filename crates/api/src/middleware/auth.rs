//! Bearer-token extractor and the access checks the review routes make.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use catchlog_core::error::CoreError;
use catchlog_core::roles::Role;
use catchlog_core::types::DbId;
use catchlog_db::models::session::Session;

use crate::auth::jwt::verify_token;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// The verified caller.
///
/// `user_id` is the identity decisions are recorded under when a reviewer
/// decides through an authenticated route.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: DbId,
    pub role: Role,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Only the session owner may proceed.
    pub fn require_owner(&self, session: &Session) -> AppResult<()> {
        if session.user_id != self.user_id {
            return Err(CoreError::Forbidden("Only the session owner can do this".into()).into());
        }
        Ok(())
    }

    /// The owner, or an admin forcing a finalization attempt.
    pub fn require_finalizer(&self, session: &Session) -> AppResult<()> {
        if self.is_admin() {
            return Ok(());
        }
        self.require_owner(session)
    }
}

fn unauthorized(message: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(message.into()))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| unauthorized("Missing Authorization header"))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| unauthorized("Expected: Bearer <token>"))?;

        let claims = verify_token(token, &state.config.tokens).map_err(|e| {
            tracing::debug!(error = %e, "Rejected bearer token");
            unauthorized("Invalid or expired token")
        })?;

        Ok(AuthUser {
            user_id: claims.sub,
            role: claims.role,
        })
    }
}
