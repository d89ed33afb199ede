//! Logging catches against a session.
//!
//! A catch may only join a session whose review is still open. The insert
//! runs under the session row lock, the same lock finalization takes, so a
//! catch either lands before the cascade or is refused.

use catchlog_core::error::CoreError;
use catchlog_core::types::DbId;
use catchlog_db::models::catch::{Catch, CreateCatch};
use catchlog_db::repositories::{CatchRepo, SessionRepo};

use crate::engine::ReviewEngine;
use crate::error::ReviewResult;

impl ReviewEngine {
    /// Log a pending catch on behalf of the session owner.
    pub async fn log_catch(
        &self,
        session_id: DbId,
        owner_id: DbId,
        input: &CreateCatch,
    ) -> ReviewResult<Catch> {
        input.validate()?;

        let mut tx = self.pool.begin().await?;

        let session = SessionRepo::lock_for_update(&mut *tx, session_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Session",
                id: session_id,
            })?;

        if session.user_id != owner_id {
            return Err(CoreError::Forbidden("Only the session owner can do this".into()).into());
        }
        if session.is_finalized() {
            return Err(CoreError::Conflict(format!(
                "Session {session_id} is finalized; catches can no longer be added"
            ))
            .into());
        }

        let catch = CatchRepo::create(&mut *tx, &session, input).await?;
        tx.commit().await?;
        Ok(catch)
    }
}
