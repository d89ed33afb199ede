//! The finalization engine.
//!
//! [`ReviewEngine::maybe_finalize`] is the single path into the finalized
//! state. It evaluates the ledger from a snapshot taken under the session
//! row lock, executes the plan from
//! [`plan_finalization`](catchlog_core::review::plan_finalization), and
//! applies the result to the session and all of its catches in one
//! transaction.

use serde::Serialize;

use catchlog_core::error::CoreError;
use catchlog_core::review::{evaluate, plan_finalization, FinalResult, FinalizePlan, SkipReason};
use catchlog_core::status::ReviewStatus;
use catchlog_core::types::DbId;
use catchlog_db::repositories::{ConfirmationRepo, SessionRepo};

use crate::engine::ReviewEngine;
use crate::error::ReviewResult;
use crate::events;

/// Result of a finalization attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FinalizeOutcome {
    Skipped { reason: SkipReason },
    Finalized { result: FinalResult, catches_updated: u64 },
}

impl FinalizeOutcome {
    pub fn is_finalized(&self) -> bool {
        matches!(self, FinalizeOutcome::Finalized { .. })
    }
}

impl ReviewEngine {
    /// Finalize a session if its ledger is fully decided.
    ///
    /// Skips without writing when there are no reviewers, when any record
    /// is still pending, or when the session is already finalized. On
    /// success the owner is notified after commit. If any write fails the
    /// transaction is rolled back and the session stays under review.
    pub async fn maybe_finalize(&self, session_id: DbId) -> ReviewResult<FinalizeOutcome> {
        let mut tx = self.pool.begin().await?;

        let session = SessionRepo::lock_for_update(&mut *tx, session_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Session",
                id: session_id,
            })?;

        let statuses = ConfirmationRepo::statuses_for_session(&mut *tx, session_id).await?;
        // Unknown status ids hold the ledger open.
        let ledger = evaluate(
            statuses
                .into_iter()
                .map(|id| ReviewStatus::from_id(id).unwrap_or(ReviewStatus::Pending)),
        );

        let result = match plan_finalization(session.review_state(), ledger) {
            FinalizePlan::Skip(reason) => {
                tx.rollback().await?;
                tracing::debug!(session_id, ?reason, "Finalization skipped");
                return Ok(FinalizeOutcome::Skipped { reason });
            }
            FinalizePlan::Finalize(result) => result,
        };

        let finalized_at = self.clock.now();
        let Some(finalized) =
            SessionRepo::finalize_with_catches(&mut *tx, session_id, result, finalized_at).await?
        else {
            tx.rollback().await?;
            tracing::debug!(session_id, "Session finalized concurrently");
            return Ok(FinalizeOutcome::Skipped {
                reason: SkipReason::AlreadyFinalized,
            });
        };

        tx.commit().await?;

        tracing::info!(
            session_id,
            result = result.as_str(),
            catches_updated = finalized.catches_updated,
            "Session finalized"
        );

        self.publish_all(vec![events::session_finalized(
            &finalized.session,
            result,
            finalized.catches_updated,
            finalized_at,
        )]);

        Ok(FinalizeOutcome::Finalized {
            result,
            catches_updated: finalized.catches_updated,
        })
    }
}
