//! Recording reviewer decisions.
//!
//! The first decision on a record wins. Submitting again, whether the same
//! or the opposite decision, returns the stored record unchanged and
//! produces no notification.

use serde::Serialize;

use catchlog_core::error::CoreError;
use catchlog_core::review::{normalize_note, Decision};
use catchlog_core::tokens::hash_decision_token;
use catchlog_core::types::DbId;
use catchlog_db::models::confirmation::Confirmation;
use catchlog_db::repositories::{ConfirmationRepo, SessionRepo};

use crate::engine::ReviewEngine;
use crate::error::ReviewResult;
use crate::events;

/// How the deciding reviewer is identified.
#[derive(Debug, Clone, Copy)]
pub enum Reviewer<'a> {
    /// An authenticated reviewer acting on a session.
    Account { session_id: DbId, reviewer_id: DbId },
    /// The plaintext token from a decision link.
    Token(&'a str),
}

/// Result of a decision submission.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionOutcome {
    /// The record after the call.
    pub record: Confirmation,
    /// `false` when the record had already been decided and was left as is.
    pub recorded: bool,
}

impl ReviewEngine {
    /// Record a reviewer's decision.
    ///
    /// After a decision is recorded the session owner is notified and a
    /// finalization attempt is made. A failing finalization attempt is
    /// logged and left to the sweep; it never fails the decision.
    pub async fn decide(
        &self,
        reviewer: Reviewer<'_>,
        decision: Decision,
        note: Option<&str>,
    ) -> ReviewResult<DecisionOutcome> {
        let note = normalize_note(note)?;
        let status = decision.status();
        let now = self.clock.now();

        let updated = match reviewer {
            Reviewer::Account {
                session_id,
                reviewer_id,
            } => {
                ConfirmationRepo::decide(
                    &self.pool,
                    session_id,
                    reviewer_id,
                    status,
                    note.as_deref(),
                    now,
                )
                .await?
            }
            Reviewer::Token(token) => {
                ConfirmationRepo::decide_by_token_hash(
                    &self.pool,
                    &hash_decision_token(token),
                    status,
                    note.as_deref(),
                    now,
                )
                .await?
            }
        };

        let Some(record) = updated else {
            let existing = self.find_record(reviewer).await?;
            tracing::debug!(
                confirmation_id = existing.id,
                session_id = existing.session_id,
                "Confirmation already decided, ignoring"
            );
            return Ok(DecisionOutcome {
                record: existing,
                recorded: false,
            });
        };

        tracing::info!(
            confirmation_id = record.id,
            session_id = record.session_id,
            reviewer_id = record.reviewer_id,
            decision = decision.as_str(),
            "Decision recorded"
        );

        self.notify_decision(&record).await;

        if let Err(e) = self.maybe_finalize(record.session_id).await {
            tracing::error!(
                session_id = record.session_id,
                error = %e,
                "Finalization after decision failed, leaving it to the sweep"
            );
        }

        Ok(DecisionOutcome {
            record,
            recorded: true,
        })
    }

    /// Look up the record a reviewer refers to without changing it.
    async fn find_record(&self, reviewer: Reviewer<'_>) -> ReviewResult<Confirmation> {
        let (found, key) = match reviewer {
            Reviewer::Account {
                session_id,
                reviewer_id,
            } => (
                ConfirmationRepo::find_for_reviewer(&self.pool, session_id, reviewer_id).await?,
                "reviewer",
            ),
            Reviewer::Token(token) => (
                ConfirmationRepo::find_by_token_hash(&self.pool, &hash_decision_token(token))
                    .await?,
                "token",
            ),
        };
        found.ok_or_else(|| {
            CoreError::NotFoundByKey {
                entity: "Confirmation",
                key,
            }
            .into()
        })
    }

    async fn notify_decision(&self, record: &Confirmation) {
        match SessionRepo::find_by_id(&self.pool, record.session_id).await {
            Ok(Some(session)) => {
                self.publish_all(vec![events::decision_recorded(
                    &session,
                    record,
                    self.clock.now(),
                )]);
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(
                    session_id = record.session_id,
                    error = %e,
                    "Could not load session to notify owner of decision"
                );
            }
        }
    }
}
