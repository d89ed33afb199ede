//! Reviewer nomination.

use serde::Serialize;

use catchlog_core::error::CoreError;
use catchlog_core::review::validate_nominees;
use catchlog_core::tokens::{decision_url, generate_decision_token};
use catchlog_core::types::DbId;
use catchlog_db::models::confirmation::{Confirmation, NewConfirmation};
use catchlog_db::repositories::{ConfirmationRepo, SessionRepo, UserRepo};

use crate::engine::ReviewEngine;
use crate::error::ReviewResult;
use crate::events;

/// Result of a nomination request.
#[derive(Debug, Clone, Serialize)]
pub struct NominationOutcome {
    /// Records created by this request.
    pub nominated: Vec<Confirmation>,
    /// Reviewers that already had a record; left untouched.
    pub already_nominated: Vec<DbId>,
}

impl ReviewEngine {
    /// Create a pending confirmation record, with a fresh decision token,
    /// for every reviewer that does not have one yet.
    ///
    /// Runs under the session row lock so it cannot interleave with a
    /// finalization of the same session. Each newly nominated reviewer is
    /// sent their decision link after commit.
    pub async fn nominate(
        &self,
        session_id: DbId,
        reviewer_ids: &[DbId],
    ) -> ReviewResult<NominationOutcome> {
        let mut tx = self.pool.begin().await?;

        let session = SessionRepo::lock_for_update(&mut *tx, session_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Session",
                id: session_id,
            })?;

        if session.is_finalized() {
            return Err(CoreError::Conflict(format!(
                "Session {session_id} is finalized; reviewers can no longer be nominated"
            ))
            .into());
        }

        let reviewers = validate_nominees(session.user_id, reviewer_ids)?;

        let active = UserRepo::existing_active_ids(&self.pool, &reviewers).await?;
        if let Some(missing) = reviewers.iter().find(|id| !active.contains(id)) {
            return Err(CoreError::NotFound {
                entity: "User",
                id: *missing,
            }
            .into());
        }

        let mut nominated = Vec::new();
        let mut already_nominated = Vec::new();
        let mut links = Vec::new();

        for reviewer_id in reviewers {
            let token = generate_decision_token();
            let input = NewConfirmation {
                session_id,
                reviewer_id,
                token_hash: token.hash,
            };
            match ConfirmationRepo::insert_pending(&mut *tx, &input).await? {
                Some(record) => {
                    links.push((reviewer_id, token.plaintext));
                    nominated.push(record);
                }
                None => already_nominated.push(reviewer_id),
            }
        }

        if !nominated.is_empty() {
            SessionRepo::mark_under_review(&mut *tx, session_id).await?;
        }

        tx.commit().await?;

        tracing::info!(
            session_id,
            nominated = nominated.len(),
            already_nominated = already_nominated.len(),
            "Reviewers nominated"
        );

        let now = self.clock.now();
        let base_url = &self.config.public_base_url;
        self.publish_all(
            links
                .iter()
                .map(|(reviewer_id, token)| {
                    let url = decision_url(base_url, token);
                    events::reviewer_nominated(&session, *reviewer_id, &url, now)
                })
                .collect(),
        );

        Ok(NominationOutcome {
            nominated,
            already_nominated,
        })
    }
}
