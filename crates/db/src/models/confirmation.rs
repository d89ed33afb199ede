//! Session confirmation records: one reviewer's stance on one session.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use catchlog_core::status::{ReviewStatus, StatusId};
use catchlog_core::types::{DbId, Timestamp};

/// A row from the `session_confirmations` table.
///
/// `token_hash` is never serialized; the plaintext token only ever exists
/// in the reviewer's decision link.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Confirmation {
    pub id: DbId,
    pub session_id: DbId,
    pub reviewer_id: DbId,
    pub status_id: StatusId,
    pub note: Option<String>,
    pub decided_at: Option<Timestamp>,
    #[serde(skip_serializing)]
    pub token_hash: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Confirmation {
    /// The record's status. Unknown ids are treated as pending so they
    /// hold the ledger open rather than finalizing on bad data.
    pub fn status(&self) -> ReviewStatus {
        ReviewStatus::from_id(self.status_id).unwrap_or(ReviewStatus::Pending)
    }

    pub fn is_pending(&self) -> bool {
        self.status() == ReviewStatus::Pending
    }
}

/// DTO for inserting a pending confirmation at nomination time.
#[derive(Debug, Clone)]
pub struct NewConfirmation {
    pub session_id: DbId,
    pub reviewer_id: DbId,
    pub token_hash: String,
}

/// Request body for nominating reviewers.
#[derive(Debug, Clone, Deserialize)]
pub struct NominateRequest {
    pub reviewer_ids: Vec<DbId>,
}

/// Request body for a reviewer's decision.
#[derive(Debug, Clone, Deserialize)]
pub struct DecisionRequest {
    pub decision: String,
    pub note: Option<String>,
}

/// An open confirmation in a reviewer's queue.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ReviewQueueItem {
    pub confirmation_id: DbId,
    pub session_id: DbId,
    pub session_title: String,
    pub owner_id: DbId,
    pub group_id: DbId,
    pub nominated_at: Timestamp,
}
