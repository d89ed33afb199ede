//! Review ledger evaluation and the session finalization state machine.
//!
//! The ledger is never persisted: it is recomputed from a snapshot of a
//! session's confirmation statuses every time a finalization is attempted.
//! [`plan_finalization`] combines the ledger with the session's stored
//! [`ReviewState`] and yields exactly one plan for the engine to execute.

use serde::Serialize;

use crate::error::CoreError;
use crate::status::{ReviewState, ReviewStatus};
use crate::types::DbId;

/* --------------------------------------------------------------------------
Constants
-------------------------------------------------------------------------- */

/// Decision value for approving a session.
pub const DECISION_APPROVED: &str = "approved";

/// Decision value for rejecting a session.
pub const DECISION_REJECTED: &str = "rejected";

/// All values a reviewer may submit.
pub const VALID_DECISIONS: &[&str] = &[DECISION_APPROVED, DECISION_REJECTED];

/// Maximum length of a reviewer's note.
pub const MAX_NOTE_LENGTH: usize = 2_000;

/// Maximum number of reviewers accepted in one nomination request.
pub const MAX_NOMINEES_PER_REQUEST: usize = 50;

/* --------------------------------------------------------------------------
Decisions
-------------------------------------------------------------------------- */

/// A reviewer's terminal stance on a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Approved,
    Rejected,
}

impl Decision {
    /// Parse a submitted decision string.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            DECISION_APPROVED => Ok(Decision::Approved),
            DECISION_REJECTED => Ok(Decision::Rejected),
            other => Err(CoreError::Validation(format!(
                "Invalid decision '{other}'. Must be one of: {}",
                VALID_DECISIONS.join(", ")
            ))),
        }
    }

    /// The review status a confirmation record takes for this decision.
    pub fn status(self) -> ReviewStatus {
        match self {
            Decision::Approved => ReviewStatus::Approved,
            Decision::Rejected => ReviewStatus::Rejected,
        }
    }

    pub fn as_str(self) -> &'static str {
        self.status().as_str()
    }
}

/// Trim a reviewer note; blank notes become `None`.
pub fn normalize_note(note: Option<&str>) -> Result<Option<String>, CoreError> {
    let Some(trimmed) = note.map(str::trim).filter(|n| !n.is_empty()) else {
        return Ok(None);
    };
    if trimmed.chars().count() > MAX_NOTE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Note exceeds maximum length of {MAX_NOTE_LENGTH} characters"
        )));
    }
    Ok(Some(trimmed.to_string()))
}

/// Validate and de-duplicate a nomination request.
///
/// Preserves the first-seen order of ids. The owner may not review their
/// own session.
pub fn validate_nominees(owner_id: DbId, reviewer_ids: &[DbId]) -> Result<Vec<DbId>, CoreError> {
    if reviewer_ids.is_empty() {
        return Err(CoreError::Validation(
            "At least one reviewer must be nominated".to_string(),
        ));
    }
    if reviewer_ids.len() > MAX_NOMINEES_PER_REQUEST {
        return Err(CoreError::Validation(format!(
            "At most {MAX_NOMINEES_PER_REQUEST} reviewers can be nominated at once"
        )));
    }
    if reviewer_ids.contains(&owner_id) {
        return Err(CoreError::Validation(
            "A session owner cannot review their own session".to_string(),
        ));
    }

    let mut unique = Vec::with_capacity(reviewer_ids.len());
    for id in reviewer_ids {
        if !unique.contains(id) {
            unique.push(*id);
        }
    }
    Ok(unique)
}

/* --------------------------------------------------------------------------
Ledger
-------------------------------------------------------------------------- */

/// Aggregate state of all confirmation records of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerState {
    /// No confirmation records exist; the session is not under review.
    NoReviewers,
    /// At least one record is still pending.
    Pending,
    /// Every record is approved.
    AllApproved,
    /// No record is pending and at least one is rejected.
    AnyRejected,
}

/// Evaluate a snapshot of confirmation statuses.
///
/// A pending record always holds the ledger open, even when a rejection is
/// already present. Once nothing is pending, a single rejection decides
/// the outcome regardless of how many approvals exist.
pub fn evaluate<I>(statuses: I) -> LedgerState
where
    I: IntoIterator<Item = ReviewStatus>,
{
    let mut total = 0usize;
    let mut any_pending = false;
    let mut any_rejected = false;

    for status in statuses {
        total += 1;
        match status {
            ReviewStatus::Pending => any_pending = true,
            ReviewStatus::Rejected => any_rejected = true,
            ReviewStatus::Approved => {}
        }
    }

    if total == 0 {
        LedgerState::NoReviewers
    } else if any_pending {
        LedgerState::Pending
    } else if any_rejected {
        LedgerState::AnyRejected
    } else {
        LedgerState::AllApproved
    }
}

/// Per-status counts for display alongside a ledger state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LedgerTally {
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
}

impl LedgerTally {
    pub fn from_statuses<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = ReviewStatus>,
    {
        statuses.into_iter().fold(Self::default(), |mut tally, s| {
            match s {
                ReviewStatus::Pending => tally.pending += 1,
                ReviewStatus::Approved => tally.approved += 1,
                ReviewStatus::Rejected => tally.rejected += 1,
            }
            tally
        })
    }

    pub fn total(&self) -> usize {
        self.pending + self.approved + self.rejected
    }
}

/* --------------------------------------------------------------------------
Finalization state machine
-------------------------------------------------------------------------- */

/// The terminal result of a finalized session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FinalResult {
    Approved,
    Rejected,
}

impl FinalResult {
    /// The review status written to the session and every one of its catches.
    pub fn status(self) -> ReviewStatus {
        match self {
            FinalResult::Approved => ReviewStatus::Approved,
            FinalResult::Rejected => ReviewStatus::Rejected,
        }
    }

    /// Recover a result from a stored `final_result_id`.
    pub fn from_status(status: ReviewStatus) -> Option<Self> {
        match status {
            ReviewStatus::Approved => Some(FinalResult::Approved),
            ReviewStatus::Rejected => Some(FinalResult::Rejected),
            ReviewStatus::Pending => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        self.status().as_str()
    }
}

/// Why a finalization attempt did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    NoReviewers,
    Pending,
    AlreadyFinalized,
}

/// What the engine must do for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalizePlan {
    Skip(SkipReason),
    Finalize(FinalResult),
}

/// Decide the finalization plan for a session.
///
/// The ledger is consulted first; the already-finalized guard comes after
/// it and before any write, so two callers racing on the same fully decided
/// ledger both reach the guard and only the first writer proceeds.
pub fn plan_finalization(state: ReviewState, ledger: LedgerState) -> FinalizePlan {
    let target = match ledger {
        LedgerState::NoReviewers => return FinalizePlan::Skip(SkipReason::NoReviewers),
        LedgerState::Pending => return FinalizePlan::Skip(SkipReason::Pending),
        LedgerState::AnyRejected => FinalResult::Rejected,
        LedgerState::AllApproved => FinalResult::Approved,
    };

    if state == ReviewState::Finalized {
        return FinalizePlan::Skip(SkipReason::AlreadyFinalized);
    }

    FinalizePlan::Finalize(target)
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */
