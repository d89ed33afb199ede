//! Fishing session models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use catchlog_core::error::CoreError;
use catchlog_core::review::FinalResult;
use catchlog_core::status::{ReviewState, ReviewStatus, SessionStatus, StatusId};
use catchlog_core::types::{DbId, Timestamp};

/// A row from the `sessions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Session {
    pub id: DbId,
    pub user_id: DbId,
    pub group_id: DbId,
    pub title: String,
    pub status_id: StatusId,
    pub review_state_id: StatusId,
    pub started_at: Timestamp,
    pub ended_at: Option<Timestamp>,
    pub finalized_at: Option<Timestamp>,
    pub final_result_id: Option<StatusId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Session {
    pub fn status(&self) -> Option<SessionStatus> {
        SessionStatus::from_id(self.status_id)
    }

    /// The stored review state. Unknown ids are treated as unreviewed.
    pub fn review_state(&self) -> ReviewState {
        ReviewState::from_id(self.review_state_id).unwrap_or(ReviewState::Unreviewed)
    }

    pub fn final_result(&self) -> Option<FinalResult> {
        self.final_result_id
            .and_then(ReviewStatus::from_id)
            .and_then(FinalResult::from_status)
    }

    pub fn is_finalized(&self) -> bool {
        self.review_state() == ReviewState::Finalized
    }

    pub fn is_closed(&self) -> bool {
        self.status() == Some(SessionStatus::Closed)
    }
}

/// Maximum length of a session title.
pub const MAX_TITLE_LENGTH: usize = 200;

/// DTO for creating a new session. The owner comes from the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSession {
    pub group_id: DbId,
    pub title: String,
    pub started_at: Option<Timestamp>,
}

impl CreateSession {
    pub fn validate(&self) -> Result<(), CoreError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(CoreError::Validation("Title must not be empty".into()));
        }
        if title.chars().count() > MAX_TITLE_LENGTH {
            return Err(CoreError::Validation(format!(
                "Title exceeds maximum length of {MAX_TITLE_LENGTH} characters"
            )));
        }
        Ok(())
    }
}

/// Session as returned by the API, with status names resolved.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    #[serde(flatten)]
    pub session: Session,
    pub status: &'static str,
    pub review_state: &'static str,
    pub final_result: Option<FinalResult>,
}

impl From<Session> for SessionView {
    fn from(session: Session) -> Self {
        Self {
            status: session.status().map(SessionStatus::as_str).unwrap_or("unknown"),
            review_state: session.review_state().as_str(),
            final_result: session.final_result(),
            session,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(title: &str) -> CreateSession {
        CreateSession {
            group_id: 1,
            title: title.to_string(),
            started_at: None,
        }
    }

    #[test]
    fn blank_or_overlong_titles_rejected() {
        assert!(input("Evening carp").validate().is_ok());
        assert!(input("   ").validate().is_err());
        assert!(input(&"t".repeat(MAX_TITLE_LENGTH + 1)).validate().is_err());
    }
}
