//! Event type names published on the platform event bus.
//!
//! Dot-separated `<domain>.<action>` names. The notification dispatcher
//! stores these verbatim in `notifications.kind`.

/// A reviewer was nominated for a session and can now decide on it.
pub const REVIEWER_NOMINATED: &str = "review.reviewer_nominated";

/// A reviewer recorded an approve/reject decision on a session.
pub const DECISION_RECORDED: &str = "review.decision_recorded";

/// A session (and all of its catches) reached its final result.
pub const SESSION_FINALIZED: &str = "review.session_finalized";

/// All review event types, in workflow order.
pub const REVIEW_EVENT_TYPES: &[&str] = &[REVIEWER_NOMINATED, DECISION_RECORDED, SESSION_FINALIZED];

/// `source_entity_type` of events raised for a fishing session.
pub const ENTITY_SESSION: &str = "session";
