//! Builders for the review events published on the platform event bus.
//!
//! Every review event is addressed to exactly one recipient and sourced on
//! the session it concerns. Payloads carry `session_title` so delivery
//! channels can render a message without another query.

use serde_json::json;

use catchlog_core::event_types::{
    DECISION_RECORDED, ENTITY_SESSION, REVIEWER_NOMINATED, SESSION_FINALIZED,
};
use catchlog_core::review::FinalResult;
use catchlog_core::types::{DbId, Timestamp};
use catchlog_db::models::confirmation::Confirmation;
use catchlog_db::models::session::Session;
use catchlog_events::PlatformEvent;

/// A reviewer was nominated; the payload carries their decision link.
pub fn reviewer_nominated(
    session: &Session,
    reviewer_id: DbId,
    decision_url: &str,
    at: Timestamp,
) -> PlatformEvent {
    PlatformEvent::new(REVIEWER_NOMINATED)
        .with_source(ENTITY_SESSION, session.id)
        .with_actor(session.user_id)
        .with_recipient(reviewer_id)
        .with_payload(json!({
            "session_title": session.title,
            "decision_url": decision_url,
        }))
        .at(at)
}

/// A reviewer decided; the owner is told which way.
pub fn decision_recorded(session: &Session, record: &Confirmation, at: Timestamp) -> PlatformEvent {
    PlatformEvent::new(DECISION_RECORDED)
        .with_source(ENTITY_SESSION, session.id)
        .with_actor(record.reviewer_id)
        .with_recipient(session.user_id)
        .with_payload(json!({
            "session_title": session.title,
            "confirmation_id": record.id,
            "decision": record.status().as_str(),
        }))
        .at(at)
}

/// The session reached its final result.
pub fn session_finalized(
    session: &Session,
    result: FinalResult,
    catches_updated: u64,
    at: Timestamp,
) -> PlatformEvent {
    PlatformEvent::new(SESSION_FINALIZED)
        .with_source(ENTITY_SESSION, session.id)
        .with_recipient(session.user_id)
        .with_payload(json!({
            "session_title": session.title,
            "final_result": result.as_str(),
            "catches_updated": catches_updated,
        }))
        .at(at)
}
