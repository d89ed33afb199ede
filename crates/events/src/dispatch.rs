//! Event-to-notification dispatch.
//!
//! [`NotificationDispatcher`] subscribes to the event bus and records an
//! in-app notification for every event addressed to a user. It runs as its
//! own task, so a slow or failing insert never reaches the code that
//! published the event.

use tokio::sync::broadcast;

use catchlog_core::channels::CHANNEL_IN_APP;
use catchlog_core::event_types::ENTITY_SESSION;
use catchlog_core::types::DbId;
use catchlog_db::repositories::NotificationRepo;
use catchlog_db::DbPool;

use crate::bus::PlatformEvent;

/// Routes platform events to their recipients.
pub struct NotificationDispatcher {
    pool: DbPool,
}

impl NotificationDispatcher {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Run the dispatch loop.
    ///
    /// The loop exits when the channel is closed (i.e. the
    /// [`EventBus`](crate::bus::EventBus) is dropped).
    pub async fn run(self, mut receiver: broadcast::Receiver<PlatformEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => self.dispatch(&event).await,
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Notification dispatcher lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, notification dispatcher shutting down");
                    break;
                }
            }
        }
    }

    /// Record one event for its recipient. Failures are logged and
    /// swallowed.
    pub async fn dispatch(&self, event: &PlatformEvent) {
        let Some(user_id) = event.recipient_user_id else {
            tracing::debug!(event_type = %event.event_type, "Event has no recipient, skipping");
            return;
        };

        match NotificationRepo::create(
            &self.pool,
            user_id,
            &event.event_type,
            session_id_of(event),
            CHANNEL_IN_APP,
        )
        .await
        {
            Ok(id) => {
                tracing::debug!(
                    notification_id = id,
                    user_id,
                    event_type = %event.event_type,
                    "Notification stored"
                );
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    user_id,
                    event_type = %event.event_type,
                    "Failed to store in-app notification"
                );
            }
        }
    }
}

fn session_id_of(event: &PlatformEvent) -> Option<DbId> {
    match event.source_entity_type.as_deref() {
        Some(ENTITY_SESSION) => event.source_entity_id,
        _ => None,
    }
}
