use std::sync::Arc;

use catchlog_core::clock::{Clock, SystemClock};
use catchlog_db::DbPool;
use catchlog_events::{EventBus, PlatformEvent};

use crate::config::ReviewConfig;

/// Entry point for every review workflow operation.
///
/// Cheap to clone; the pool, bus, clock and config are shared. The
/// operations themselves live in [`nomination`](crate::nomination),
/// [`decision`](crate::decision), [`finalize`](crate::finalize) and
/// [`sweep`](crate::sweep).
#[derive(Clone)]
pub struct ReviewEngine {
    pub(crate) pool: DbPool,
    pub(crate) bus: Arc<EventBus>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) config: Arc<ReviewConfig>,
}

impl ReviewEngine {
    /// Create an engine that timestamps with the system clock.
    pub fn new(pool: DbPool, bus: Arc<EventBus>, config: ReviewConfig) -> Self {
        Self::with_clock(pool, bus, config, Arc::new(SystemClock))
    }

    /// Create an engine with an injected clock.
    pub fn with_clock(
        pool: DbPool,
        bus: Arc<EventBus>,
        config: ReviewConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            pool,
            bus,
            clock,
            config: Arc::new(config),
        }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub fn config(&self) -> &ReviewConfig {
        &self.config
    }

    /// Publish events produced by a committed transaction.
    pub(crate) fn publish_all(&self, events: Vec<PlatformEvent>) {
        for event in events {
            self.bus.publish(event);
        }
    }
}
