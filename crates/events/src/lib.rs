//! CatchLog event bus and notification dispatch.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`PlatformEvent`]: the domain event envelope.
//! - [`NotificationDispatcher`]: background consumer that turns events
//!   addressed to a user into stored in-app notifications.

pub mod bus;
pub mod dispatch;

pub use bus::{EventBus, PlatformEvent};
pub use dispatch::NotificationDispatcher;
