//! Well-known notification channel name constants.
//!
//! These must match the values stored in `notifications.channel`.

/// In-app notification, stored for the notification bell UI.
pub const CHANNEL_IN_APP: &str = "in_app";
