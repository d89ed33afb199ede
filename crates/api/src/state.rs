use std::sync::Arc;

use catchlog_review::ReviewEngine;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: inner data is behind `Arc` or is already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: catchlog_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Review workflow operations. Publishes on the shared event bus.
    pub review: ReviewEngine,
}
