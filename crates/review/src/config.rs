use std::time::Duration;

use catchlog_core::sweep::{
    DEFAULT_SWEEP_INTERVAL_SECS, DEFAULT_SWEEP_MAX_PER_RUN, DEFAULT_SWEEP_PAGE_SIZE,
};

/// Default base URL for decision links.
const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:3000/api/v1";

/// Review workflow configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ReviewConfig {
    /// Base URL that decision links are built on.
    pub public_base_url: String,
    /// Seconds between scheduled sweep runs.
    pub sweep_interval_secs: u64,
    /// Hard cap on sessions processed by one sweep run.
    pub sweep_max_per_run: usize,
    /// Candidates fetched per page during a sweep.
    pub sweep_page_size: i64,
}

impl ReviewConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var               | Default                         |
    /// |-----------------------|---------------------------------|
    /// | `PUBLIC_BASE_URL`     | `http://localhost:3000/api/v1`  |
    /// | `SWEEP_INTERVAL_SECS` | `300`                           |
    /// | `SWEEP_MAX_PER_RUN`   | `200`                           |
    /// | `SWEEP_PAGE_SIZE`     | `50`                            |
    pub fn from_env() -> Self {
        let public_base_url = std::env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_PUBLIC_BASE_URL.into());

        let sweep_interval_secs: u64 = std::env::var("SWEEP_INTERVAL_SECS")
            .unwrap_or_else(|_| DEFAULT_SWEEP_INTERVAL_SECS.to_string())
            .parse()
            .expect("SWEEP_INTERVAL_SECS must be a valid u64");

        let sweep_max_per_run: usize = std::env::var("SWEEP_MAX_PER_RUN")
            .unwrap_or_else(|_| DEFAULT_SWEEP_MAX_PER_RUN.to_string())
            .parse()
            .expect("SWEEP_MAX_PER_RUN must be a valid usize");

        let sweep_page_size: i64 = std::env::var("SWEEP_PAGE_SIZE")
            .unwrap_or_else(|_| DEFAULT_SWEEP_PAGE_SIZE.to_string())
            .parse()
            .expect("SWEEP_PAGE_SIZE must be a valid i64");

        Self {
            public_base_url,
            sweep_interval_secs,
            sweep_max_per_run,
            sweep_page_size,
        }
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            public_base_url: DEFAULT_PUBLIC_BASE_URL.to_string(),
            sweep_interval_secs: DEFAULT_SWEEP_INTERVAL_SECS,
            sweep_max_per_run: DEFAULT_SWEEP_MAX_PER_RUN,
            sweep_page_size: DEFAULT_SWEEP_PAGE_SIZE,
        }
    }
}
