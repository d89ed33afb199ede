//! Finalization sweep constants.

/// PostgreSQL advisory lock ID held for the duration of a sweep run.
/// Only one sweep can run at a time across all processes.
pub const SWEEP_LOCK_ID: i64 = 731_406_218;

/// Default number of candidates fetched per page.
pub const DEFAULT_SWEEP_PAGE_SIZE: i64 = 50;

/// Default cap on sessions processed by a single run.
pub const DEFAULT_SWEEP_MAX_PER_RUN: usize = 200;

/// Default interval between scheduled runs, in seconds.
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 300;

/// Clamp a requested page size to what one run may still process.
pub fn page_size_for(remaining: usize, page_size: i64) -> i64 {
    let remaining = i64::try_from(remaining).unwrap_or(i64::MAX);
    page_size.max(1).min(remaining)
}
