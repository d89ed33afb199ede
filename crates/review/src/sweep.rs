//! Periodic finalization sweep.
//!
//! The sweep finalizes closed sessions whose ledger became fully decided
//! without the synchronous path completing, e.g. after a transient storage
//! failure. One run at a time is enforced across processes with a Postgres
//! advisory lock; candidates are paged by ascending id so a session that
//! fails is not read again in the same run.

use serde::Serialize;
use tokio_util::sync::CancellationToken;

use catchlog_core::sweep::page_size_for;
use catchlog_core::types::DbId;
use catchlog_db::repositories::{SessionRepo, SweepLockRepo};

use crate::engine::ReviewEngine;
use crate::error::ReviewResult;
use crate::finalize::FinalizeOutcome;

/// Counts from one sweep run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// Sessions a finalization was attempted for.
    pub processed: usize,
    pub finalized: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl ReviewEngine {
    /// Run one sweep over at most `limit` candidate sessions.
    ///
    /// Returns an empty report if another sweep holds the lock. Failures on
    /// individual sessions are logged and counted; they never abort the run.
    pub async fn run_sweep(&self, limit: usize) -> ReviewResult<SweepReport> {
        let mut lock_conn = self.pool.acquire().await?;

        if !SweepLockRepo::try_acquire(&mut *lock_conn).await? {
            tracing::info!("Sweep already running elsewhere, skipping this run");
            return Ok(SweepReport::default());
        }

        let result = self.sweep_candidates(limit).await;

        match SweepLockRepo::release(&mut *lock_conn).await {
            Ok(true) => {}
            Ok(false) => tracing::warn!("Sweep lock was not held at release"),
            Err(e) => {
                tracing::error!(error = %e, "Failed to release sweep lock, discarding connection");
                // A pooled connection would keep the lock alive.
                drop(lock_conn.detach());
            }
        }

        result
    }

    async fn sweep_candidates(&self, limit: usize) -> ReviewResult<SweepReport> {
        let mut report = SweepReport::default();
        let mut after_id: DbId = 0;

        while report.processed < limit {
            let page = page_size_for(limit - report.processed, self.config.sweep_page_size);
            let candidates = SessionRepo::list_sweep_candidates(&self.pool, after_id, page).await?;
            if candidates.is_empty() {
                break;
            }

            for session_id in &candidates {
                after_id = *session_id;
                report.processed += 1;

                match self.maybe_finalize(*session_id).await {
                    Ok(FinalizeOutcome::Finalized { .. }) => report.finalized += 1,
                    Ok(FinalizeOutcome::Skipped { .. }) => report.skipped += 1,
                    Err(e) => {
                        report.failed += 1;
                        tracing::error!(session_id, error = %e, "Sweep failed to finalize session");
                    }
                }
            }

            if (candidates.len() as i64) < page {
                break;
            }
        }

        if report.processed > 0 {
            tracing::info!(
                processed = report.processed,
                finalized = report.finalized,
                skipped = report.skipped,
                failed = report.failed,
                "Sweep run complete"
            );
        }

        Ok(report)
    }
}

/// Background service running the sweep on a fixed interval.
pub struct SweepScheduler {
    engine: ReviewEngine,
}

impl SweepScheduler {
    pub fn new(engine: ReviewEngine) -> Self {
        Self { engine }
    }

    /// Run the sweep loop until `cancel` is triggered.
    pub async fn run(&self, cancel: CancellationToken) {
        let config = self.engine.config();
        tracing::info!(
            interval_secs = config.sweep_interval_secs,
            max_per_run = config.sweep_max_per_run,
            page_size = config.sweep_page_size,
            "Sweep scheduler started"
        );

        let mut interval = tokio::time::interval(config.sweep_interval());

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Sweep scheduler stopping");
                    break;
                }
                _ = interval.tick() => {
                    if let Err(e) = self.engine.run_sweep(config.sweep_max_per_run).await {
                        tracing::error!(error = %e, "Sweep run failed");
                    }
                }
            }
        }
    }
}
