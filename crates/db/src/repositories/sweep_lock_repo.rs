//! Session-level advisory lock guarding the finalization sweep.
//!
//! The lock belongs to a database connection, not a transaction, so the
//! caller must hold on to the same connection between acquire and release.

use sqlx::PgConnection;

use catchlog_core::sweep::SWEEP_LOCK_ID;

/// Acquires and releases the sweep's advisory lock.
pub struct SweepLockRepo;

impl SweepLockRepo {
    /// Try to take the sweep lock without waiting. Returns `false` when
    /// another connection already holds it.
    pub async fn try_acquire(conn: &mut PgConnection) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT pg_try_advisory_lock($1)")
            .bind(SWEEP_LOCK_ID)
            .fetch_one(conn)
            .await
    }

    /// Release the sweep lock held by this connection.
    pub async fn release(conn: &mut PgConnection) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT pg_advisory_unlock($1)")
            .bind(SWEEP_LOCK_ID)
            .fetch_one(conn)
            .await
    }
}
