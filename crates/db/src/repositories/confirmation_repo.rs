//! Repository for the `session_confirmations` table.
//!
//! A record moves from pending to a terminal status exactly once: every
//! decision update is guarded by `status_id = pending`, so a second
//! decision (or a duplicate submission) matches no row.

use sqlx::{PgConnection, PgExecutor, PgPool};

use catchlog_core::status::{ReviewStatus, StatusId};
use catchlog_core::types::{DbId, Timestamp};

use crate::models::confirmation::{Confirmation, NewConfirmation, ReviewQueueItem};

/// Column list for `session_confirmations` queries.
const COLUMNS: &str = "id, session_id, reviewer_id, status_id, note, decided_at, \
    token_hash, created_at, updated_at";

/// Provides CRUD and decision operations for confirmation records.
pub struct ConfirmationRepo;

impl ConfirmationRepo {
    /// Insert a pending record unless one already exists for the
    /// (session, reviewer) pair.
    ///
    /// Returns the created row, or `None` when the reviewer was already
    /// nominated.
    pub async fn insert_pending(
        conn: &mut PgConnection,
        input: &NewConfirmation,
    ) -> Result<Option<Confirmation>, sqlx::Error> {
        let query = format!(
            "INSERT INTO session_confirmations (session_id, reviewer_id, status_id, token_hash) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT ON CONSTRAINT uq_session_confirmations_session_reviewer DO NOTHING \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Confirmation>(&query)
            .bind(input.session_id)
            .bind(input.reviewer_id)
            .bind(ReviewStatus::Pending.id())
            .bind(&input.token_hash)
            .fetch_optional(conn)
            .await
    }

    /// List every record of a session, in nomination order.
    pub async fn list_for_session<'e, E>(
        executor: E,
        session_id: DbId,
    ) -> Result<Vec<Confirmation>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {COLUMNS} FROM session_confirmations \
             WHERE session_id = $1 \
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, Confirmation>(&query)
            .bind(session_id)
            .fetch_all(executor)
            .await
    }

    /// Snapshot of the status of every record of a session.
    pub async fn statuses_for_session<'e, E>(
        executor: E,
        session_id: DbId,
    ) -> Result<Vec<StatusId>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar(
            "SELECT status_id FROM session_confirmations WHERE session_id = $1 ORDER BY id ASC",
        )
        .bind(session_id)
        .fetch_all(executor)
        .await
    }

    /// Find the record for a (session, reviewer) pair.
    pub async fn find_for_reviewer(
        pool: &PgPool,
        session_id: DbId,
        reviewer_id: DbId,
    ) -> Result<Option<Confirmation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM session_confirmations \
             WHERE session_id = $1 AND reviewer_id = $2"
        );
        sqlx::query_as::<_, Confirmation>(&query)
            .bind(session_id)
            .bind(reviewer_id)
            .fetch_optional(pool)
            .await
    }

    /// Find a record by the digest of its decision token.
    pub async fn find_by_token_hash(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<Option<Confirmation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM session_confirmations WHERE token_hash = $1");
        sqlx::query_as::<_, Confirmation>(&query)
            .bind(token_hash)
            .fetch_optional(pool)
            .await
    }

    /// Record a reviewer's decision if their record is still pending.
    ///
    /// Returns `None` if there is no pending record for the pair, either
    /// because none exists or because it was already decided.
    pub async fn decide(
        pool: &PgPool,
        session_id: DbId,
        reviewer_id: DbId,
        status: ReviewStatus,
        note: Option<&str>,
        decided_at: Timestamp,
    ) -> Result<Option<Confirmation>, sqlx::Error> {
        let query = format!(
            "UPDATE session_confirmations \
             SET status_id = $3, note = $4, decided_at = $5 \
             WHERE session_id = $1 AND reviewer_id = $2 AND status_id = $6 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Confirmation>(&query)
            .bind(session_id)
            .bind(reviewer_id)
            .bind(status.id())
            .bind(note)
            .bind(decided_at)
            .bind(ReviewStatus::Pending.id())
            .fetch_optional(pool)
            .await
    }

    /// Record a decision through a decision token if the record is still
    /// pending. Same `None` semantics as [`ConfirmationRepo::decide`].
    pub async fn decide_by_token_hash(
        pool: &PgPool,
        token_hash: &str,
        status: ReviewStatus,
        note: Option<&str>,
        decided_at: Timestamp,
    ) -> Result<Option<Confirmation>, sqlx::Error> {
        let query = format!(
            "UPDATE session_confirmations \
             SET status_id = $2, note = $3, decided_at = $4 \
             WHERE token_hash = $1 AND status_id = $5 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Confirmation>(&query)
            .bind(token_hash)
            .bind(status.id())
            .bind(note)
            .bind(decided_at)
            .bind(ReviewStatus::Pending.id())
            .fetch_optional(pool)
            .await
    }

    /// Pending confirmations assigned to a reviewer, oldest nomination first.
    pub async fn review_queue_for_reviewer(
        pool: &PgPool,
        reviewer_id: DbId,
    ) -> Result<Vec<ReviewQueueItem>, sqlx::Error> {
        sqlx::query_as::<_, ReviewQueueItem>(
            "SELECT \
                c.id AS confirmation_id, \
                c.session_id, \
                s.title AS session_title, \
                s.user_id AS owner_id, \
                s.group_id, \
                c.created_at AS nominated_at \
             FROM session_confirmations c \
             JOIN sessions s ON s.id = c.session_id \
             WHERE c.reviewer_id = $1 AND c.status_id = $2 \
             ORDER BY c.created_at ASC, c.id ASC",
        )
        .bind(reviewer_id)
        .bind(ReviewStatus::Pending.id())
        .fetch_all(pool)
        .await
    }
}
