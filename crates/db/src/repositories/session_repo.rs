//! Repository for the `sessions` table.
//!
//! The finalization write ([`SessionRepo::finalize_with_catches`]) is the
//! only place a session and its catches are mutated together.

use sqlx::{PgConnection, PgPool};

use catchlog_core::review::FinalResult;
use catchlog_core::status::{ReviewState, ReviewStatus, SessionStatus};
use catchlog_core::types::{DbId, Timestamp};

use crate::models::session::{CreateSession, Session};
use crate::repositories::CatchRepo;

/// Column list for `sessions` queries.
const COLUMNS: &str = "id, user_id, group_id, title, status_id, review_state_id, \
    started_at, ended_at, finalized_at, final_result_id, created_at, updated_at";

/// Closed, unfinalized, with at least one confirmation and none pending.
/// Binds `$1` closed status and `$2` pending status.
const AWAITING_FINALIZATION: &str = "s.status_id = $1 \
    AND s.finalized_at IS NULL \
    AND EXISTS (SELECT 1 FROM session_confirmations c WHERE c.session_id = s.id) \
    AND NOT EXISTS ( \
        SELECT 1 FROM session_confirmations c \
        WHERE c.session_id = s.id AND c.status_id = $2 \
    )";

/// Result of a successful finalization write.
#[derive(Debug, Clone)]
pub struct FinalizedSession {
    pub session: Session,
    pub catches_updated: u64,
}

/// Provides CRUD and review-state operations for sessions.
pub struct SessionRepo;

impl SessionRepo {
    /// Insert a new open, unreviewed session owned by `user_id`.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateSession,
    ) -> Result<Session, sqlx::Error> {
        let query = format!(
            "INSERT INTO sessions \
                (user_id, group_id, title, status_id, review_state_id, started_at) \
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, NOW())) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(user_id)
            .bind(input.group_id)
            .bind(input.title.trim())
            .bind(SessionStatus::Open.id())
            .bind(ReviewState::Unreviewed.id())
            .bind(input.started_at)
            .fetch_one(pool)
            .await
    }

    /// Find a session by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Session>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sessions WHERE id = $1");
        sqlx::query_as::<_, Session>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Close an open session. Returns `None` if the session does not exist
    /// or is already closed.
    pub async fn close(pool: &PgPool, id: DbId) -> Result<Option<Session>, sqlx::Error> {
        let query = format!(
            "UPDATE sessions SET status_id = $2, ended_at = COALESCE(ended_at, NOW()) \
             WHERE id = $1 AND status_id = $3 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(id)
            .bind(SessionStatus::Closed.id())
            .bind(SessionStatus::Open.id())
            .fetch_optional(pool)
            .await
    }

    /// Load a session and hold its row lock until the transaction ends.
    ///
    /// Nomination and finalization both take this lock, so for any one
    /// session they run one at a time.
    pub async fn lock_for_update(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Session>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sessions WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Session>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Move an unreviewed session under review. No-op for any other state.
    pub async fn mark_under_review(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE sessions SET review_state_id = $2 WHERE id = $1 AND review_state_id = $3",
        )
        .bind(id)
        .bind(ReviewState::UnderReview.id())
        .bind(ReviewState::Unreviewed.id())
        .execute(conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Finalize a session and cascade the result to every one of its
    /// catches, on the caller's transaction.
    ///
    /// The session update is a compare-and-set on `finalized_at IS NULL`.
    /// Returns `None` when another writer finalized first; the caller must
    /// then roll back so the catch update is discarded.
    pub async fn finalize_with_catches(
        conn: &mut PgConnection,
        id: DbId,
        result: FinalResult,
        finalized_at: Timestamp,
    ) -> Result<Option<FinalizedSession>, sqlx::Error> {
        let status = result.status().id();

        let catches_updated = CatchRepo::set_status_for_session(&mut *conn, id, status).await?;

        let query = format!(
            "UPDATE sessions \
             SET finalized_at = $2, final_result_id = $3, review_state_id = $4 \
             WHERE id = $1 AND finalized_at IS NULL AND review_state_id <> $4 \
             RETURNING {COLUMNS}"
        );
        let session = sqlx::query_as::<_, Session>(&query)
            .bind(id)
            .bind(finalized_at)
            .bind(status)
            .bind(ReviewState::Finalized.id())
            .fetch_optional(&mut *conn)
            .await?;

        Ok(session.map(|session| FinalizedSession {
            session,
            catches_updated,
        }))
    }

    /// IDs of closed, unfinalized sessions whose ledger is fully decided,
    /// in ascending ID order, starting after `after_id`.
    pub async fn list_sweep_candidates(
        pool: &PgPool,
        after_id: DbId,
        limit: i64,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let query = format!(
            "SELECT s.id FROM sessions s WHERE {AWAITING_FINALIZATION} AND s.id > $3 \
             ORDER BY s.id ASC LIMIT $4"
        );
        sqlx::query_scalar(&query)
            .bind(SessionStatus::Closed.id())
            .bind(ReviewStatus::Pending.id())
            .bind(after_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// How many sessions the sweep would currently pick up.
    pub async fn count_awaiting_finalization(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM sessions s WHERE {AWAITING_FINALIZATION}");
        sqlx::query_scalar(&query)
            .bind(SessionStatus::Closed.id())
            .bind(ReviewStatus::Pending.id())
            .fetch_one(pool)
            .await
    }
}
