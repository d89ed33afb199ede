//! Repository for the `catches` table.

use sqlx::{PgConnection, PgExecutor, PgPool};

use catchlog_core::status::{ReviewStatus, StatusId};
use catchlog_core::types::DbId;

use crate::models::catch::{Catch, CreateCatch};
use crate::models::session::Session;

/// Column list for `catches` queries.
const COLUMNS: &str = "id, session_id, user_id, group_id, species, quantity, weight_grams, \
    status_id, caught_at, created_at, updated_at";

/// Provides CRUD operations for catches.
pub struct CatchRepo;

impl CatchRepo {
    /// Log a pending catch under a session. Owner and group are copied from
    /// the session.
    ///
    /// Does not check the session's review state; callers serialize with
    /// finalization by holding the session row lock.
    pub async fn create<'e, E>(
        executor: E,
        session: &Session,
        input: &CreateCatch,
    ) -> Result<Catch, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO catches \
                (session_id, user_id, group_id, species, quantity, weight_grams, \
                 status_id, caught_at) \
             VALUES ($1, $2, $3, $4, COALESCE($5, 1), $6, $7, COALESCE($8, NOW())) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Catch>(&query)
            .bind(session.id)
            .bind(session.user_id)
            .bind(session.group_id)
            .bind(input.species.trim())
            .bind(input.quantity)
            .bind(input.weight_grams)
            .bind(ReviewStatus::Pending.id())
            .bind(input.caught_at)
            .fetch_one(executor)
            .await
    }

    /// List all catches of a session, oldest first.
    pub async fn list_for_session(
        pool: &PgPool,
        session_id: DbId,
    ) -> Result<Vec<Catch>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM catches WHERE session_id = $1 ORDER BY caught_at ASC, id ASC"
        );
        sqlx::query_as::<_, Catch>(&query)
            .bind(session_id)
            .fetch_all(pool)
            .await
    }

    /// Set the status of every catch in a session. Returns the number of
    /// rows updated.
    ///
    /// Only called from `SessionRepo::finalize_with_catches`, inside the
    /// finalization transaction.
    pub(crate) async fn set_status_for_session(
        conn: &mut PgConnection,
        session_id: DbId,
        status: StatusId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("UPDATE catches SET status_id = $2 WHERE session_id = $1")
            .bind(session_id)
            .bind(status)
            .execute(conn)
            .await?;
        Ok(result.rows_affected())
    }
}
