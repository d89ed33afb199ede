//! Integration tests for the review persistence layer:
//! - Confirmation uniqueness and first-decision-wins guards
//! - Atomic session + catch finalization write
//! - Schema-level finalization consistency
//! - Sweep candidate selection

use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::Utc;
use sqlx::PgPool;

use catchlog_core::review::FinalResult;
use catchlog_core::status::{ReviewState, ReviewStatus};
use catchlog_core::tokens::generate_decision_token;
use catchlog_db::models::catch::CreateCatch;
use catchlog_db::models::confirmation::NewConfirmation;
use catchlog_db::models::group::CreateGroup;
use catchlog_db::models::session::{CreateSession, Session};
use catchlog_db::models::user::CreateUser;
use catchlog_db::repositories::{
    CatchRepo, ConfirmationRepo, GroupRepo, SessionRepo, SweepLockRepo, UserRepo,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

static GROUP_SEQ: AtomicUsize = AtomicUsize::new(0);

async fn user(pool: &PgPool, name: &str) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            username: name.to_string(),
            email: format!("{name}@catchlog.test"),
            role: None,
        },
    )
    .await
    .unwrap()
    .id
}

async fn session(pool: &PgPool, owner: i64) -> Session {
    let group = GroupRepo::create(
        pool,
        &CreateGroup {
            name: format!("group-{owner}-{}", GROUP_SEQ.fetch_add(1, Ordering::Relaxed)),
        },
    )
    .await
    .unwrap();
    SessionRepo::create(
        pool,
        owner,
        &CreateSession {
            group_id: group.id,
            title: "Dawn on the lake".to_string(),
            started_at: None,
        },
    )
    .await
    .unwrap()
}

async fn add_catch(pool: &PgPool, session: &Session, species: &str) {
    CatchRepo::create(
        pool,
        session,
        &CreateCatch {
            species: species.to_string(),
            quantity: Some(1),
            weight_grams: Some(800),
            caught_at: None,
        },
    )
    .await
    .unwrap();
}

async fn nominate(pool: &PgPool, session_id: i64, reviewer_id: i64) -> bool {
    let mut tx = pool.begin().await.unwrap();
    let created = ConfirmationRepo::insert_pending(
        &mut *tx,
        &NewConfirmation {
            session_id,
            reviewer_id,
            token_hash: generate_decision_token().hash,
        },
    )
    .await
    .unwrap();
    SessionRepo::mark_under_review(&mut *tx, session_id).await.unwrap();
    tx.commit().await.unwrap();
    created.is_some()
}

// ---------------------------------------------------------------------------
// Confirmations
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn renominating_a_reviewer_creates_no_second_record(pool: PgPool) {
    let owner = user(&pool, "owner").await;
    let reviewer = user(&pool, "reviewer").await;
    let s = session(&pool, owner).await;

    assert!(nominate(&pool, s.id, reviewer).await);
    assert!(!nominate(&pool, s.id, reviewer).await);

    let records = ConfirmationRepo::list_for_session(&pool, s.id).await.unwrap();
    assert_eq!(records.len(), 1);
    assert!(records[0].is_pending());
    assert!(records[0].decided_at.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn second_decision_matches_no_row(pool: PgPool) {
    let owner = user(&pool, "owner").await;
    let reviewer = user(&pool, "reviewer").await;
    let s = session(&pool, owner).await;
    nominate(&pool, s.id, reviewer).await;

    let first = ConfirmationRepo::decide(
        &pool,
        s.id,
        reviewer,
        ReviewStatus::Approved,
        Some("legit"),
        Utc::now(),
    )
    .await
    .unwrap()
    .expect("pending record should be decided");
    assert_eq!(first.status(), ReviewStatus::Approved);
    assert_eq!(first.note.as_deref(), Some("legit"));

    let second = ConfirmationRepo::decide(
        &pool,
        s.id,
        reviewer,
        ReviewStatus::Rejected,
        None,
        Utc::now(),
    )
    .await
    .unwrap();
    assert!(second.is_none());

    let stored = ConfirmationRepo::find_for_reviewer(&pool, s.id, reviewer)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status(), ReviewStatus::Approved);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn decide_by_token_hash_uses_stored_digest(pool: PgPool) {
    let owner = user(&pool, "owner").await;
    let reviewer = user(&pool, "reviewer").await;
    let s = session(&pool, owner).await;
    let token = generate_decision_token();

    let mut tx = pool.begin().await.unwrap();
    ConfirmationRepo::insert_pending(
        &mut *tx,
        &NewConfirmation {
            session_id: s.id,
            reviewer_id: reviewer,
            token_hash: token.hash.clone(),
        },
    )
    .await
    .unwrap();
    tx.commit().await.unwrap();

    let decided = ConfirmationRepo::decide_by_token_hash(
        &pool,
        &token.hash,
        ReviewStatus::Rejected,
        None,
        Utc::now(),
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(decided.reviewer_id, reviewer);
    assert_eq!(decided.status(), ReviewStatus::Rejected);

    let unknown = ConfirmationRepo::find_by_token_hash(&pool, "0000").await.unwrap();
    assert!(unknown.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn review_queue_lists_only_pending_records(pool: PgPool) {
    let owner = user(&pool, "owner").await;
    let reviewer = user(&pool, "reviewer").await;
    let a = session(&pool, owner).await;
    let b = session(&pool, owner).await;
    nominate(&pool, a.id, reviewer).await;
    nominate(&pool, b.id, reviewer).await;

    ConfirmationRepo::decide(&pool, a.id, reviewer, ReviewStatus::Approved, None, Utc::now())
        .await
        .unwrap();

    let queue = ConfirmationRepo::review_queue_for_reviewer(&pool, reviewer)
        .await
        .unwrap();
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0].session_id, b.id);
    assert_eq!(queue[0].owner_id, owner);
}

// ---------------------------------------------------------------------------
// Finalization write
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn finalize_cascades_result_to_every_catch(pool: PgPool) {
    let owner = user(&pool, "owner").await;
    let reviewer = user(&pool, "reviewer").await;
    let s = session(&pool, owner).await;
    for species in ["Perch", "Roach", "Bream"] {
        add_catch(&pool, &s, species).await;
    }
    nominate(&pool, s.id, reviewer).await;

    let now = Utc::now();
    let mut tx = pool.begin().await.unwrap();
    let finalized = SessionRepo::finalize_with_catches(&mut *tx, s.id, FinalResult::Rejected, now)
        .await
        .unwrap()
        .expect("first finalization should write");
    tx.commit().await.unwrap();

    assert_eq!(finalized.catches_updated, 3);
    assert_eq!(finalized.session.review_state(), ReviewState::Finalized);
    assert_eq!(finalized.session.final_result(), Some(FinalResult::Rejected));
    assert!(finalized.session.finalized_at.is_some());

    let catches = CatchRepo::list_for_session(&pool, s.id).await.unwrap();
    assert!(catches
        .iter()
        .all(|c| c.status_id == ReviewStatus::Rejected.id()));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn finalize_is_compare_and_set(pool: PgPool) {
    let owner = user(&pool, "owner").await;
    let reviewer = user(&pool, "reviewer").await;
    let s = session(&pool, owner).await;
    add_catch(&pool, &s, "Pike").await;
    nominate(&pool, s.id, reviewer).await;

    let mut tx = pool.begin().await.unwrap();
    SessionRepo::finalize_with_catches(&mut *tx, s.id, FinalResult::Approved, Utc::now())
        .await
        .unwrap()
        .unwrap();
    tx.commit().await.unwrap();

    // A late writer with the opposite result must not win; dropping its
    // transaction discards the catch update too.
    let mut tx = pool.begin().await.unwrap();
    let second =
        SessionRepo::finalize_with_catches(&mut *tx, s.id, FinalResult::Rejected, Utc::now())
            .await
            .unwrap();
    assert!(second.is_none());
    tx.rollback().await.unwrap();

    let stored = SessionRepo::find_by_id(&pool, s.id).await.unwrap().unwrap();
    assert_eq!(stored.final_result(), Some(FinalResult::Approved));
    let catches = CatchRepo::list_for_session(&pool, s.id).await.unwrap();
    assert_eq!(catches[0].status_id, ReviewStatus::Approved.id());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn schema_rejects_result_without_finalized_at(pool: PgPool) {
    let owner = user(&pool, "owner").await;
    let s = session(&pool, owner).await;

    let result = sqlx::query("UPDATE sessions SET final_result_id = 2 WHERE id = $1")
        .bind(s.id)
        .execute(&pool)
        .await;

    let err = result.expect_err("check constraint should fire");
    let db_err = err.as_database_error().expect("database error");
    assert_eq!(db_err.constraint(), Some("ck_sessions_finalized_consistency"));
}

// ---------------------------------------------------------------------------
// Sweep candidates
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn sweep_candidates_require_closed_fully_decided_unfinalized(pool: PgPool) {
    let owner = user(&pool, "owner").await;
    let r1 = user(&pool, "r1").await;
    let r2 = user(&pool, "r2").await;

    // Eligible: closed, two decided records.
    let eligible = session(&pool, owner).await;
    nominate(&pool, eligible.id, r1).await;
    nominate(&pool, eligible.id, r2).await;
    for r in [r1, r2] {
        ConfirmationRepo::decide(&pool, eligible.id, r, ReviewStatus::Approved, None, Utc::now())
            .await
            .unwrap();
    }
    SessionRepo::close(&pool, eligible.id).await.unwrap();

    // Still pending.
    let pending = session(&pool, owner).await;
    nominate(&pool, pending.id, r1).await;
    nominate(&pool, pending.id, r2).await;
    ConfirmationRepo::decide(&pool, pending.id, r1, ReviewStatus::Rejected, None, Utc::now())
        .await
        .unwrap();
    SessionRepo::close(&pool, pending.id).await.unwrap();

    // Still open.
    let open = session(&pool, owner).await;
    nominate(&pool, open.id, r1).await;
    ConfirmationRepo::decide(&pool, open.id, r1, ReviewStatus::Approved, None, Utc::now())
        .await
        .unwrap();

    // No reviewers.
    let unreviewed = session(&pool, owner).await;
    SessionRepo::close(&pool, unreviewed.id).await.unwrap();

    let ids = SessionRepo::list_sweep_candidates(&pool, 0, 100).await.unwrap();
    assert_eq!(ids, vec![eligible.id]);

    let after = SessionRepo::list_sweep_candidates(&pool, eligible.id, 100)
        .await
        .unwrap();
    assert!(after.is_empty());

    let backlog = SessionRepo::count_awaiting_finalization(&pool).await.unwrap();
    assert_eq!(backlog, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn closing_twice_returns_none(pool: PgPool) {
    let owner = user(&pool, "owner").await;
    let s = session(&pool, owner).await;

    let closed = SessionRepo::close(&pool, s.id).await.unwrap().unwrap();
    assert!(closed.is_closed());
    assert!(closed.ended_at.is_some());
    assert!(SessionRepo::close(&pool, s.id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn sweep_lock_is_exclusive_across_connections(pool: PgPool) {
    let mut first = pool.acquire().await.unwrap();
    let mut second = pool.acquire().await.unwrap();

    assert!(SweepLockRepo::try_acquire(&mut *first).await.unwrap());
    assert!(!SweepLockRepo::try_acquire(&mut *second).await.unwrap());

    assert!(SweepLockRepo::release(&mut *first).await.unwrap());
    assert!(SweepLockRepo::try_acquire(&mut *second).await.unwrap());
    assert!(SweepLockRepo::release(&mut *second).await.unwrap());
}
