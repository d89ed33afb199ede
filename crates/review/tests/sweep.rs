//! Integration tests for the finalization sweep.

mod common;

use sqlx::PgPool;

use catchlog_core::clock::Clock;
use catchlog_core::event_types::SESSION_FINALIZED;
use catchlog_core::review::FinalResult;
use catchlog_core::status::ReviewStatus;
use catchlog_db::models::session::Session;
use catchlog_db::repositories::{ConfirmationRepo, SessionRepo, SweepLockRepo};
use catchlog_review::{ReviewConfig, SweepReport};

use common::{
    add_catch, allow_catch_updates, closed_session, drain, fail_catch_updates, harness,
    harness_with_config, session, user, Harness,
};

/// A session whose only reviewer decided without the synchronous
/// finalization running, as after a failed post-decision attempt.
async fn stranded(h: &Harness, pool: &PgPool, owner: i64, reviewer: i64, closed: bool) -> Session {
    let s = if closed {
        closed_session(pool, owner, "Stranded").await
    } else {
        session(pool, owner, "Stranded").await
    };
    h.engine.nominate(s.id, &[reviewer]).await.unwrap();
    ConfirmationRepo::decide(
        pool,
        s.id,
        reviewer,
        ReviewStatus::Approved,
        None,
        h.clock.now(),
    )
    .await
    .unwrap()
    .unwrap();
    s
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn sweep_finalizes_stranded_closed_sessions(pool: PgPool) {
    let mut h = harness(pool.clone());
    let owner = user(&pool, "owner").await;
    let a = user(&pool, "alice").await;

    let closed = stranded(&h, &pool, owner, a, true).await;
    let open = stranded(&h, &pool, owner, a, false).await;
    drain(&mut h.events);

    let report = h.engine.run_sweep(100).await.unwrap();
    assert_eq!(
        report,
        SweepReport {
            processed: 1,
            finalized: 1,
            skipped: 0,
            failed: 0
        }
    );

    let closed = SessionRepo::find_by_id(&pool, closed.id).await.unwrap().unwrap();
    assert_eq!(closed.final_result(), Some(FinalResult::Approved));
    let open = SessionRepo::find_by_id(&pool, open.id).await.unwrap().unwrap();
    assert!(!open.is_finalized());

    let events = drain(&mut h.events);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_type, SESSION_FINALIZED);

    // Nothing is left for a second run.
    assert_eq!(h.engine.run_sweep(100).await.unwrap(), SweepReport::default());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn sweep_respects_cap_and_processes_lowest_ids_first(pool: PgPool) {
    let config = ReviewConfig {
        sweep_page_size: 4,
        ..ReviewConfig::default()
    };
    let h = harness_with_config(pool.clone(), config);
    let owner = user(&pool, "owner").await;
    let a = user(&pool, "alice").await;

    let mut ids = Vec::new();
    for _ in 0..50 {
        ids.push(stranded(&h, &pool, owner, a, true).await.id);
    }
    ids.sort_unstable();

    let report = h.engine.run_sweep(10).await.unwrap();
    assert_eq!(report.processed, 10);
    assert_eq!(report.finalized, 10);

    for (i, id) in ids.iter().enumerate() {
        let s = SessionRepo::find_by_id(&pool, *id).await.unwrap().unwrap();
        assert_eq!(s.is_finalized(), i < 10, "session #{i} (id {id})");
    }

    let remaining = SessionRepo::list_sweep_candidates(&pool, 0, 100).await.unwrap();
    assert_eq!(remaining.len(), 40);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn sweep_skips_sessions_with_pending_records(pool: PgPool) {
    let h = harness(pool.clone());
    let owner = user(&pool, "owner").await;
    let a = user(&pool, "alice").await;
    let b = user(&pool, "bob").await;

    let s = closed_session(&pool, owner, "Half decided").await;
    h.engine.nominate(s.id, &[a, b]).await.unwrap();
    ConfirmationRepo::decide(&pool, s.id, a, ReviewStatus::Rejected, None, h.clock.now())
        .await
        .unwrap();

    let report = h.engine.run_sweep(100).await.unwrap();
    assert_eq!(report.processed, 0);
    let s = SessionRepo::find_by_id(&pool, s.id).await.unwrap().unwrap();
    assert!(!s.is_finalized());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn sweep_does_nothing_while_lock_is_held(pool: PgPool) {
    let h = harness(pool.clone());
    let owner = user(&pool, "owner").await;
    let a = user(&pool, "alice").await;
    let s = stranded(&h, &pool, owner, a, true).await;

    let mut holder = pool.acquire().await.unwrap();
    assert!(SweepLockRepo::try_acquire(&mut *holder).await.unwrap());

    assert_eq!(h.engine.run_sweep(100).await.unwrap(), SweepReport::default());
    let unchanged = SessionRepo::find_by_id(&pool, s.id).await.unwrap().unwrap();
    assert!(!unchanged.is_finalized());

    SweepLockRepo::release(&mut *holder).await.unwrap();
    assert_eq!(h.engine.run_sweep(100).await.unwrap().finalized, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn sweep_and_synchronous_finalization_agree(pool: PgPool) {
    let mut h = harness(pool.clone());
    let owner = user(&pool, "owner").await;
    let a = user(&pool, "alice").await;
    let s = stranded(&h, &pool, owner, a, true).await;
    drain(&mut h.events);

    let (sweep, direct) = tokio::join!(h.engine.run_sweep(100), h.engine.maybe_finalize(s.id));
    let sweep = sweep.unwrap();
    let direct = direct.unwrap();

    assert_eq!(sweep.finalized + usize::from(direct.is_finalized()), 1);
    let finalized = drain(&mut h.events)
        .into_iter()
        .filter(|e| e.event_type == SESSION_FINALIZED)
        .count();
    assert_eq!(finalized, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn sweep_counts_a_failing_session_and_keeps_going(pool: PgPool) {
    let config = ReviewConfig {
        sweep_page_size: 2,
        ..ReviewConfig::default()
    };
    let h = harness_with_config(pool.clone(), config);
    let owner = user(&pool, "owner").await;
    let a = user(&pool, "alice").await;

    let mut ids = Vec::new();
    for _ in 0..5 {
        let s = stranded(&h, &pool, owner, a, true).await;
        add_catch(&pool, &s, "roach", 3).await;
        ids.push(s.id);
    }
    ids.sort_unstable();
    let broken = ids[1];

    fail_catch_updates(&pool, Some(broken)).await;

    let report = h.engine.run_sweep(100).await.unwrap();
    assert_eq!(
        report,
        SweepReport {
            processed: 5,
            finalized: 4,
            skipped: 0,
            failed: 1
        }
    );
    for id in &ids {
        let s = SessionRepo::find_by_id(&pool, *id).await.unwrap().unwrap();
        assert_eq!(s.is_finalized(), *id != broken, "session {id}");
    }

    allow_catch_updates(&pool).await;
    let retry = h.engine.run_sweep(100).await.unwrap();
    assert_eq!(retry.finalized, 1);
    let s = SessionRepo::find_by_id(&pool, broken).await.unwrap().unwrap();
    assert_eq!(s.final_result(), Some(FinalResult::Approved));
}
