//! Shared fixtures for review workflow integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use sqlx::PgPool;
use tokio::sync::broadcast;

use catchlog_core::clock::FixedClock;
use catchlog_db::models::catch::CreateCatch;
use catchlog_db::models::group::CreateGroup;
use catchlog_db::models::session::{CreateSession, Session};
use catchlog_db::models::user::CreateUser;
use catchlog_db::repositories::{CatchRepo, GroupRepo, SessionRepo, UserRepo};
use catchlog_events::{EventBus, PlatformEvent};
use catchlog_review::{ReviewConfig, ReviewEngine};

static GROUP_SEQ: AtomicUsize = AtomicUsize::new(0);

pub struct Harness {
    pub engine: ReviewEngine,
    pub events: broadcast::Receiver<PlatformEvent>,
    pub clock: Arc<FixedClock>,
}

pub fn harness(pool: PgPool) -> Harness {
    harness_with_config(pool, ReviewConfig::default())
}

pub fn harness_with_config(pool: PgPool, config: ReviewConfig) -> Harness {
    let bus = Arc::new(EventBus::default());
    let events = bus.subscribe();
    let clock = Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2026, 6, 1, 5, 30, 0).unwrap(),
    ));
    let engine = ReviewEngine::with_clock(pool, bus, config, clock.clone());
    Harness {
        engine,
        events,
        clock,
    }
}

/// Drain every event published so far.
pub fn drain(rx: &mut broadcast::Receiver<PlatformEvent>) -> Vec<PlatformEvent> {
    let mut out = Vec::new();
    while let Ok(event) = rx.try_recv() {
        out.push(event);
    }
    out
}

pub async fn user(pool: &PgPool, name: &str) -> i64 {
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

pub async fn session(pool: &PgPool, owner: i64, title: &str) -> Session {
    let group = GroupRepo::create(
        pool,
        &CreateGroup {
            name: format!("club-{}", GROUP_SEQ.fetch_add(1, Ordering::Relaxed)),
        },
    )
    .await
    .unwrap();
    SessionRepo::create(
        pool,
        owner,
        &CreateSession {
            group_id: group.id,
            title: title.to_string(),
            started_at: None,
        },
    )
    .await
    .unwrap()
}

pub async fn closed_session(pool: &PgPool, owner: i64, title: &str) -> Session {
    let s = session(pool, owner, title).await;
    SessionRepo::close(pool, s.id).await.unwrap().unwrap()
}

pub async fn add_catch(pool: &PgPool, session: &Session, species: &str, quantity: i32) {
    CatchRepo::create(
        pool,
        session,
        &CreateCatch {
            species: species.to_string(),
            quantity: Some(quantity),
            weight_grams: None,
            caught_at: None,
        },
    )
    .await
    .unwrap();
}

/// Make every `UPDATE catches` fail, or only those for `session_id`.
pub async fn fail_catch_updates(pool: &PgPool, session_id: Option<i64>) {
    sqlx::query(
        "CREATE OR REPLACE FUNCTION refuse_catch_update() RETURNS trigger AS $$ \
         BEGIN \
             RAISE EXCEPTION 'catch update refused for session %', OLD.session_id; \
         END; \
         $$ LANGUAGE plpgsql",
    )
    .execute(pool)
    .await
    .unwrap();

    let scope = match session_id {
        Some(id) => format!("WHEN (OLD.session_id = {id})"),
        None => String::new(),
    };
    sqlx::query(&format!(
        "CREATE TRIGGER trg_refuse_catch_update BEFORE UPDATE ON catches \
         FOR EACH ROW {scope} EXECUTE FUNCTION refuse_catch_update()"
    ))
    .execute(pool)
    .await
    .unwrap();
}

/// Undo [`fail_catch_updates`].
pub async fn allow_catch_updates(pool: &PgPool) {
    sqlx::query("DROP TRIGGER trg_refuse_catch_update ON catches")
        .execute(pool)
        .await
        .unwrap();
}
