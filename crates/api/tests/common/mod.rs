#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use catchlog_api::auth::jwt::{issue_token, TokenConfig};
use catchlog_api::config::ServerConfig;
use catchlog_api::router::build_app_router;
use catchlog_api::state::AppState;
use catchlog_core::roles::Role;
use catchlog_db::models::group::CreateGroup;
use catchlog_db::models::user::CreateUser;
use catchlog_db::repositories::{GroupRepo, UserRepo};
use catchlog_events::EventBus;
use catchlog_review::{ReviewConfig, ReviewEngine};

static GROUP_SEQ: AtomicUsize = AtomicUsize::new(0);

/// Base URL decision links are built on in tests.
pub const TEST_BASE_URL: &str = "http://catchlog.test/api/v1";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        tokens: TokenConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            issuer: "catchlog-test".to_string(),
            ttl_mins: 15,
        },
    }
}

/// Build the full application router over `pool`, with the production
/// middleware stack.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_bus(pool, Arc::new(EventBus::default()))
}

/// Like [`build_test_app`], publishing review events on `bus`.
pub fn build_test_app_with_bus(pool: PgPool, bus: Arc<EventBus>) -> Router {
    let config = test_config();
    let review_config = ReviewConfig {
        public_base_url: TEST_BASE_URL.to_string(),
        ..ReviewConfig::default()
    };
    let state = AppState {
        review: ReviewEngine::new(pool.clone(), bus, review_config),
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Sign a bearer token for a user acting as `role`.
pub fn token_for(user_id: i64, role: Role) -> String {
    issue_token(user_id, role, &test_config().tokens).expect("token signing")
}

pub async fn create_user(pool: &PgPool, name: &str) -> i64 {
    create_user_with_role(pool, name, "angler").await
}

pub async fn create_user_with_role(pool: &PgPool, name: &str, role: &str) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            username: name.to_string(),
            email: format!("{name}@catchlog.test"),
            role: Some(role.to_string()),
        },
    )
    .await
    .expect("user creation should succeed")
    .id
}

pub async fn create_group(pool: &PgPool) -> i64 {
    GroupRepo::create(
        pool,
        &CreateGroup {
            name: format!("club-{}", GROUP_SEQ.fetch_add(1, Ordering::Relaxed)),
        },
    )
    .await
    .expect("group creation should succeed")
    .id
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(
        app,
        Request::get(uri)
            .header("Authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(
        app,
        Request::post(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(
        app,
        Request::post(uri)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {token}"))
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
