//! Background worker: runs the finalization sweep on a schedule and
//! records the notifications it produces.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use catchlog_events::{EventBus, NotificationDispatcher};
use catchlog_review::{ReviewConfig, ReviewEngine, SweepScheduler};

/// Upper bound on waiting for background tasks after a shutdown signal.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catchlog_worker=debug,catchlog_review=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let review_config = ReviewConfig::from_env();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = catchlog_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    catchlog_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Worker connected to database");

    // --- Event bus + dispatcher ---
    let event_bus = Arc::new(EventBus::default());
    let dispatcher = NotificationDispatcher::new(pool.clone());
    let dispatcher_handle = tokio::spawn(dispatcher.run(event_bus.subscribe()));

    // --- Sweep ---
    let engine = ReviewEngine::new(pool, Arc::clone(&event_bus), review_config);
    let scheduler = SweepScheduler::new(engine);
    let cancel = CancellationToken::new();
    let sweep_cancel = cancel.clone();
    let sweep_handle = tokio::spawn(async move {
        scheduler.run(sweep_cancel).await;
    });

    tracing::info!("Worker started");

    shutdown_signal().await;
    cancel.cancel();

    stop_within(sweep_handle, SHUTDOWN_GRACE).await;

    // The scheduler (and its engine) is gone, so this is the last sender.
    drop(event_bus);
    if tokio::time::timeout(SHUTDOWN_GRACE, dispatcher_handle)
        .await
        .is_err()
    {
        tracing::warn!("Notification dispatcher did not drain in time");
    }

    tracing::info!("Worker stopped");
}

/// Wait for a cancelled task to finish, aborting it after `grace`.
///
/// An in-flight sweep run finishes before the loop observes the token. On
/// return the task and everything it captured have been dropped.
async fn stop_within(mut handle: JoinHandle<()>, grace: Duration) {
    if tokio::time::timeout(grace, &mut handle).await.is_ok() {
        return;
    }
    tracing::warn!("Sweep did not stop in time, aborting it");
    handle.abort();
    if let Err(e) = handle.await {
        if !e.is_cancelled() {
            tracing::error!(error = %e, "Sweep task failed while stopping");
        }
    }
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received SIGINT, shutting down"),
        () = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
