//! Session review workflow services.
//!
//! [`ReviewEngine`] owns every state-changing review operation. It nominates
//! reviewers, records decisions, finalizes sessions and runs the periodic
//! sweep that finalizes anything the synchronous path missed. Catches are
//! logged through it under the same session lock. All writes go through
//! Postgres transactions; review events are published on the
//! [`EventBus`](catchlog_events::EventBus) only after the owning transaction
//! has committed.

pub mod catches;
pub mod config;
pub mod decision;
pub mod engine;
pub mod error;
pub mod events;
pub mod finalize;
pub mod nomination;
pub mod sweep;

pub use config::ReviewConfig;
pub use decision::{DecisionOutcome, Reviewer};
pub use engine::ReviewEngine;
pub use error::{ReviewError, ReviewResult};
pub use finalize::FinalizeOutcome;
pub use nomination::NominationOutcome;
pub use sweep::{SweepReport, SweepScheduler};
