//! Domain logic for the CatchLog review workflow.
//!
//! This crate has no I/O: it holds the shared id/timestamp aliases, the
//! domain error type, the status enums backed by lookup tables, and the pure
//! review ledger / finalization state machine used by the DB, review and
//! API layers.

pub mod channels;
pub mod clock;
pub mod error;
pub mod event_types;
pub mod hashing;
pub mod review;
pub mod roles;
pub mod status;
pub mod sweep;
pub mod tokens;
pub mod types;
