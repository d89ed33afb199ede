//! Request handlers.
//!
//! Handlers validate input, check ownership, then delegate to repositories
//! in `catchlog_db` or to the review engine in `catchlog_review`. Errors are
//! mapped via [`AppError`](crate::error::AppError).

pub mod catch;
pub mod notification;
pub mod review;
pub mod session;
