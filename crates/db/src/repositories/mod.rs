//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Methods that must run
//! inside a caller's transaction take a `&mut PgConnection` (pass
//! `&mut *tx`) or a generic executor instead.

pub mod catch_repo;
pub mod confirmation_repo;
pub mod group_repo;
pub mod notification_repo;
pub mod session_repo;
pub mod sweep_lock_repo;
pub mod user_repo;

pub use catch_repo::CatchRepo;
pub use confirmation_repo::ConfirmationRepo;
pub use group_repo::GroupRepo;
pub use notification_repo::NotificationRepo;
pub use session_repo::SessionRepo;
pub use sweep_lock_repo::SweepLockRepo;
pub use user_repo::UserRepo;
