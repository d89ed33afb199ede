//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts

pub mod catch;
pub mod confirmation;
pub mod group;
pub mod notification;
pub mod session;
pub mod user;
