//! Catch models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use catchlog_core::error::CoreError;
use catchlog_core::status::StatusId;
use catchlog_core::types::{DbId, Timestamp};

/// Maximum length of a species name.
pub const MAX_SPECIES_LENGTH: usize = 100;

/// A row from the `catches` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Catch {
    pub id: DbId,
    pub session_id: DbId,
    pub user_id: DbId,
    pub group_id: DbId,
    pub species: String,
    pub quantity: i32,
    pub weight_grams: Option<i32>,
    pub status_id: StatusId,
    pub caught_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for logging a catch. Session, owner and group come from the path
/// and the parent session.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCatch {
    pub species: String,
    pub quantity: Option<i32>,
    pub weight_grams: Option<i32>,
    pub caught_at: Option<Timestamp>,
}

impl CreateCatch {
    pub fn validate(&self) -> Result<(), CoreError> {
        let species = self.species.trim();
        if species.is_empty() {
            return Err(CoreError::Validation("Species must not be empty".into()));
        }
        if species.len() > MAX_SPECIES_LENGTH {
            return Err(CoreError::Validation(format!(
                "Species exceeds maximum length of {MAX_SPECIES_LENGTH} characters"
            )));
        }
        if self.quantity.is_some_and(|q| q < 1) {
            return Err(CoreError::Validation("Quantity must be at least 1".into()));
        }
        if self.weight_grams.is_some_and(|w| w < 1) {
            return Err(CoreError::Validation("Weight must be positive".into()));
        }
        Ok(())
    }
}
