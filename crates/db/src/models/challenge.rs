//! Challenge entity model and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stryv_core::types::{DbId, Timestamp};

/// A row from the `challenges` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Challenge {
    pub id: DbId,
    pub user_id: DbId,
    pub group_id: Option<DbId>,
    pub start_date: NaiveDate,
    pub total_days: i32,
    pub is_active: bool,
    pub completion_shown: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<Challenge> for stryv_core::Challenge {
    fn from(row: Challenge) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            group_id: row.group_id,
            start_date: row.start_date,
            total_days: row.total_days,
            is_active: row.is_active,
            completion_shown: row.completion_shown,
        }
    }
}

/// DTO for starting a new challenge.
///
/// Callers validate `total_days` with
/// [`stryv_core::challenge::validate_total_days`] before insert.
#[derive(Debug, Deserialize)]
pub struct CreateChallenge {
    pub user_id: DbId,
    pub group_id: Option<DbId>,
    pub start_date: NaiveDate,
    pub total_days: i32,
}
