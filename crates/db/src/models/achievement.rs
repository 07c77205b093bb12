//! Achievement catalog and unlock record models.

use serde::Serialize;
use sqlx::FromRow;
use stryv_core::achievement::RequirementType;
use stryv_core::error::CoreError;
use stryv_core::types::{DbId, Timestamp};

/// A row from the `achievements` table (static catalog).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Achievement {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub requirement_type: String,
    pub requirement_value: i64,
    pub points: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Achievement {
    /// Convert into the core record.
    pub fn into_core(self) -> Result<stryv_core::Achievement, CoreError> {
        let requirement_type = RequirementType::from_str_value(&self.requirement_type)
            .map_err(CoreError::Internal)?;
        Ok(stryv_core::Achievement {
            id: self.id,
            name: self.name,
            description: self.description,
            requirement_type,
            requirement_value: self.requirement_value,
            points: self.points,
        })
    }
}

/// A row from the `unlocked_achievements` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UnlockedAchievement {
    pub id: DbId,
    pub user_id: DbId,
    pub achievement_id: DbId,
    pub unlocked_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<UnlockedAchievement> for stryv_core::UnlockedAchievement {
    fn from(row: UnlockedAchievement) -> Self {
        Self {
            user_id: row.user_id,
            achievement_id: row.achievement_id,
            unlocked_at: row.unlocked_at,
        }
    }
}
