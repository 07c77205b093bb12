//! Task instance entity model.

use serde::Serialize;
use sqlx::FromRow;
use stryv_core::types::{DbId, Timestamp};

/// A row from the `task_instances` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TaskInstance {
    pub id: DbId,
    pub challenge_id: DbId,
    pub template_id: DbId,
    pub day_number: i32,
    pub completed: bool,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<TaskInstance> for stryv_core::TaskInstance {
    fn from(row: TaskInstance) -> Self {
        Self {
            id: row.id,
            challenge_id: row.challenge_id,
            template_id: row.template_id,
            day_number: row.day_number,
            completed: row.completed,
            completed_at: row.completed_at,
        }
    }
}
