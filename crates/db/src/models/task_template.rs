//! Task template entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stryv_core::error::CoreError;
use stryv_core::template::TemplateScope;
use stryv_core::types::{DbId, Timestamp};

/// A row from the `task_templates` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TaskTemplate {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub weight: i32,
    /// Scope kind string; owner columns hold the matching id.
    pub scope: String,
    pub user_id: Option<DbId>,
    pub group_id: Option<DbId>,
    pub archived: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TaskTemplate {
    /// Convert into the core record.
    ///
    /// A scope the schema CHECK should have rejected surfaces as an internal
    /// error rather than a panic.
    pub fn into_core(self) -> Result<stryv_core::TaskTemplate, CoreError> {
        let scope = TemplateScope::from_parts(&self.scope, self.user_id, self.group_id)
            .map_err(CoreError::Internal)?;
        Ok(stryv_core::TaskTemplate {
            id: self.id,
            name: self.name,
            description: self.description,
            weight: self.weight,
            scope,
        })
    }
}

/// DTO for creating one template within a set.
///
/// Callers validate `name` and `weight` with the `stryv_core::template`
/// validators before insert.
#[derive(Debug, Deserialize)]
pub struct CreateTaskTemplate {
    pub name: String,
    pub description: Option<String>,
    pub weight: i32,
}
