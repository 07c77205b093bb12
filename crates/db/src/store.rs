//! [`ProgressStore`] implementation over PostgreSQL.
//!
//! Delegates to the repository layer and converts row structs into core
//! records at the boundary. All idempotence contracts are enforced by the
//! schema's unique constraints, not by locks.

use std::collections::HashSet;

use async_trait::async_trait;
use sqlx::PgPool;
use stryv_core::achievement::Achievement;
use stryv_core::challenge::Challenge;
use stryv_core::error::CoreError;
use stryv_core::ledger::{NewTaskInstance, TaskInstance};
use stryv_core::store::ProgressStore;
use stryv_core::template::{TaskTemplate, TemplateScope};
use stryv_core::types::{DbId, Timestamp};

use crate::repositories::{AchievementRepo, ChallengeRepo, TaskInstanceRepo, TaskTemplateRepo};

/// The PostgreSQL persistence collaborator.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Classify a sqlx error at the store boundary.
///
/// Unique-constraint violations (PostgreSQL 23505) map to `Conflict`;
/// everything else is internal. `RowNotFound` never reaches here; lookups
/// use `fetch_optional` and map misses per entity.
fn store_error(err: sqlx::Error) -> CoreError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
            let constraint = db_err.constraint().unwrap_or("unknown");
            CoreError::Conflict(format!(
                "Duplicate value violates unique constraint: {constraint}"
            ))
        }
        other => {
            tracing::error!(error = %other, "Database error");
            CoreError::Internal(other.to_string())
        }
    }
}

#[async_trait]
impl ProgressStore for PgStore {
    async fn task_templates(&self, scope: &TemplateScope) -> Result<Vec<TaskTemplate>, CoreError> {
        TaskTemplateRepo::list_active(&self.pool, scope)
            .await
            .map_err(store_error)?
            .into_iter()
            .map(|row| row.into_core())
            .collect()
    }

    async fn task_templates_by_ids(&self, ids: &[DbId]) -> Result<Vec<TaskTemplate>, CoreError> {
        TaskTemplateRepo::find_by_ids(&self.pool, ids)
            .await
            .map_err(store_error)?
            .into_iter()
            .map(|row| row.into_core())
            .collect()
    }

    async fn task_instances(
        &self,
        challenge_id: DbId,
        day_number: i32,
    ) -> Result<Vec<TaskInstance>, CoreError> {
        Ok(TaskInstanceRepo::list_for_day(&self.pool, challenge_id, day_number)
            .await
            .map_err(store_error)?
            .into_iter()
            .map(Into::into)
            .collect())
    }

    async fn challenge_task_instances(
        &self,
        challenge_id: DbId,
    ) -> Result<Vec<TaskInstance>, CoreError> {
        Ok(TaskInstanceRepo::list_for_challenge(&self.pool, challenge_id)
            .await
            .map_err(store_error)?
            .into_iter()
            .map(Into::into)
            .collect())
    }

    async fn insert_task_instances(
        &self,
        instances: &[NewTaskInstance],
    ) -> Result<(), CoreError> {
        TaskInstanceRepo::create_batch(&self.pool, instances)
            .await
            .map_err(store_error)?;
        Ok(())
    }

    async fn set_task_completion(
        &self,
        instance_id: DbId,
        completed: bool,
        completed_at: Option<Timestamp>,
    ) -> Result<TaskInstance, CoreError> {
        TaskInstanceRepo::set_completion(&self.pool, instance_id, completed, completed_at)
            .await
            .map_err(store_error)?
            .map(Into::into)
            .ok_or(CoreError::NotFound {
                entity: "task_instance",
                id: instance_id,
            })
    }

    async fn challenge(&self, challenge_id: DbId) -> Result<Challenge, CoreError> {
        ChallengeRepo::find_by_id(&self.pool, challenge_id)
            .await
            .map_err(store_error)?
            .map(Into::into)
            .ok_or(CoreError::NotFound {
                entity: "challenge",
                id: challenge_id,
            })
    }

    async fn mark_completion_shown(&self, challenge_id: DbId) -> Result<bool, CoreError> {
        ChallengeRepo::mark_completion_shown(&self.pool, challenge_id)
            .await
            .map_err(store_error)
    }

    async fn achievement_catalog(&self) -> Result<Vec<Achievement>, CoreError> {
        AchievementRepo::catalog(&self.pool)
            .await
            .map_err(store_error)?
            .into_iter()
            .map(|row| row.into_core())
            .collect()
    }

    async fn unlocked_achievement_ids(&self, user_id: DbId) -> Result<HashSet<DbId>, CoreError> {
        Ok(AchievementRepo::unlocked_ids(&self.pool, user_id)
            .await
            .map_err(store_error)?
            .into_iter()
            .collect())
    }

    async fn insert_unlocked_achievement(
        &self,
        user_id: DbId,
        achievement_id: DbId,
        unlocked_at: Timestamp,
    ) -> Result<bool, CoreError> {
        AchievementRepo::unlock(&self.pool, user_id, achievement_id, unlocked_at)
            .await
            .map_err(store_error)
    }
}
