//! The abstract persistence collaborator the progress engine runs against
//! (PRD-07).
//!
//! The engine is storage-agnostic: `stryv-db` implements this trait over
//! PostgreSQL, and tests implement it in memory. Every method that can be
//! invoked more than once for the same logical effect (instance
//! materialization, achievement unlock, the completion latch) must be
//! idempotent at the implementation's uniqueness boundary, not via caller
//! locks.

use std::collections::HashSet;

use async_trait::async_trait;

use crate::achievement::Achievement;
use crate::challenge::Challenge;
use crate::error::CoreError;
use crate::ledger::{NewTaskInstance, TaskInstance};
use crate::template::{TaskTemplate, TemplateScope};
use crate::types::{DbId, Timestamp};

#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Active (non-archived) templates for one scope tier.
    async fn task_templates(&self, scope: &TemplateScope) -> Result<Vec<TaskTemplate>, CoreError>;

    /// Templates by id, archived ones included (already-materialized days
    /// keep rendering after their set is superseded). Unknown ids are simply
    /// absent from the result.
    async fn task_templates_by_ids(&self, ids: &[DbId]) -> Result<Vec<TaskTemplate>, CoreError>;

    /// Task instances for one `(challenge, day)` pair.
    async fn task_instances(
        &self,
        challenge_id: DbId,
        day_number: i32,
    ) -> Result<Vec<TaskInstance>, CoreError>;

    /// Every task instance of a challenge, across all days.
    async fn challenge_task_instances(
        &self,
        challenge_id: DbId,
    ) -> Result<Vec<TaskInstance>, CoreError>;

    /// Insert a batch of new instances. A `(challenge_id, day_number,
    /// template_id)` collision is silently skipped, never an error, so
    /// concurrent materializations of the same day converge.
    async fn insert_task_instances(
        &self,
        instances: &[NewTaskInstance],
    ) -> Result<(), CoreError>;

    /// Persist a completion toggle. `completed_at` must be `Some` iff
    /// `completed`. Returns the updated instance.
    async fn set_task_completion(
        &self,
        instance_id: DbId,
        completed: bool,
        completed_at: Option<Timestamp>,
    ) -> Result<TaskInstance, CoreError>;

    async fn challenge(&self, challenge_id: DbId) -> Result<Challenge, CoreError>;

    /// Flip the one-way `completion_shown` latch. Returns true iff this call
    /// performed the flip; a latch already fired (or a lost race) returns
    /// false.
    async fn mark_completion_shown(&self, challenge_id: DbId) -> Result<bool, CoreError>;

    /// The static achievement catalog.
    async fn achievement_catalog(&self) -> Result<Vec<Achievement>, CoreError>;

    /// Ids of achievements the user has already unlocked.
    async fn unlocked_achievement_ids(&self, user_id: DbId) -> Result<HashSet<DbId>, CoreError>;

    /// Record an unlock. Returns true iff the row was newly inserted; a
    /// duplicate (including one from a concurrent evaluation) is a no-op
    /// returning false.
    async fn insert_unlocked_achievement(
        &self,
        user_id: DbId,
        achievement_id: DbId,
        unlocked_at: Timestamp,
    ) -> Result<bool, CoreError>;
}
