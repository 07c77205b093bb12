//! Repository for the `task_instances` table.

use sqlx::PgPool;
use stryv_core::ledger::NewTaskInstance;
use stryv_core::types::{DbId, Timestamp};

use crate::models::task_instance::TaskInstance;

/// Column list for `task_instances` queries.
const COLUMNS: &str = "\
    id, challenge_id, template_id, day_number, completed, completed_at, \
    created_at, updated_at";

/// Provides CRUD operations for per-day task instances.
pub struct TaskInstanceRepo;

impl TaskInstanceRepo {
    /// Instances for one `(challenge, day)` pair.
    pub async fn list_for_day(
        pool: &PgPool,
        challenge_id: DbId,
        day_number: i32,
    ) -> Result<Vec<TaskInstance>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM task_instances \
             WHERE challenge_id = $1 AND day_number = $2 \
             ORDER BY id"
        );
        sqlx::query_as::<_, TaskInstance>(&query)
            .bind(challenge_id)
            .bind(day_number)
            .fetch_all(pool)
            .await
    }

    /// Every instance of a challenge, across all days.
    pub async fn list_for_challenge(
        pool: &PgPool,
        challenge_id: DbId,
    ) -> Result<Vec<TaskInstance>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM task_instances \
             WHERE challenge_id = $1 \
             ORDER BY day_number, id"
        );
        sqlx::query_as::<_, TaskInstance>(&query)
            .bind(challenge_id)
            .fetch_all(pool)
            .await
    }

    /// Insert a batch of instances in a single statement.
    ///
    /// Uses a multi-row INSERT with `ON CONFLICT DO NOTHING` on
    /// `(challenge_id, day_number, template_id)`: a concurrent
    /// materialization's rows are skipped, and the caller re-reads the day to
    /// get the authoritative set.
    pub async fn create_batch(
        pool: &PgPool,
        instances: &[NewTaskInstance],
    ) -> Result<Vec<TaskInstance>, sqlx::Error> {
        if instances.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = String::from(
            "INSERT INTO task_instances (challenge_id, template_id, day_number) VALUES ",
        );
        let mut placeholders = Vec::with_capacity(instances.len());
        let mut params_idx = 1;
        for _ in instances {
            placeholders.push(format!(
                "(${}, ${}, ${})",
                params_idx,
                params_idx + 1,
                params_idx + 2,
            ));
            params_idx += 3;
        }
        query.push_str(&placeholders.join(", "));
        query.push_str(&format!(
            " ON CONFLICT (challenge_id, day_number, template_id) DO NOTHING RETURNING {COLUMNS}"
        ));

        let mut q = sqlx::query_as::<_, TaskInstance>(&query);
        for instance in instances {
            q = q
                .bind(instance.challenge_id)
                .bind(instance.template_id)
                .bind(instance.day_number);
        }
        q.fetch_all(pool).await
    }

    /// Persist a completion toggle. `completed_at` is the caller's clock
    /// reading when completing, NULL when un-completing.
    pub async fn set_completion(
        pool: &PgPool,
        id: DbId,
        completed: bool,
        completed_at: Option<Timestamp>,
    ) -> Result<Option<TaskInstance>, sqlx::Error> {
        let query = format!(
            "UPDATE task_instances SET completed = $2, completed_at = $3 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TaskInstance>(&query)
            .bind(id)
            .bind(completed)
            .bind(completed_at)
            .fetch_optional(pool)
            .await
    }
}
