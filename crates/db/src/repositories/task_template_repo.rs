//! Repository for the `task_templates` table.
//!
//! Templates are immutable once referenced by an instance: a set is
//! superseded by archiving the old rows and inserting new ones, never by
//! editing in place.

use sqlx::PgPool;
use stryv_core::template::TemplateScope;
use stryv_core::types::DbId;

use crate::models::task_template::{CreateTaskTemplate, TaskTemplate};

/// Column list for `task_templates` queries.
const COLUMNS: &str = "\
    id, name, description, weight, scope, user_id, group_id, \
    archived, created_at, updated_at";

/// Provides CRUD operations for task templates.
pub struct TaskTemplateRepo;

impl TaskTemplateRepo {
    /// Active (non-archived) templates for one scope tier.
    pub async fn list_active(
        pool: &PgPool,
        scope: &TemplateScope,
    ) -> Result<Vec<TaskTemplate>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM task_templates \
             WHERE scope = $1 \
               AND user_id IS NOT DISTINCT FROM $2 \
               AND group_id IS NOT DISTINCT FROM $3 \
               AND NOT archived \
             ORDER BY id"
        );
        sqlx::query_as::<_, TaskTemplate>(&query)
            .bind(scope.kind())
            .bind(scope.user_id())
            .bind(scope.group_id())
            .fetch_all(pool)
            .await
    }

    /// Templates by id, archived ones included: already-materialized days
    /// keep rendering after their set is superseded.
    pub async fn find_by_ids(
        pool: &PgPool,
        ids: &[DbId],
    ) -> Result<Vec<TaskTemplate>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!("SELECT {COLUMNS} FROM task_templates WHERE id = ANY($1) ORDER BY id");
        sqlx::query_as::<_, TaskTemplate>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// Create one template within a scope's set.
    pub async fn create(
        pool: &PgPool,
        scope: &TemplateScope,
        input: &CreateTaskTemplate,
    ) -> Result<TaskTemplate, sqlx::Error> {
        let query = format!(
            "INSERT INTO task_templates (name, description, weight, scope, user_id, group_id) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TaskTemplate>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.weight)
            .bind(scope.kind())
            .bind(scope.user_id())
            .bind(scope.group_id())
            .fetch_one(pool)
            .await
    }

    /// Archive a scope's entire active set (supersede). Returns the number of
    /// templates archived.
    pub async fn archive_set(pool: &PgPool, scope: &TemplateScope) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE task_templates SET archived = TRUE \
             WHERE scope = $1 \
               AND user_id IS NOT DISTINCT FROM $2 \
               AND group_id IS NOT DISTINCT FROM $3 \
               AND NOT archived",
        )
        .bind(scope.kind())
        .bind(scope.user_id())
        .bind(scope.group_id())
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
