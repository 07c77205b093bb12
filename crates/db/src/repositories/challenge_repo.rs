//! Repository for the `challenges` table.

use sqlx::PgPool;
use stryv_core::types::DbId;

use crate::models::challenge::{Challenge, CreateChallenge};

/// Column list for `challenges` queries.
const COLUMNS: &str = "\
    id, user_id, group_id, start_date, total_days, \
    is_active, completion_shown, created_at, updated_at";

/// Provides CRUD operations for challenges.
pub struct ChallengeRepo;

impl ChallengeRepo {
    /// Start a new challenge.
    ///
    /// The partial unique indexes on active challenges reject a second active
    /// individual challenge for the same user (or a second active challenge
    /// for the same group); the violation surfaces as a `sqlx::Error` the
    /// caller maps to a conflict.
    pub async fn start(pool: &PgPool, input: &CreateChallenge) -> Result<Challenge, sqlx::Error> {
        let query = format!(
            "INSERT INTO challenges (user_id, group_id, start_date, total_days) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Challenge>(&query)
            .bind(input.user_id)
            .bind(input.group_id)
            .bind(input.start_date)
            .bind(input.total_days)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Challenge>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM challenges WHERE id = $1");
        sqlx::query_as::<_, Challenge>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The user's active individual challenge, if any.
    pub async fn find_active_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<Challenge>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM challenges \
             WHERE user_id = $1 AND is_active AND group_id IS NULL"
        );
        sqlx::query_as::<_, Challenge>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// The group's active challenge, if any.
    pub async fn find_active_for_group(
        pool: &PgPool,
        group_id: DbId,
    ) -> Result<Option<Challenge>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM challenges \
             WHERE group_id = $1 AND is_active"
        );
        sqlx::query_as::<_, Challenge>(&query)
            .bind(group_id)
            .fetch_optional(pool)
            .await
    }

    /// Deactivate a challenge on explicit restart/abandon.
    ///
    /// Terminal for this record regardless of completion state. Returns true
    /// iff the challenge was active; a repeat call is a no-op.
    pub async fn abandon(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE challenges SET is_active = FALSE WHERE id = $1 AND is_active")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Flip the one-way `completion_shown` latch.
    ///
    /// The row count is the latch: exactly one caller observes the flip,
    /// every later (or concurrent losing) caller gets false.
    pub async fn mark_completion_shown(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE challenges SET completion_shown = TRUE \
             WHERE id = $1 AND completion_shown = FALSE",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }
}
