//! Repository for the `achievements` catalog and `unlocked_achievements`.

use sqlx::PgPool;
use stryv_core::types::{DbId, Timestamp};

use crate::models::achievement::{Achievement, UnlockedAchievement};

/// Column list for `achievements` queries.
const COLUMNS: &str = "\
    id, name, description, requirement_type, requirement_value, points, \
    created_at, updated_at";

/// Column list for `unlocked_achievements` queries.
const UNLOCK_COLUMNS: &str =
    "id, user_id, achievement_id, unlocked_at, created_at, updated_at";

/// Provides read access to the catalog and dedup-safe unlock writes.
pub struct AchievementRepo;

impl AchievementRepo {
    /// The full static catalog.
    pub async fn catalog(pool: &PgPool) -> Result<Vec<Achievement>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM achievements ORDER BY id");
        sqlx::query_as::<_, Achievement>(&query).fetch_all(pool).await
    }

    /// Ids of achievements the user has unlocked.
    pub async fn unlocked_ids(pool: &PgPool, user_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> = sqlx::query_as(
            "SELECT achievement_id FROM unlocked_achievements WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Full unlock records for a user, newest first.
    pub async fn unlocked_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<UnlockedAchievement>, sqlx::Error> {
        let query = format!(
            "SELECT {UNLOCK_COLUMNS} FROM unlocked_achievements \
             WHERE user_id = $1 \
             ORDER BY unlocked_at DESC"
        );
        sqlx::query_as::<_, UnlockedAchievement>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Record an unlock.
    ///
    /// Uses `INSERT ... ON CONFLICT DO NOTHING` against the unique
    /// `(user_id, achievement_id)` constraint. Returns true iff the row was
    /// newly inserted; a duplicate attempt is a no-op returning false, not an
    /// error.
    pub async fn unlock(
        pool: &PgPool,
        user_id: DbId,
        achievement_id: DbId,
        unlocked_at: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO unlocked_achievements (user_id, achievement_id, unlocked_at) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (user_id, achievement_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(achievement_id)
        .bind(unlocked_at)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }
}
