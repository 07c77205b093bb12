//! Achievement evaluation and unlock persistence (PRD-05).

use serde::Serialize;
use stryv_core::achievement::{meets_requirement, progress_pct, Achievement, UserStats};
use stryv_core::error::CoreError;
use stryv_core::store::ProgressStore;
use stryv_core::types::{DbId, Timestamp};

/// Progress toward one catalog entry, for display.
#[derive(Debug, Clone, Serialize)]
pub struct AchievementProgress {
    pub achievement: Achievement,
    pub unlocked: bool,
    /// Clamped percentage toward the threshold; 100 once unlocked.
    pub pct: u8,
}

/// Evaluate the catalog against a stats snapshot and persist new unlocks.
///
/// Returns exactly the achievements this call newly unlocked: entries already
/// unlocked are skipped up front, and a duplicate insert (a concurrent
/// evaluation got there first) is swallowed by the store and excluded here,
/// so an unlock is announced at most once across all callers.
pub async fn evaluate_unlocks<S: ProgressStore + ?Sized>(
    store: &S,
    user_id: DbId,
    stats: &UserStats,
    now: Timestamp,
) -> Result<Vec<Achievement>, CoreError> {
    let catalog = store.achievement_catalog().await?;
    let already = store.unlocked_achievement_ids(user_id).await?;

    let mut newly_unlocked = Vec::new();
    for achievement in catalog {
        if already.contains(&achievement.id) {
            continue;
        }
        if !meets_requirement(achievement.requirement_type, achievement.requirement_value, stats) {
            continue;
        }
        if store
            .insert_unlocked_achievement(user_id, achievement.id, now)
            .await?
        {
            tracing::info!(
                user_id,
                achievement_id = achievement.id,
                name = %achievement.name,
                "achievement unlocked"
            );
            newly_unlocked.push(achievement);
        }
    }

    Ok(newly_unlocked)
}

/// Progress toward every catalog entry for display, unlocked ones pinned at
/// 100%.
pub async fn achievement_progress<S: ProgressStore + ?Sized>(
    store: &S,
    user_id: DbId,
    stats: &UserStats,
) -> Result<Vec<AchievementProgress>, CoreError> {
    let catalog = store.achievement_catalog().await?;
    let unlocked = store.unlocked_achievement_ids(user_id).await?;

    Ok(catalog
        .into_iter()
        .map(|achievement| {
            let is_unlocked = unlocked.contains(&achievement.id);
            let pct = if is_unlocked {
                100
            } else {
                progress_pct(
                    stats.stat_for(achievement.requirement_type),
                    achievement.requirement_value,
                )
            };
            AchievementProgress {
                achievement,
                unlocked: is_unlocked,
                pct,
            }
        })
        .collect())
}
