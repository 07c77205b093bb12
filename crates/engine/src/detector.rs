//! Challenge completion detection (PRD-06).
//!
//! The celebratory summary must be produced exactly once per challenge, even
//! across reloads, re-renders, and concurrent tabs. The `completion_shown`
//! column is the latch: whoever wins the conditional flip computes and
//! returns the summary; everyone else gets `None`.

use stryv_core::challenge::{completion_due, CompletionSummary};
use stryv_core::error::CoreError;
use stryv_core::ledger::day_completion_map;
use stryv_core::store::ProgressStore;
use stryv_core::streak::compute_streaks;
use stryv_core::types::{DbId, Timestamp};

use crate::progress::template_weights;

/// Check the terminal condition and, on the first qualifying call, flip the
/// latch and return the final summary.
///
/// Re-run after every toggle that could complete the final day, not only on
/// page load: the user may finish the last task at any point inside the final
/// day window.
pub async fn check_completion<S: ProgressStore + ?Sized>(
    store: &S,
    challenge_id: DbId,
    now: Timestamp,
) -> Result<Option<CompletionSummary>, CoreError> {
    let challenge = store.challenge(challenge_id).await?;
    if challenge.completion_shown {
        return Ok(None);
    }

    let day_index = challenge.day_index(now);
    let instances = store.challenge_task_instances(challenge_id).await?;
    let days = day_completion_map(&instances);
    let final_day_complete = days.get(&challenge.total_days).copied().unwrap_or(false);

    if !completion_due(
        day_index,
        challenge.total_days,
        final_day_complete,
        challenge.completion_shown,
    ) {
        return Ok(None);
    }

    // The latch decides the winner under re-entrant detection; a lost race
    // means someone else is showing the summary.
    if !store.mark_completion_shown(challenge_id).await? {
        return Ok(None);
    }

    let weights = template_weights(store, &instances).await?;
    let total_points: i64 = instances
        .iter()
        .filter(|i| i.completed)
        .map(|i| i64::from(weights.get(&i.template_id).copied().unwrap_or(0)))
        .sum();
    let total_tasks_completed = instances.iter().filter(|i| i.completed).count() as i64;
    let streaks = compute_streaks(&days);

    tracing::info!(
        challenge_id,
        total_points,
        longest_streak = streaks.longest,
        "challenge completed"
    );

    Ok(Some(CompletionSummary {
        total_days: challenge.total_days,
        total_points,
        longest_streak: streaks.longest,
        total_tasks_completed,
    }))
}
