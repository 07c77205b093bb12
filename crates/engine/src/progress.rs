//! Challenge progress reads and the task-toggle flow (PRD-03).
//!
//! Every figure here is recomputed from the completion ledger on each call.
//! Stored aggregates are never consulted: before anything authoritative
//! happens (achievement evaluation, completion detection) the source data is
//! re-read and re-derived, so cached display values can never drift into the
//! record of truth.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use stryv_core::challenge::CompletionSummary;
use stryv_core::error::CoreError;
use stryv_core::ledger::{day_completion_map, TaskInstance};
use stryv_core::store::ProgressStore;
use stryv_core::streak::{compute_streaks, StreakSummary};
use stryv_core::types::{DbId, Timestamp};

use crate::detector::check_completion;

/// Authoritative derived snapshot of one challenge's progress.
#[derive(Debug, Clone, Serialize)]
pub struct ChallengeProgress {
    pub challenge_id: DbId,
    /// Calendar day the challenge is on at the evaluation instant.
    pub day_index: i32,
    pub streaks: StreakSummary,
    /// Sum of template weight over all completed instances.
    pub total_points: i64,
    pub total_tasks_completed: i64,
    /// Day-number → complete, for calendar rendering.
    pub days: BTreeMap<i32, bool>,
}

/// Result of a toggle followed by a fresh recomputation.
#[derive(Debug, Clone, Serialize)]
pub struct ToggleOutcome {
    pub instance: TaskInstance,
    pub progress: ChallengeProgress,
    /// Present exactly once per challenge lifetime: the toggle that satisfied
    /// the terminal condition.
    pub completion: Option<CompletionSummary>,
}

/// Persist a task completion toggle.
///
/// `completed_at` is stamped with the caller's `now` when completing and
/// cleared when un-completing.
pub async fn toggle_task<S: ProgressStore + ?Sized>(
    store: &S,
    instance_id: DbId,
    completed: bool,
    now: Timestamp,
) -> Result<TaskInstance, CoreError> {
    let completed_at = completed.then_some(now);
    store
        .set_task_completion(instance_id, completed, completed_at)
        .await
}

/// Fresh day-number → complete map for a challenge.
pub async fn day_completion<S: ProgressStore + ?Sized>(
    store: &S,
    challenge_id: DbId,
) -> Result<BTreeMap<i32, bool>, CoreError> {
    let instances = store.challenge_task_instances(challenge_id).await?;
    Ok(day_completion_map(&instances))
}

/// Recompute a challenge's full progress snapshot from the ledger.
pub async fn challenge_progress<S: ProgressStore + ?Sized>(
    store: &S,
    challenge_id: DbId,
    now: Timestamp,
) -> Result<ChallengeProgress, CoreError> {
    let challenge = store.challenge(challenge_id).await?;
    let instances = store.challenge_task_instances(challenge_id).await?;
    let days = day_completion_map(&instances);
    let weights = template_weights(store, &instances).await?;

    let total_points = instances
        .iter()
        .filter(|i| i.completed)
        .map(|i| i64::from(weights.get(&i.template_id).copied().unwrap_or(0)))
        .sum();
    let total_tasks_completed = instances.iter().filter(|i| i.completed).count() as i64;

    Ok(ChallengeProgress {
        challenge_id,
        day_index: challenge.day_index(now),
        streaks: compute_streaks(&days),
        total_points,
        total_tasks_completed,
        days,
    })
}

/// Toggle a task, then re-derive progress and completion from fresh reads.
///
/// The completion write persists before anything is recomputed; a rejected
/// write propagates its error and no derived state is produced from it.
pub async fn toggle_and_refresh<S: ProgressStore + ?Sized>(
    store: &S,
    challenge_id: DbId,
    instance_id: DbId,
    completed: bool,
    now: Timestamp,
) -> Result<ToggleOutcome, CoreError> {
    let instances = store.challenge_task_instances(challenge_id).await?;
    if !instances.iter().any(|i| i.id == instance_id) {
        return Err(CoreError::Validation(format!(
            "task instance {instance_id} does not belong to challenge {challenge_id}"
        )));
    }

    let instance = toggle_task(store, instance_id, completed, now).await?;
    let progress = challenge_progress(store, challenge_id, now).await?;
    let completion = check_completion(store, challenge_id, now).await?;

    Ok(ToggleOutcome {
        instance,
        progress,
        completion,
    })
}

/// Template-id → weight map for a set of instances.
///
/// Missing templates contribute weight 0 rather than failing the read.
pub(crate) async fn template_weights<S: ProgressStore + ?Sized>(
    store: &S,
    instances: &[TaskInstance],
) -> Result<HashMap<DbId, i32>, CoreError> {
    let mut ids: Vec<DbId> = instances.iter().map(|i| i.template_id).collect();
    ids.sort_unstable();
    ids.dedup();

    let templates = store.task_templates_by_ids(&ids).await?;
    Ok(templates.into_iter().map(|t| (t.id, t.weight)).collect())
}
