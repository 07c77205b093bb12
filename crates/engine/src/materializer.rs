//! Lazy day materialization (PRD-04).
//!
//! A day's task set is created once, from whatever template tier is in effect
//! at that moment, and is frozen afterwards: later template edits never
//! retroactively alter an already-materialized day.

use stryv_core::challenge::{validate_day_number, Challenge};
use stryv_core::error::CoreError;
use stryv_core::ledger::{NewTaskInstance, TaskInstance};
use stryv_core::store::ProgressStore;
use stryv_core::template::{scope_fallback, TaskTemplate};
use stryv_core::types::DbId;

/// Ensure task instances exist for `(challenge, day_number)` and return them.
///
/// If the day already has instances they are returned unchanged: no
/// re-creation, no template re-sync. Otherwise one instance per resolved
/// template is inserted through the deduplicating batch insert and the
/// persisted set is re-read, so two near-simultaneous materializations of the
/// same day converge on exactly one instance per template.
///
/// A day for which no template tier resolves returns an empty list; the
/// caller renders an empty state, not an error.
pub async fn ensure_day<S: ProgressStore + ?Sized>(
    store: &S,
    challenge_id: DbId,
    day_number: i32,
) -> Result<Vec<TaskInstance>, CoreError> {
    let challenge = store.challenge(challenge_id).await?;
    validate_day_number(day_number, challenge.total_days)?;

    let existing = store.task_instances(challenge_id, day_number).await?;
    if !existing.is_empty() {
        return Ok(existing);
    }

    let templates = resolve_templates(store, &challenge).await?;
    if templates.is_empty() {
        tracing::debug!(challenge_id, day_number, "no templates resolved, day left empty");
        return Ok(Vec::new());
    }

    let instances: Vec<NewTaskInstance> = templates
        .iter()
        .map(|template| NewTaskInstance {
            challenge_id,
            template_id: template.id,
            day_number,
        })
        .collect();

    store.insert_task_instances(&instances).await?;
    tracing::debug!(
        challenge_id,
        day_number,
        count = instances.len(),
        "materialized day"
    );

    // Re-read rather than trusting our own batch: under a concurrent
    // materialization some rows are the other writer's.
    store.task_instances(challenge_id, day_number).await
}

/// Resolve the template set in effect for a challenge.
///
/// Strict tier order: group-owned (when group-linked), then the user's custom
/// set, then the global defaults. The first non-empty tier wins outright.
async fn resolve_templates<S: ProgressStore + ?Sized>(
    store: &S,
    challenge: &Challenge,
) -> Result<Vec<TaskTemplate>, CoreError> {
    for scope in scope_fallback(challenge.user_id, challenge.group_id) {
        let templates = store.task_templates(&scope).await?;
        if !templates.is_empty() {
            return Ok(templates);
        }
    }
    Ok(Vec::new())
}
