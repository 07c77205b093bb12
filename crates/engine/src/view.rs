//! Display assembly for a single challenge day.

use std::collections::HashMap;

use serde::Serialize;
use stryv_core::error::CoreError;
use stryv_core::ledger::{day_progress, DayProgress, TaskInstance};
use stryv_core::store::ProgressStore;
use stryv_core::types::DbId;

use crate::materializer::ensure_day;

/// Display name used when an instance's template no longer resolves.
///
/// A dangling template reference degrades to this label instead of failing
/// the whole day's rendering.
pub const UNKNOWN_TASK_NAME: &str = "Unknown Task";

/// One task row as shown for a day.
#[derive(Debug, Clone, Serialize)]
pub struct DayTask {
    pub instance: TaskInstance,
    pub name: String,
    pub weight: i32,
}

/// A fully-assembled day: materialized tasks plus completion progress.
#[derive(Debug, Clone, Serialize)]
pub struct DayView {
    pub day_number: i32,
    pub tasks: Vec<DayTask>,
    pub progress: DayProgress,
}

/// Materialize (if needed) and assemble the view for one day.
pub async fn day_view<S: ProgressStore + ?Sized>(
    store: &S,
    challenge_id: DbId,
    day_number: i32,
) -> Result<DayView, CoreError> {
    let instances = ensure_day(store, challenge_id, day_number).await?;

    let mut template_ids: Vec<DbId> = instances.iter().map(|i| i.template_id).collect();
    template_ids.sort_unstable();
    template_ids.dedup();

    let templates = store.task_templates_by_ids(&template_ids).await?;
    let by_id: HashMap<DbId, _> = templates.into_iter().map(|t| (t.id, t)).collect();

    let progress = day_progress(&instances);
    let tasks = instances
        .into_iter()
        .map(|instance| match by_id.get(&instance.template_id) {
            Some(template) => DayTask {
                name: template.name.clone(),
                weight: template.weight,
                instance,
            },
            None => {
                tracing::warn!(
                    instance_id = instance.id,
                    template_id = instance.template_id,
                    "task instance references a missing template"
                );
                DayTask {
                    name: UNKNOWN_TASK_NAME.to_string(),
                    weight: 0,
                    instance,
                }
            }
        })
        .collect();

    Ok(DayView {
        day_number,
        tasks,
        progress,
    })
}
