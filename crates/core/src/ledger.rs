//! The completion ledger: per-day completion state derived from task
//! instances (PRD-03).
//!
//! A day is complete iff it has at least one materialized instance and every
//! instance for that day is completed. Days that were never materialized are
//! absent from the map and are treated as incomplete by consumers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};

/// One concrete, per-day occurrence of a task template.
///
/// Duplicated from the `db` crate's row struct on purpose: core has zero
/// internal deps, so the storage layer converts its rows into these records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskInstance {
    pub id: DbId,
    pub challenge_id: DbId,
    pub template_id: DbId,
    pub day_number: i32,
    pub completed: bool,
    pub completed_at: Option<Timestamp>,
}

/// A task instance about to be materialized. `completed` starts false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTaskInstance {
    pub challenge_id: DbId,
    pub template_id: DbId,
    pub day_number: i32,
}

/// Per-day completion counts for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayProgress {
    pub completed: usize,
    pub total: usize,
    pub pct: u8,
}

/// Group a challenge's task instances into a day-number → complete map.
pub fn day_completion_map(instances: &[TaskInstance]) -> BTreeMap<i32, bool> {
    let mut days: BTreeMap<i32, bool> = BTreeMap::new();
    for instance in instances {
        days.entry(instance.day_number)
            .and_modify(|complete| *complete &= instance.completed)
            .or_insert(instance.completed);
    }
    days
}

/// Completion progress for a single day's instance set.
///
/// Returns `0/0` at 0% for an empty set (a day with no templates resolved).
pub fn day_progress(instances: &[TaskInstance]) -> DayProgress {
    let total = instances.len();
    let completed = instances.iter().filter(|i| i.completed).count();
    let pct = if total == 0 {
        0
    } else {
        ((completed as f64 / total as f64) * 100.0).round().min(100.0) as u8
    };
    DayProgress {
        completed,
        total,
        pct,
    }
}
