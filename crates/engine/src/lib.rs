//! Stryv challenge progress engine.
//!
//! Orchestrates the core rules over a [`ProgressStore`] collaborator:
//!
//! - [`materializer`] — lazy, idempotent day materialization.
//! - [`view`] — day assembly with template display fallback.
//! - [`progress`] — ledger reads, streak/points snapshots, the toggle flow.
//! - [`unlocks`] — achievement evaluation with exactly-once announcement.
//! - [`detector`] — completion detection behind the `completion_shown` latch.
//!
//! All operations are driven synchronously by a user action; the engine runs
//! no background work and reads no wall clock (`now` is an explicit
//! parameter everywhere).

pub mod detector;
pub mod materializer;
pub mod progress;
pub mod unlocks;
pub mod view;

pub use detector::check_completion;
pub use materializer::ensure_day;
pub use progress::{
    challenge_progress, day_completion, toggle_and_refresh, toggle_task, ChallengeProgress,
    ToggleOutcome,
};
pub use stryv_core::store::ProgressStore;
pub use unlocks::{achievement_progress, evaluate_unlocks, AchievementProgress};
pub use view::{day_view, DayTask, DayView, UNKNOWN_TASK_NAME};
