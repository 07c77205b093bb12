//! Challenge calendar arithmetic (PRD-02).
//!
//! Converts a challenge's start date and "today" into a 1-based day index.
//! `now` is always an explicit parameter so the function stays pure and
//! testable; only the outermost caller reads the real clock, and the result
//! must be re-evaluated on every read because "today" changes outside the
//! application.

use chrono::NaiveDate;

use crate::types::Timestamp;

/// Compute which 1-based calendar day a challenge is on.
///
/// The difference is taken between the UTC start-of-day of `now` and
/// `start_date`, plus one, then clamped to `[1, total_days]`:
///
/// - a challenge never reports day 0, even when `now` precedes the start;
/// - past the end it stays pinned at `total_days` so completion detection
///   can still fire instead of the index rolling over.
pub fn current_day_index(start_date: NaiveDate, total_days: i32, now: Timestamp) -> i32 {
    debug_assert!(total_days >= 1, "total_days must be positive");

    let elapsed = now.date_naive().signed_duration_since(start_date).num_days();
    let day = elapsed.saturating_add(1);
    day.clamp(1, i64::from(total_days.max(1))) as i32
}
