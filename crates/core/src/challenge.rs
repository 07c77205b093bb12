//! Challenge lifecycle and completion detection rules (PRD-06).
//!
//! A challenge moves through `Active(day 1..N)` to `FinalDay` purely by the
//! calendar, and into `CompletionShown` exactly once when the final day is
//! fully complete. Orthogonally, `is_active` flips to false on explicit
//! restart/abandon from any state and never comes back for that record.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::current_day_index;
use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// A user's (or group's) run of the fixed-length program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    pub id: DbId,
    pub user_id: DbId,
    /// Set when the challenge is group-linked.
    pub group_id: Option<DbId>,
    pub start_date: NaiveDate,
    pub total_days: i32,
    pub is_active: bool,
    /// One-way latch: flips false → true when the completion summary is
    /// produced, and never reverts.
    pub completion_shown: bool,
}

impl Challenge {
    /// The calendar day this challenge is on at `now`.
    pub fn day_index(&self, now: Timestamp) -> i32 {
        current_day_index(self.start_date, self.total_days, now)
    }
}

/// Derived lifecycle view of a challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum ChallengeState {
    /// Somewhere before the final day.
    Active { day: i32 },
    /// The calendar has reached (or passed) the last day; completion can fire.
    FinalDay,
    /// The completion summary has been produced. Terminal.
    CompletionShown,
    /// Explicitly restarted/abandoned. Terminal for this record.
    Abandoned,
}

/// Classify a challenge at `now`.
pub fn challenge_state(challenge: &Challenge, now: Timestamp) -> ChallengeState {
    if !challenge.is_active {
        return ChallengeState::Abandoned;
    }
    if challenge.completion_shown {
        return ChallengeState::CompletionShown;
    }
    let day = challenge.day_index(now);
    if day >= challenge.total_days {
        ChallengeState::FinalDay
    } else {
        ChallengeState::Active { day }
    }
}

/// The terminal condition for producing the completion summary.
///
/// True iff the calendar has reached the last day, the last day is fully
/// complete, and the latch has not fired yet.
pub fn completion_due(
    day_index: i32,
    total_days: i32,
    final_day_complete: bool,
    completion_shown: bool,
) -> bool {
    day_index >= total_days && final_day_complete && !completion_shown
}

/// Final statistics produced exactly once per challenge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionSummary {
    pub total_days: i32,
    /// Sum of template weight over all completed instances in the challenge.
    pub total_points: i64,
    pub longest_streak: i32,
    pub total_tasks_completed: i64,
}

/// Maximum supported challenge length in days.
pub const MAX_TOTAL_DAYS: i32 = 365;

/// Validate a challenge length before creation.
pub fn validate_total_days(total_days: i32) -> Result<(), String> {
    if (1..=MAX_TOTAL_DAYS).contains(&total_days) {
        Ok(())
    } else {
        Err(format!(
            "total_days must be in [1, {MAX_TOTAL_DAYS}], got {total_days}"
        ))
    }
}

/// Guard the `day_number ∈ [1, total_days]` invariant.
///
/// The calendar clamp upholds this for calendar-driven callers; a violation
/// here is a programming error, so debug builds assert before the error is
/// returned.
pub fn validate_day_number(day_number: i32, total_days: i32) -> Result<(), CoreError> {
    debug_assert!(
        (1..=total_days).contains(&day_number),
        "day_number {day_number} outside [1, {total_days}]"
    );
    if (1..=total_days).contains(&day_number) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "day_number {day_number} outside [1, {total_days}]"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn challenge(start: (i32, u32, u32), total_days: i32) -> Challenge {
        Challenge {
            id: 1,
            user_id: 10,
            group_id: None,
            start_date: NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
            total_days,
            is_active: true,
            completion_shown: false,
        }
    }

    fn at(y: i32, m: u32, d: u32) -> Timestamp {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    // -- challenge_state ------------------------------------------------------

    #[test]
    fn active_mid_challenge() {
        let state = challenge_state(&challenge((2025, 3, 1), 75), at(2025, 3, 5));
        assert_eq!(state, ChallengeState::Active { day: 5 });
    }

    #[test]
    fn final_day_by_calendar() {
        let state = challenge_state(&challenge((2025, 3, 1), 3), at(2025, 3, 3));
        assert_eq!(state, ChallengeState::FinalDay);
    }

    #[test]
    fn still_final_day_after_the_end() {
        let state = challenge_state(&challenge((2025, 3, 1), 3), at(2025, 4, 1));
        assert_eq!(state, ChallengeState::FinalDay);
    }

    #[test]
    fn completion_shown_is_terminal() {
        let mut ch = challenge((2025, 3, 1), 3);
        ch.completion_shown = true;
        assert_eq!(challenge_state(&ch, at(2025, 4, 1)), ChallengeState::CompletionShown);
    }

    #[test]
    fn abandoned_wins_over_everything() {
        let mut ch = challenge((2025, 3, 1), 3);
        ch.completion_shown = true;
        ch.is_active = false;
        assert_eq!(challenge_state(&ch, at(2025, 4, 1)), ChallengeState::Abandoned);
    }

    // -- completion_due -------------------------------------------------------

    #[test]
    fn due_on_final_day_when_complete() {
        assert!(completion_due(3, 3, true, false));
    }

    #[test]
    fn due_past_final_day_when_complete() {
        assert!(completion_due(3, 3, true, false));
    }

    #[test]
    fn not_due_before_final_day() {
        assert!(!completion_due(2, 3, true, false));
    }

    #[test]
    fn not_due_when_final_day_incomplete() {
        assert!(!completion_due(3, 3, false, false));
    }

    #[test]
    fn never_due_once_latch_fired() {
        assert!(!completion_due(3, 3, true, true));
    }

    // -- validate_total_days --------------------------------------------------

    #[test]
    fn standard_lengths_accepted() {
        assert!(validate_total_days(1).is_ok());
        assert!(validate_total_days(30).is_ok());
        assert!(validate_total_days(75).is_ok());
        assert!(validate_total_days(MAX_TOTAL_DAYS).is_ok());
    }

    #[test]
    fn non_positive_length_rejected() {
        assert!(validate_total_days(0).is_err());
        assert!(validate_total_days(-5).is_err());
    }

    #[test]
    fn overlong_length_rejected() {
        assert!(validate_total_days(MAX_TOTAL_DAYS + 1).is_err());
    }

    // -- validate_day_number --------------------------------------------------

    #[test]
    fn day_number_in_range_is_ok() {
        assert!(validate_day_number(1, 75).is_ok());
        assert!(validate_day_number(75, 75).is_ok());
    }

    #[test]
    #[cfg_attr(debug_assertions, should_panic(expected = "outside"))]
    fn day_number_zero_fails_loudly() {
        let _ = validate_day_number(0, 75);
    }

    #[test]
    #[cfg_attr(debug_assertions, should_panic(expected = "outside"))]
    fn day_number_past_end_fails_loudly() {
        let _ = validate_day_number(76, 75);
    }
}
