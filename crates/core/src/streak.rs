//! Streak derivation from the day-completion ledger (PRD-03).
//!
//! Both figures are pure derived functions of the ledger and are cheap enough
//! (O(days)) to recompute on every read. Stored streak columns, where they
//! exist, are display caches only and are never trusted as source of truth.

use std::collections::BTreeMap;

use serde::Serialize;

/// Current and longest consecutive-complete-day runs for one challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StreakSummary {
    /// Consecutive complete days ending at the most recent ledger day.
    pub current: i32,
    /// Longest run of consecutive complete days anywhere in history.
    pub longest: i32,
}

/// Derive streaks from a day-number → complete map.
///
/// Current streak: walk downward from the highest day present, counting
/// consecutive `true` entries. A day absent from the map breaks the run
/// exactly like an explicitly incomplete day.
///
/// Longest streak: ascending scan with a running counter that resets on any
/// `false`/absent day. The current run participates in the scan, so
/// `longest >= current` always holds.
pub fn compute_streaks(days: &BTreeMap<i32, bool>) -> StreakSummary {
    let Some((&last_day, _)) = days.iter().next_back() else {
        return StreakSummary {
            current: 0,
            longest: 0,
        };
    };

    let mut current = 0;
    let mut day = last_day;
    while day >= 1 && days.get(&day).copied().unwrap_or(false) {
        current += 1;
        day -= 1;
    }

    let mut longest = 0;
    let mut run = 0;
    for day in 1..=last_day {
        if days.get(&day).copied().unwrap_or(false) {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }

    StreakSummary { current, longest }
}
