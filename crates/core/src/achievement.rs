//! Achievement catalog rules and eligibility (PRD-05).
//!
//! Eligibility is a pure comparison of a user-stats snapshot against the
//! static catalog; the unlock side effect and its dedup guarantee live with
//! the storage collaborator and the engine.

use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};

/// Valid requirement type strings as stored in the `requirement_type` column.
pub const REQUIREMENT_STREAK: &str = "streak";
pub const REQUIREMENT_POINTS: &str = "points";
pub const REQUIREMENT_TASKS: &str = "tasks";
pub const REQUIREMENT_CHALLENGES: &str = "challenges";

/// All valid requirement type strings.
pub const VALID_REQUIREMENT_TYPES: &[&str] = &[
    REQUIREMENT_STREAK,
    REQUIREMENT_POINTS,
    REQUIREMENT_TASKS,
    REQUIREMENT_CHALLENGES,
];

/// Which user statistic an achievement threshold is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementType {
    /// Longest day-streak ever reached.
    Streak,
    /// Total points accrued.
    Points,
    /// Total completed task instances.
    Tasks,
    /// Number of completed challenges.
    Challenges,
}

impl RequirementType {
    /// Convert from a database string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            REQUIREMENT_STREAK => Ok(Self::Streak),
            REQUIREMENT_POINTS => Ok(Self::Points),
            REQUIREMENT_TASKS => Ok(Self::Tasks),
            REQUIREMENT_CHALLENGES => Ok(Self::Challenges),
            _ => Err(format!(
                "Invalid requirement type '{s}'. Must be one of: {}",
                VALID_REQUIREMENT_TYPES.join(", ")
            )),
        }
    }

    /// Convert to the database string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Streak => REQUIREMENT_STREAK,
            Self::Points => REQUIREMENT_POINTS,
            Self::Tasks => REQUIREMENT_TASKS,
            Self::Challenges => REQUIREMENT_CHALLENGES,
        }
    }
}

/// One entry of the static achievement catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub requirement_type: RequirementType,
    pub requirement_value: i64,
    /// Reward points granted on unlock.
    pub points: i32,
}

/// A (user, achievement) unlock record. At most one per pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockedAchievement {
    pub user_id: DbId,
    pub achievement_id: DbId,
    pub unlocked_at: Timestamp,
}

/// Snapshot of the statistics achievements are evaluated against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    pub longest_streak: i32,
    pub total_points: i64,
    pub total_tasks_completed: i64,
    pub completed_challenges: i64,
}

impl UserStats {
    /// The statistic an achievement of the given requirement type reads.
    pub fn stat_for(&self, requirement: RequirementType) -> i64 {
        match requirement {
            RequirementType::Streak => i64::from(self.longest_streak),
            RequirementType::Points => self.total_points,
            RequirementType::Tasks => self.total_tasks_completed,
            RequirementType::Challenges => self.completed_challenges,
        }
    }
}

/// Whether the stats snapshot satisfies an achievement threshold.
pub fn meets_requirement(
    requirement: RequirementType,
    requirement_value: i64,
    stats: &UserStats,
) -> bool {
    stats.stat_for(requirement) >= requirement_value
}

/// Progress toward a locked achievement, as a clamped percentage.
///
/// `min(100, 100 * current / required)`; never negative, never over 100.
/// A non-positive requirement counts as already met.
pub fn progress_pct(current: i64, required: i64) -> u8 {
    if required <= 0 {
        return 100;
    }
    let current = current.max(0);
    let pct = current.saturating_mul(100) / required;
    pct.min(100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats() -> UserStats {
        UserStats {
            longest_streak: 12,
            total_points: 450,
            total_tasks_completed: 80,
            completed_challenges: 1,
        }
    }

    // -- RequirementType ------------------------------------------------------

    #[test]
    fn requirement_type_round_trips() {
        for ty in [
            RequirementType::Streak,
            RequirementType::Points,
            RequirementType::Tasks,
            RequirementType::Challenges,
        ] {
            assert_eq!(RequirementType::from_str_value(ty.as_str()).unwrap(), ty);
        }
    }

    #[test]
    fn requirement_type_rejects_unknown() {
        let result = RequirementType::from_str_value("karma");
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Invalid requirement type"));
    }

    #[test]
    fn requirement_types_complete() {
        assert_eq!(VALID_REQUIREMENT_TYPES.len(), 4);
    }

    // -- stat selection -------------------------------------------------------

    #[test]
    fn stat_for_selects_matching_field() {
        let s = stats();
        assert_eq!(s.stat_for(RequirementType::Streak), 12);
        assert_eq!(s.stat_for(RequirementType::Points), 450);
        assert_eq!(s.stat_for(RequirementType::Tasks), 80);
        assert_eq!(s.stat_for(RequirementType::Challenges), 1);
    }

    #[test]
    fn meets_requirement_at_exact_threshold() {
        assert!(meets_requirement(RequirementType::Streak, 12, &stats()));
    }

    #[test]
    fn meets_requirement_above_threshold() {
        assert!(meets_requirement(RequirementType::Points, 100, &stats()));
    }

    #[test]
    fn below_threshold_does_not_qualify() {
        assert!(!meets_requirement(RequirementType::Challenges, 2, &stats()));
    }

    // -- progress_pct ---------------------------------------------------------

    #[test]
    fn pct_zero_progress() {
        assert_eq!(progress_pct(0, 30), 0);
    }

    #[test]
    fn pct_halfway() {
        assert_eq!(progress_pct(15, 30), 50);
    }

    #[test]
    fn pct_clamped_at_100() {
        assert_eq!(progress_pct(90, 30), 100);
    }

    #[test]
    fn pct_never_negative() {
        assert_eq!(progress_pct(-5, 30), 0);
    }

    #[test]
    fn pct_non_positive_requirement_is_met() {
        assert_eq!(progress_pct(0, 0), 100);
    }

    #[test]
    fn pct_truncates_partial_percent() {
        // 2/3 of the way: 66.67% floors to 66.
        assert_eq!(progress_pct(2, 3), 66);
    }
}
