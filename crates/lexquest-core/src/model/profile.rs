//! User Profile - the singleton local learner record

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::scoring::xp_for_level;

/// The local user's progress record.
///
/// `level` is derived from `total_xp` (via the score engine's level curve)
/// but stored alongside it; `longest_streak >= current_streak` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Cumulative XP ever earned.
    pub total_xp: i64,
    /// Current level, derived from `total_xp`.
    pub level: u32,
    /// Consecutive calendar days with at least one completed session.
    pub current_streak: u32,
    /// High-water mark of `current_streak`.
    pub longest_streak: u32,
    /// Calendar date of the most recent completed session, if any.
    pub last_study_date: Option<NaiveDate>,
    /// Cards-per-day target; informational to this core.
    pub daily_goal: u32,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            total_xp: 0,
            level: 1,
            current_streak: 0,
            longest_streak: 0,
            last_study_date: None,
            daily_goal: 20,
        }
    }
}

impl UserProfile {
    /// XP threshold at which the current level was reached.
    pub fn xp_for_current_level(&self) -> i64 {
        xp_for_level(self.level)
    }

    /// XP threshold for the next level.
    pub fn xp_for_next_level(&self) -> i64 {
        xp_for_level(self.level + 1)
    }

    /// Fraction of the way from the current level to the next, in `0.0..=1.0`.
    pub fn xp_progress(&self) -> f32 {
        let current = self.total_xp - self.xp_for_current_level();
        let needed = self.xp_for_next_level() - self.xp_for_current_level();
        if needed > 0 {
            current as f32 / needed as f32
        } else {
            1.0
        }
    }
}
