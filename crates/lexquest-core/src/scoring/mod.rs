//! Score Engine
//!
//! Converts a single answer's quality rating into an XP award and a
//! cumulative XP total into a level. Both directions are pure lookups:
//!
//! - Base XP comes from a fixed quality/mode table (writing drills pay more
//!   than recognition for the same quality tier)
//! - Combo and first-review multipliers stack, with the product floored
//! - Levels follow the quadratic curve `xp_for_level(n) = n^2 * 50`
//!
//! Unlike the scheduler, out-of-table quality values are not an error here:
//! they land in the zero-XP row. A mis-scored answer should never crash a
//! game screen mid-session.

use serde::{Deserialize, Serialize};

use crate::model::GameMode;

/// XP threshold at which `level` begins.
pub fn xp_for_level(level: u32) -> i64 {
    i64::from(level) * i64::from(level) * 50
}

/// Breakdown of one answer's XP award.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub base_xp: u32,
    pub combo_multiplier: f32,
    pub is_new_card_bonus: bool,
    /// `floor(base_xp * combo_multiplier * new_card_multiplier)`.
    pub total_xp: u32,
}

/// Pure XP and level calculator.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreEngine;

impl ScoreEngine {
    pub fn new() -> Self {
        Self
    }

    /// XP for one answered card.
    pub fn calculate_score(
        &self,
        quality: u8,
        combo_count: u32,
        is_new_card: bool,
        game_mode: GameMode,
    ) -> ScoreResult {
        let base_xp: u32 = if game_mode == GameMode::Writing {
            match quality {
                q if q >= 5 => 20,
                4 => 15,
                3 => 10,
                _ => 0,
            }
        } else {
            match quality {
                q if q >= 5 => 15,
                4 => 12,
                3 => 8,
                _ => 0,
            }
        };

        let combo_multiplier: f32 = match combo_count {
            c if c >= 10 => 2.0,
            c if c >= 5 => 1.5,
            c if c >= 3 => 1.2,
            _ => 1.0,
        };

        let new_card_multiplier: f32 = if is_new_card { 1.5 } else { 1.0 };

        let total_xp = (base_xp as f32 * combo_multiplier * new_card_multiplier) as u32;

        ScoreResult {
            base_xp,
            combo_multiplier,
            is_new_card_bonus: is_new_card,
            total_xp,
        }
    }

    /// The level a cumulative XP total corresponds to.
    ///
    /// Smallest level whose successor threshold exceeds `total_xp`; level 1
    /// at zero XP. Monotonic non-decreasing in `total_xp`.
    pub fn calculate_level(&self, total_xp: i64) -> u32 {
        let mut level = 1;
        while xp_for_level(level + 1) <= total_xp {
            level += 1;
        }
        level
    }
}

// ============================================================================
// TESTS
// ============================================================================
