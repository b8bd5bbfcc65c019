//! Review Card - per-item spaced repetition state
//!
//! One `ReviewCard` exists per learnable vocabulary item, created implicitly
//! on the item's first review and never deleted afterwards (the monotonic
//! review counters feed long-term accuracy statistics).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a review card.
///
/// Transitions only move forward (New → Learning → Review → Graduated),
/// except on a failed review, which always drops the card back to `Learning`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CardState {
    /// Never reviewed.
    #[default]
    New,
    /// On the short (10-minute) relearning cycle.
    Learning,
    /// On day-granularity intervals.
    Review,
    /// Survived enough consecutive successful reviews to count as learned.
    Graduated,
}

impl CardState {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            CardState::New => "new",
            CardState::Learning => "learning",
            CardState::Review => "review",
            CardState::Graduated => "graduated",
        }
    }

    /// Parse from string name; unknown values fall back to `New`.
    pub fn parse_name(s: &str) -> Self {
        match s {
            "learning" => CardState::Learning,
            "review" => CardState::Review,
            "graduated" => CardState::Graduated,
            _ => CardState::New,
        }
    }
}

impl std::fmt::Display for CardState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Spaced repetition state for one vocabulary item.
///
/// Invariants maintained by the scheduler:
/// - `ease_factor >= 1.3`
/// - `correct_count <= total_reviews`
/// - `interval_days == 0` while the card is on the short relearning cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewCard {
    /// Stable foreign key into the vocabulary catalog.
    pub item_id: i64,
    /// Per-item multiplier governing interval growth, floored at 1.3.
    pub ease_factor: f64,
    /// Current day-granularity interval; 0 while in short-cycle learning.
    pub interval_days: u32,
    /// Consecutive successful reviews since the last failure.
    pub repetitions: u32,
    /// When the card is next due.
    pub next_review_at: DateTime<Utc>,
    /// Lifecycle state.
    pub state: CardState,
    /// Total reviews ever, monotonic.
    pub total_reviews: u32,
    /// Successful reviews ever, monotonic, `<= total_reviews`.
    pub correct_count: u32,
}

impl ReviewCard {
    /// A fresh card for an item that has never been reviewed.
    ///
    /// Due immediately (epoch next-review), default ease 2.5.
    pub fn new(item_id: i64) -> Self {
        Self {
            item_id,
            ease_factor: 2.5,
            interval_days: 0,
            repetitions: 0,
            next_review_at: DateTime::UNIX_EPOCH,
            state: CardState::New,
            total_reviews: 0,
            correct_count: 0,
        }
    }

    /// Lifetime recall accuracy, 0.0 for unreviewed cards.
    pub fn accuracy(&self) -> f32 {
        if self.total_reviews > 0 {
            self.correct_count as f32 / self.total_reviews as f32
        } else {
            0.0
        }
    }

    /// Whether the card is due at `now`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review_at <= now
    }
}
