//! SM-2 scheduler implementation

use chrono::{DateTime, Duration, Utc};

use crate::model::{CardState, ReviewCard};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Lower bound on the ease factor, from the original SM-2 paper.
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// Relearning step for new and failed cards: 10 minutes.
pub const LEARNING_STEP_SECS: i64 = 600;

/// Consecutive successes after which a card graduates.
pub const GRADUATION_THRESHOLD: u32 = 8;

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Scheduler contract violations.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SrsError {
    /// Quality rating outside the 0-5 scale. Caller bug; never clamped.
    #[error("quality must be in 0..=5, got {0}")]
    InvalidQuality(u8),
}

// ============================================================================
// SCHEDULER
// ============================================================================

/// SM-2 review scheduler.
///
/// Stateless; every input it needs arrives as an argument, so a single
/// instance is safely shared across any number of concurrent callers.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sm2Scheduler;

impl Sm2Scheduler {
    pub fn new() -> Self {
        Self
    }

    /// Apply one review to `card` and return the full replacement card.
    ///
    /// `quality` is the learner's 0-5 recall rating; `now` is the review
    /// instant. Quality below 3 resets the card onto the 10-minute
    /// relearning cycle; 3 and above advances it. The returned card is a
    /// complete new value - the input is never mutated.
    ///
    /// # Errors
    ///
    /// [`SrsError::InvalidQuality`] when `quality > 5`. This is the only
    /// failure mode; with a valid rating the function is total.
    pub fn review(
        &self,
        card: &ReviewCard,
        quality: u8,
        now: DateTime<Utc>,
    ) -> Result<ReviewCard, SrsError> {
        if quality > 5 {
            return Err(SrsError::InvalidQuality(quality));
        }

        let total_reviews = card.total_reviews + 1;

        if quality < 3 {
            // Failed: reset repetitions, back onto the 10-minute step.
            return Ok(ReviewCard {
                item_id: card.item_id,
                ease_factor: card.ease_factor,
                interval_days: 0,
                repetitions: 0,
                next_review_at: now + Duration::seconds(LEARNING_STEP_SECS),
                state: CardState::Learning,
                total_reviews,
                correct_count: card.correct_count,
            });
        }

        // Passed: grow the ease factor, floored at the SM-2 minimum.
        let q = f64::from(quality);
        let ease_factor =
            MIN_EASE_FACTOR.max(card.ease_factor + (0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02)));

        let repetitions = card.repetitions + 1;
        let state = if repetitions >= GRADUATION_THRESHOLD {
            CardState::Graduated
        } else if repetitions >= 2 {
            CardState::Review
        } else {
            CardState::Learning
        };

        // Cards still in the learning state stay on the short cycle; the
        // day-granularity progression is keyed off the repetition count
        // from BEFORE this review's increment.
        let (interval_days, next_review_at) = if state == CardState::Learning {
            (0, now + Duration::seconds(LEARNING_STEP_SECS))
        } else {
            let interval_days = match card.repetitions {
                0 => 1,
                1 => 6,
                _ => (card.interval_days as f64 * ease_factor) as u32,
            };
            (interval_days, now + Duration::days(i64::from(interval_days)))
        };

        Ok(ReviewCard {
            item_id: card.item_id,
            ease_factor,
            interval_days,
            repetitions,
            next_review_at,
            state,
            total_reviews,
            correct_count: card.correct_count + 1,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================
