//! SM-2 Spaced Repetition Module
//!
//! Scheduling core for review cards, derived from the classic SuperMemo 2
//! algorithm with a short-cycle learning tier bolted underneath:
//!
//! - Quality 0-5 self-assessment per review; >= 3 counts as a success
//! - Failures reset the card onto a fixed 10-minute relearning step
//! - Day-granularity intervals (1, 6, then `interval * ease`) begin once a
//!   card has survived two consecutive successes
//! - Ease factor is bounded below at 1.3 no matter the review history
//!
//! Reference: https://super-memory.com/english/ol/sm2.htm
//!
//! The scheduler is a pure function over card state: it never performs I/O
//! and never mutates in place; persistence of the returned card belongs to
//! the caller.

mod scheduler;

pub use scheduler::{
    Sm2Scheduler, SrsError, GRADUATION_THRESHOLD, LEARNING_STEP_SECS, MIN_EASE_FACTOR,
};
