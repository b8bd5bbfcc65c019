//! # Lexquest Core
//!
//! Learning engine for a gamified vocabulary app. The algorithmic heart of
//! the product lives here:
//!
//! - **SM-2 scheduling**: per-item review intervals driven by a 0-5 quality
//!   rating, with a 10-minute relearning cycle under the classic day-based
//!   progression
//! - **Scoring**: quality/mode XP table with combo and first-review
//!   multipliers, and a quadratic level curve
//! - **Session completion**: one call that applies the adaptive accuracy
//!   bonus, records the session and daily aggregate, advances XP/level and
//!   the calendar streak, issues premium coin rewards, and queues backend
//!   sync
//! - **Storage**: SQLite persistence for all of the above, behind narrow
//!   async store traits so the presentation layer never sees SQL
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use lexquest_core::{ReviewCard, SessionCompletion, SessionStats, Sm2Scheduler, SqliteStore};
//!
//! let store = Arc::new(SqliteStore::new(None)?);
//!
//! // Review one card and persist the scheduler's verdict.
//! let scheduler = Sm2Scheduler::new();
//! let card = store.get_card(item_id).await?.unwrap_or_else(|| ReviewCard::new(item_id));
//! let card = scheduler.review(&card, quality, chrono::Utc::now())?;
//! store.upsert_card(&card).await?;
//!
//! // Close out the session.
//! let completion = SessionCompletion::new(store.clone(), store.clone());
//! let result = completion.complete(stats).await?;
//! println!("+{} XP, streak {}", result.xp_earned, result.current_streak);
//! ```
//!
//! The scheduler and score engine are pure functions; everything stateful
//! goes through the [`store`] traits, for which [`SqliteStore`] is the
//! bundled implementation.

// ============================================================================
// MODULES
// ============================================================================

pub mod model;
pub mod scoring;
pub mod session;
pub mod srs;
pub mod storage;
pub mod store;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Domain model
pub use model::{
    CardState, CoinBalance, CoinEarnResult, CoinTier, DailyStats, GameMode, ReviewCard,
    SessionResult, SessionStats, StudySession, Subscription, SubscriptionPlan, SubscriptionStatus,
    SubscriptionTier, UserProfile,
};

// SM-2 scheduler
pub use srs::{Sm2Scheduler, SrsError, GRADUATION_THRESHOLD, LEARNING_STEP_SECS, MIN_EASE_FACTOR};

// Scoring
pub use scoring::{xp_for_level, ScoreEngine, ScoreResult};

// Session completion
pub use session::{advance_streak, CompletionError, SessionCompletion, StreakUpdate};

// Store interfaces
pub use store::{
    CardStore, LocalUserSession, ProfileStore, RewardLedger, SessionStore, SessionSyncPayload,
    StoreError, StoreResult, SyncQueue, UserSession, LOCAL_USER_ID,
};

// Storage layer
pub use storage::SqliteStore;

// ============================================================================
// VERSION INFO
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// PRELUDE
// ============================================================================

/// Convenient imports for common usage
pub mod prelude {
    pub use crate::{
        CardState, CardStore, CompletionError, GameMode, ProfileStore, ReviewCard, ScoreEngine,
        SessionCompletion, SessionResult, SessionStats, SessionStore, Sm2Scheduler, SqliteStore,
        SrsError, StoreError, StoreResult, StudySession, UserProfile,
    };
}
