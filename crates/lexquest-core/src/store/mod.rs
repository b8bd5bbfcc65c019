//! Store Interfaces
//!
//! Narrow async trait boundaries between the learning core and its
//! persistence/back-end collaborators. The core never talks to a concrete
//! database or network client directly; session completion is written
//! entirely against these traits.
//!
//! The required collaborators are the card, profile, and session stores.
//! The reward ledger, user session, and sync queue are optional: the
//! orchestrator holds them as `Option<Arc<dyn ...>>` and an absent
//! collaborator simply skips the step it would serve, never errors.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{
    CoinBalance, CoinEarnResult, DailyStats, ReviewCard, StudySession, Subscription, UserProfile,
};

pub use crate::model::LOCAL_USER_ID;

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Failure of a delegated storage call.
///
/// Session completion treats any of these during its mandatory steps as
/// fatal for the whole completion; the caller may retry the completion as a
/// unit.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database error
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Stored timestamp outside the representable range
    #[error("invalid stored timestamp: {0}")]
    InvalidTimestamp(i64),
    /// Stored date string that does not parse
    #[error("invalid stored date: {0}")]
    InvalidDate(String),
    /// Initialization error
    #[error("initialization error: {0}")]
    Init(String),
    /// Non-SQLite backend error
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Store result type
pub type StoreResult<T> = std::result::Result<T, StoreError>;

// ============================================================================
// REQUIRED COLLABORATORS
// ============================================================================

/// Per-item review card persistence.
///
/// The scheduler's output card is passed to [`CardStore::upsert_card`]
/// verbatim; the store never recomputes scheduling fields.
#[async_trait]
pub trait CardStore: Send + Sync {
    async fn get_card(&self, item_id: i64) -> StoreResult<Option<ReviewCard>>;

    async fn upsert_card(&self, card: &ReviewCard) -> StoreResult<()>;

    /// Cards due at `now`, oldest due first, graduated cards excluded.
    async fn cards_due(&self, now: DateTime<Utc>, limit: u32) -> StoreResult<Vec<ReviewCard>>;

    /// Number of items reviewed at least once.
    async fn reviewed_count(&self) -> StoreResult<u32>;

    /// Number of graduated items.
    async fn mastered_count(&self) -> StoreResult<u32>;
}

/// Singleton user profile persistence.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Current profile; stores materialize defaults on first read.
    async fn get_profile(&self) -> StoreResult<UserProfile>;

    async fn update_xp_and_level(&self, total_xp: i64, level: u32) -> StoreResult<()>;

    async fn update_streak(
        &self,
        current: u32,
        longest: u32,
        last_study_date: NaiveDate,
    ) -> StoreResult<()>;

    async fn update_daily_goal(&self, goal: u32) -> StoreResult<()>;
}

/// Session log and per-day aggregate persistence.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Record one completed session; returns its assigned id.
    async fn record_session(&self, session: &StudySession) -> StoreResult<i64>;

    async fn recent_sessions(&self, limit: u32) -> StoreResult<Vec<StudySession>>;

    /// Additive upsert keyed by `date`: existing counters grow by the
    /// supplied deltas rather than being replaced.
    async fn record_daily_stats(
        &self,
        date: NaiveDate,
        cards_reviewed: u32,
        xp_earned: u32,
        study_time_sec: u32,
    ) -> StoreResult<()>;

    async fn daily_stats(&self, date: NaiveDate) -> StoreResult<Option<DailyStats>>;

    async fn daily_stats_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> StoreResult<Vec<DailyStats>>;
}

// ============================================================================
// OPTIONAL COLLABORATORS
// ============================================================================

/// Coin ledger. One call per distinct reward reason, so a partial failure
/// of the reward channel never loses the other rewards.
#[async_trait]
pub trait RewardLedger: Send + Sync {
    async fn earn_coins(
        &self,
        user_id: &str,
        source_type: &str,
        base_amount: i64,
        description: &str,
    ) -> StoreResult<CoinEarnResult>;

    async fn balance(&self, user_id: &str) -> StoreResult<CoinBalance>;
}

/// Identity and entitlement of the acting user.
#[async_trait]
pub trait UserSession: Send + Sync {
    /// Backend identity, or [`LOCAL_USER_ID`] when signed out.
    async fn user_id(&self) -> String;

    /// Premium entitlement gate for coin rewards.
    fn is_premium(&self) -> bool;
}

/// [`UserSession`] for a device without a backend account: identity comes
/// from the subscription record (the local id unless a sign-in wrote one),
/// entitlement from its plan.
pub struct LocalUserSession {
    subscription: Subscription,
}

impl LocalUserSession {
    pub fn new(subscription: Subscription) -> Self {
        Self { subscription }
    }
}

#[async_trait]
impl UserSession for LocalUserSession {
    async fn user_id(&self) -> String {
        self.subscription.user_id.clone()
    }

    fn is_premium(&self) -> bool {
        self.subscription.is_premium()
    }
}

/// Everything forwarded to the backend after a completed session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSyncPayload {
    pub user_id: String,
    pub touched_item_ids: Vec<i64>,
    /// Profile as re-read after the completion's writes.
    pub profile: UserProfile,
    pub session: StudySession,
    /// This session's contribution to today's aggregate (deltas, not the
    /// stored running totals).
    pub daily_stats: DailyStats,
}

/// Best-effort outbound sync queue for authenticated users.
#[async_trait]
pub trait SyncQueue: Send + Sync {
    async fn queue_session_sync(&self, payload: SessionSyncPayload) -> StoreResult<()>;
}
