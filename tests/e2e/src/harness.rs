//! Test Harness
//!
//! Shared builders for journey tests: an in-memory SQLite store wired into
//! a session completion, fixed instants so streak logic runs against known
//! calendar dates, and session-stats factories.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use lexquest_core::{
    GameMode, LocalUserSession, SessionCompletion, SessionStats, SqliteStore, Subscription,
    SubscriptionPlan, SubscriptionStatus,
};

/// Noon UTC on the given day; far from midnight so date logic is unambiguous.
pub fn noon(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
}

/// Recognition-mode session stats with the given tallies.
pub fn stats(cards_studied: u32, correct_count: u32, xp_earned: u32) -> SessionStats {
    SessionStats {
        game_mode: GameMode::Recognition,
        cards_studied,
        correct_count,
        combo_max: 0,
        xp_earned,
        duration_sec: 300,
        touched_item_ids: Vec::new(),
    }
}

/// A premium user session for `user_id`.
pub fn premium_session(user_id: &str) -> Arc<LocalUserSession> {
    Arc::new(LocalUserSession::new(Subscription {
        user_id: user_id.to_string(),
        plan: SubscriptionPlan::Premium,
        status: SubscriptionStatus::Active,
        cancel_at_period_end: false,
    }))
}

/// A free-plan user session for `user_id`.
pub fn free_session(user_id: &str) -> Arc<LocalUserSession> {
    Arc::new(LocalUserSession::new(Subscription {
        user_id: user_id.to_string(),
        plan: SubscriptionPlan::Free,
        status: SubscriptionStatus::Active,
        cancel_at_period_end: false,
    }))
}

/// In-memory store plus a bare completion built over it.
///
/// The same store serves as profile store, session store, and (when a test
/// attaches it) reward ledger, mirroring how the app shares one database.
pub fn sqlite_completion() -> (Arc<SqliteStore>, SessionCompletion) {
    let store = Arc::new(SqliteStore::in_memory().expect("in-memory store"));
    let completion = SessionCompletion::new(store.clone(), store.clone());
    (store, completion)
}
