//! Domain Model
//!
//! Plain data types shared by the scheduler, the score engine, and the
//! session completion flow:
//!
//! - Review cards and their SM-2 scheduling state
//! - The local user profile (XP, level, streaks, daily goal)
//! - Study sessions, live session tallies, and completion results
//! - Coin ledger balances and earn events
//! - Subscription plans and per-tier limits

mod card;
mod coins;
mod profile;
mod session;
mod subscription;

/// Fixed identifier for the offline/local user.
pub const LOCAL_USER_ID: &str = "local";

pub use card::{CardState, ReviewCard};
pub use coins::{CoinBalance, CoinEarnResult, CoinTier};
pub use profile::UserProfile;
pub use session::{DailyStats, GameMode, SessionResult, SessionStats, StudySession};
pub use subscription::{Subscription, SubscriptionPlan, SubscriptionStatus, SubscriptionTier};
