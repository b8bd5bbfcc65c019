//! Coin Ledger Types
//!
//! Premium users earn coins for session milestones. Balances are tracked
//! locally and reconciled with the backend later; each earn is queued as an
//! independent event so a sync failure never loses the others.

use serde::{Deserialize, Serialize};

use crate::model::LOCAL_USER_ID;

/// Loyalty tier derived from lifetime earnings on the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CoinTier {
    #[default]
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl CoinTier {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            CoinTier::Bronze => "bronze",
            CoinTier::Silver => "silver",
            CoinTier::Gold => "gold",
            CoinTier::Platinum => "platinum",
        }
    }

    /// Parse from string name; unknown values fall back to `Bronze`.
    pub fn parse_name(s: &str) -> Self {
        match s {
            "silver" => CoinTier::Silver,
            "gold" => CoinTier::Gold,
            "platinum" => CoinTier::Platinum,
            _ => CoinTier::Bronze,
        }
    }
}

impl std::fmt::Display for CoinTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A user's coin balance as the local ledger sees it.
///
/// `local_balance` leads `synced_balance` while earn events are still
/// queued; the local value is what the UI shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinBalance {
    pub user_id: String,
    pub local_balance: i64,
    pub synced_balance: i64,
    pub lifetime_earned: i64,
    pub lifetime_spent: i64,
    pub tier: CoinTier,
    /// Epoch seconds of the last successful backend reconciliation.
    pub last_synced_at: i64,
    pub needs_sync: bool,
}

impl CoinBalance {
    /// Zero balance for a user the ledger has not seen yet.
    pub fn empty(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            local_balance: 0,
            synced_balance: 0,
            lifetime_earned: 0,
            lifetime_spent: 0,
            tier: CoinTier::Bronze,
            last_synced_at: 0,
            needs_sync: false,
        }
    }

    /// The balance shown to the user.
    pub fn display_balance(&self) -> i64 {
        self.local_balance
    }
}

impl Default for CoinBalance {
    fn default() -> Self {
        Self::empty(LOCAL_USER_ID)
    }
}

/// Outcome of one ledger earn call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinEarnResult {
    pub earned: i64,
    pub new_balance: i64,
    pub source_type: String,
    /// Whether the event was queued for backend sync.
    pub queued: bool,
}
