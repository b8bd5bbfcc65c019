//! Subscription Model
//!
//! The plan/status pair as last synced from the billing backend, plus the
//! per-tier feature limits. The variant set is closed; limits are expressed
//! as exhaustive matches rather than open inheritance.

use serde::{Deserialize, Serialize};

use crate::model::{GameMode, LOCAL_USER_ID};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionPlan {
    #[default]
    Free,
    Premium,
}

impl SubscriptionPlan {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionPlan::Free => "free",
            SubscriptionPlan::Premium => "premium",
        }
    }

    /// Parse from string name; unknown values fall back to `Free`.
    pub fn parse_name(s: &str) -> Self {
        match s {
            "premium" => SubscriptionPlan::Premium,
            _ => SubscriptionPlan::Free,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    #[default]
    Active,
    PastDue,
    Canceled,
    Trialing,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::PastDue => "past_due",
            SubscriptionStatus::Canceled => "canceled",
            SubscriptionStatus::Trialing => "trialing",
        }
    }

    /// Parse from string name; unknown values fall back to `Active`.
    pub fn parse_name(s: &str) -> Self {
        match s {
            "past_due" => SubscriptionStatus::PastDue,
            "canceled" => SubscriptionStatus::Canceled,
            "trialing" => SubscriptionStatus::Trialing,
            _ => SubscriptionStatus::Active,
        }
    }
}

/// A user's subscription as known locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub user_id: String,
    pub plan: SubscriptionPlan,
    pub status: SubscriptionStatus,
    pub cancel_at_period_end: bool,
}

impl Default for Subscription {
    fn default() -> Self {
        Self {
            user_id: LOCAL_USER_ID.to_string(),
            plan: SubscriptionPlan::Free,
            status: SubscriptionStatus::Active,
            cancel_at_period_end: false,
        }
    }
}

impl Subscription {
    /// Premium entitlement check used to gate coin rewards.
    pub fn is_premium(&self) -> bool {
        self.plan == SubscriptionPlan::Premium
    }

    /// Whether the subscription is currently in good standing.
    pub fn is_active(&self) -> bool {
        matches!(
            self.status,
            SubscriptionStatus::Active | SubscriptionStatus::Trialing
        )
    }

    /// The feature limits this subscription grants.
    pub fn tier(&self) -> SubscriptionTier {
        SubscriptionTier::from_plan(self.plan)
    }
}

/// Feature limits per plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionTier {
    Free,
    Premium,
}

impl SubscriptionTier {
    pub fn from_plan(plan: SubscriptionPlan) -> Self {
        match plan {
            SubscriptionPlan::Free => SubscriptionTier::Free,
            SubscriptionPlan::Premium => SubscriptionTier::Premium,
        }
    }

    /// Size of the vocabulary catalog unlocked at this tier.
    pub fn max_words(&self) -> u32 {
        match self {
            SubscriptionTier::Free => 500,
            SubscriptionTier::Premium => 10_000,
        }
    }

    /// Daily review cap; `u32::MAX` means unlimited.
    pub fn max_reviews_per_day(&self) -> u32 {
        match self {
            SubscriptionTier::Free => 20,
            SubscriptionTier::Premium => u32::MAX,
        }
    }

    /// Game modes playable at this tier.
    pub fn game_modes(&self) -> &'static [GameMode] {
        match self {
            SubscriptionTier::Free => &[GameMode::Vocabulary],
            SubscriptionTier::Premium => &[
                GameMode::Recognition,
                GameMode::Writing,
                GameMode::Vocabulary,
                GameMode::CameraChallenge,
            ],
        }
    }

    pub fn coins_enabled(&self) -> bool {
        matches!(self, SubscriptionTier::Premium)
    }

    pub fn audio_enabled(&self) -> bool {
        matches!(self, SubscriptionTier::Premium)
    }
}
