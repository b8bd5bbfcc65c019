//! Session Completion
//!
//! The single entry point invoked once per finished study session. One call
//! runs the whole transaction from raw tallies to committed result:
//!
//! 1. Adaptive accuracy bonus on the session's XP
//! 2. Session record + today's daily aggregate persisted
//! 3. Profile XP/level updated
//! 4. Streak continuity advanced (calendar-date logic, idempotent per day)
//! 5. Coin rewards for premium users, one ledger call per reward reason
//! 6. Best-effort backend sync for authenticated users
//!
//! Steps 2-4 are mandatory: a store failure aborts the completion with
//! [`CompletionError::Persistence`] and the caller may retry the whole call.
//! Reward failures are logged and skipped per event; sync failures are
//! swallowed entirely.
//!
//! Completions are serialized through an internal async mutex so two
//! concurrent finishes cannot race the profile's read-modify-write and lose
//! an XP increment or miscount a streak transition.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::model::{DailyStats, SessionResult, SessionStats, StudySession, UserProfile};
use crate::scoring::ScoreEngine;
use crate::store::{
    ProfileStore, RewardLedger, SessionStore, SessionSyncPayload, StoreError, SyncQueue,
    UserSession, LOCAL_USER_ID,
};

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Session completion failure.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    /// A mandatory local-state update failed; the session is not recorded
    /// and the completion may be retried as a whole.
    #[error("failed to persist session progress: {0}")]
    Persistence(#[from] StoreError),
}

// ============================================================================
// STREAK LOGIC
// ============================================================================

/// Outcome of advancing the streak to `today`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakUpdate {
    pub current: u32,
    pub longest: u32,
    /// Whether this completion moved the streak (first ever, extended, or
    /// reset). False only for a repeat session on an already-counted day.
    pub increased: bool,
}

/// Advance the study streak for a session completed on `today`.
///
/// Pure calendar-date logic: a second session on an already-counted day
/// changes nothing; exactly-yesterday extends the streak; anything else
/// (a gap of two or more days, or a last-study date in the future from a
/// clock rollback) resets to 1 with the longest-streak high-water mark
/// untouched.
pub fn advance_streak(profile: &UserProfile, today: NaiveDate) -> StreakUpdate {
    match profile.last_study_date {
        None => StreakUpdate {
            current: 1,
            longest: profile.longest_streak.max(1),
            increased: true,
        },
        Some(last) if last == today => StreakUpdate {
            current: profile.current_streak,
            longest: profile.longest_streak,
            increased: false,
        },
        Some(last) if (today - last).num_days() == 1 => {
            let current = profile.current_streak + 1;
            StreakUpdate {
                current,
                longest: profile.longest_streak.max(current),
                increased: true,
            }
        }
        Some(_) => StreakUpdate {
            current: 1,
            longest: profile.longest_streak,
            increased: true,
        },
    }
}

// ============================================================================
// SESSION COMPLETION
// ============================================================================

/// Orchestrates everything that happens when a study session finishes.
///
/// Construct with the required profile and session stores, then attach the
/// optional collaborators; an absent collaborator skips its step.
///
/// ```rust,ignore
/// let store = Arc::new(SqliteStore::new(None)?);
/// let completion = SessionCompletion::new(store.clone(), store.clone())
///     .with_rewards(store)
///     .with_user_session(Arc::new(LocalUserSession::new(subscription)));
/// let result = completion.complete(stats).await?;
/// ```
pub struct SessionCompletion {
    profiles: Arc<dyn ProfileStore>,
    sessions: Arc<dyn SessionStore>,
    scoring: ScoreEngine,
    rewards: Option<Arc<dyn RewardLedger>>,
    user_session: Option<Arc<dyn UserSession>>,
    sync: Option<Arc<dyn SyncQueue>>,
    /// Serializes concurrent completions for the single local user.
    guard: tokio::sync::Mutex<()>,
}

impl SessionCompletion {
    pub fn new(profiles: Arc<dyn ProfileStore>, sessions: Arc<dyn SessionStore>) -> Self {
        Self {
            profiles,
            sessions,
            scoring: ScoreEngine::new(),
            rewards: None,
            user_session: None,
            sync: None,
            guard: tokio::sync::Mutex::new(()),
        }
    }

    /// Attach a coin ledger; without one no rewards are issued.
    pub fn with_rewards(mut self, rewards: Arc<dyn RewardLedger>) -> Self {
        self.rewards = Some(rewards);
        self
    }

    /// Attach identity/entitlement; without one the user is treated as a
    /// non-premium local user.
    pub fn with_user_session(mut self, user_session: Arc<dyn UserSession>) -> Self {
        self.user_session = Some(user_session);
        self
    }

    /// Attach an outbound sync queue; without one sync is a no-op.
    pub fn with_sync_queue(mut self, sync: Arc<dyn SyncQueue>) -> Self {
        self.sync = Some(sync);
        self
    }

    /// Complete a session as of the current wall clock.
    pub async fn complete(&self, stats: SessionStats) -> Result<SessionResult, CompletionError> {
        self.complete_at(stats, Utc::now()).await
    }

    /// Complete a session as of an explicit instant.
    ///
    /// `now` determines both the session's recorded start time and the
    /// calendar date the streak logic runs against.
    pub async fn complete_at(
        &self,
        stats: SessionStats,
        now: DateTime<Utc>,
    ) -> Result<SessionResult, CompletionError> {
        let _serial = self.guard.lock().await;
        let today = now.date_naive();

        // Adaptive XP bonus based on accuracy.
        let accuracy = if stats.cards_studied > 0 {
            stats.correct_count as f32 / stats.cards_studied as f32
        } else {
            0.0
        };
        let (adaptive_xp_bonus, adaptive_message) = if accuracy >= 0.90 && stats.cards_studied >= 10
        {
            (
                (stats.xp_earned as f32 * 0.25) as u32,
                Some("Excellent accuracy! +25% XP bonus".to_string()),
            )
        } else if accuracy >= 0.85 && stats.cards_studied >= 5 {
            (
                (stats.xp_earned as f32 * 0.15) as u32,
                Some("Great accuracy! +15% XP bonus".to_string()),
            )
        } else {
            (0, None)
        };
        let total_xp_earned = stats.xp_earned + adaptive_xp_bonus;

        // Record the session itself, with bonus-included XP.
        let mut session = StudySession {
            id: 0,
            game_mode: stats.game_mode,
            started_at: now - Duration::seconds(i64::from(stats.duration_sec)),
            cards_studied: stats.cards_studied,
            correct_count: stats.correct_count,
            xp_earned: total_xp_earned,
            duration_sec: stats.duration_sec,
        };
        session.id = self.sessions.record_session(&session).await?;

        // Fold this session into today's aggregate.
        self.sessions
            .record_daily_stats(today, stats.cards_studied, total_xp_earned, stats.duration_sec)
            .await?;

        // XP and level.
        let profile = self.profiles.get_profile().await?;
        let new_total_xp = profile.total_xp + i64::from(total_xp_earned);
        let new_level = self.scoring.calculate_level(new_total_xp);
        let leveled_up = new_level > profile.level;
        self.profiles.update_xp_and_level(new_total_xp, new_level).await?;

        // Streak.
        let streak = advance_streak(&profile, today);
        self.profiles
            .update_streak(streak.current, streak.longest, today)
            .await?;

        // Coin rewards, premium only. Failures here must not undo the
        // learner's recorded progress: log and move on.
        let is_premium = self
            .user_session
            .as_deref()
            .map(|user| user.is_premium())
            .unwrap_or(false);
        let coins_earned = if is_premium {
            self.award_coins(&stats, &streak).await
        } else {
            0
        };

        // Best-effort backend sync for signed-in users.
        if let (Some(user_session), Some(sync)) = (self.user_session.as_deref(), self.sync.as_deref())
        {
            let user_id = user_session.user_id().await;
            if user_id != LOCAL_USER_ID {
                let queued = self
                    .queue_sync(sync, user_id, &stats, &session, today, total_xp_earned)
                    .await;
                if let Err(err) = queued {
                    tracing::debug!("session sync queueing skipped: {err}");
                }
            }
        }

        Ok(SessionResult {
            xp_earned: total_xp_earned,
            new_total_xp,
            new_level,
            leveled_up,
            current_streak: streak.current,
            streak_increased: streak.increased,
            coins_earned,
            adaptive_xp_bonus,
            adaptive_message,
        })
    }

    async fn award_coins(&self, stats: &SessionStats, streak: &StreakUpdate) -> i64 {
        let Some(ledger) = self.rewards.as_deref() else {
            return 0;
        };
        let user_id = match self.user_session.as_deref() {
            Some(session) => session.user_id().await,
            None => LOCAL_USER_ID.to_string(),
        };
        let mut total = 0;

        // Session completion: 10 coins for 20+ cards, 5 for 10+.
        let session_coins = match stats.cards_studied {
            c if c >= 20 => 10,
            c if c >= 10 => 5,
            _ => 0,
        };
        if session_coins > 0 {
            total += self
                .earn(
                    ledger,
                    &user_id,
                    "srs_review_complete",
                    session_coins,
                    &format!("Completed review session ({} cards)", stats.cards_studied),
                )
                .await;
        }

        // Perfect score bonus: 25 coins for 100% accuracy with 10+ cards.
        if stats.correct_count == stats.cards_studied && stats.cards_studied >= 10 {
            total += self
                .earn(
                    ledger,
                    &user_id,
                    "perfect_quiz",
                    25,
                    &format!("Perfect score! {}/{}", stats.correct_count, stats.cards_studied),
                )
                .await;
        }

        // Streak milestones fire only on the transition that reaches them,
        // never again on later sessions while the streak sits at the value.
        if streak.increased {
            match streak.current {
                7 => {
                    total += self
                        .earn(ledger, &user_id, "streak_7_days", 50, "7-day study streak!")
                        .await;
                }
                30 => {
                    total += self
                        .earn(ledger, &user_id, "streak_30_days", 300, "30-day study streak!")
                        .await;
                }
                _ => {}
            }
        }

        total
    }

    /// One independent earn event; a failure loses only this reward.
    async fn earn(
        &self,
        ledger: &dyn RewardLedger,
        user_id: &str,
        source_type: &str,
        amount: i64,
        description: &str,
    ) -> i64 {
        match ledger.earn_coins(user_id, source_type, amount, description).await {
            Ok(_) => amount,
            Err(err) => {
                tracing::warn!("coin award failed ({source_type}): {err}");
                0
            }
        }
    }

    async fn queue_sync(
        &self,
        sync: &dyn SyncQueue,
        user_id: String,
        stats: &SessionStats,
        session: &StudySession,
        today: NaiveDate,
        total_xp_earned: u32,
    ) -> Result<(), StoreError> {
        let profile = self.profiles.get_profile().await?;
        sync.queue_session_sync(SessionSyncPayload {
            user_id,
            touched_item_ids: stats.touched_item_ids.clone(),
            profile,
            session: session.clone(),
            daily_stats: DailyStats {
                date: today,
                cards_reviewed: stats.cards_studied,
                xp_earned: total_xp_earned,
                study_time_sec: stats.duration_sec,
            },
        })
        .await
    }
}

// ============================================================================
// TESTS
// ============================================================================
