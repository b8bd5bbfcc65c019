//! Study Sessions
//!
//! Records and tallies for one sitting with the app: the live stats a game
//! screen accumulates, the immutable session record that gets persisted, the
//! per-day aggregate, and the result handed back to the caller after
//! completion.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Which game produced a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// Multiple-choice recognition drills.
    #[default]
    Recognition,
    /// Typed-answer writing drills; rewards more XP per quality tier.
    Writing,
    /// Plain flashcard vocabulary review.
    Vocabulary,
    /// Photo-based word hunts.
    CameraChallenge,
}

impl GameMode {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Recognition => "recognition",
            GameMode::Writing => "writing",
            GameMode::Vocabulary => "vocabulary",
            GameMode::CameraChallenge => "camera_challenge",
        }
    }

    /// Parse from string name; unknown values fall back to `Recognition`.
    pub fn parse_name(s: &str) -> Self {
        match s {
            "writing" => GameMode::Writing,
            "vocabulary" => GameMode::Vocabulary,
            "camera_challenge" => GameMode::CameraChallenge,
            _ => GameMode::Recognition,
        }
    }
}

impl std::fmt::Display for GameMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One completed study session, immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySession {
    /// Row id assigned by the session store (0 before recording).
    pub id: i64,
    pub game_mode: GameMode,
    pub started_at: DateTime<Utc>,
    pub cards_studied: u32,
    /// Correct answers, `<= cards_studied`.
    pub correct_count: u32,
    /// Final XP including any adaptive bonus.
    pub xp_earned: u32,
    pub duration_sec: u32,
}

impl StudySession {
    /// Session accuracy, 0.0 for empty sessions.
    pub fn accuracy(&self) -> f32 {
        if self.cards_studied > 0 {
            self.correct_count as f32 / self.cards_studied as f32
        } else {
            0.0
        }
    }
}

/// Raw tallies collected live during a session, before any bonus is applied.
///
/// Input to session completion. `touched_item_ids` is opaque to this core
/// and forwarded verbatim to the sync queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub game_mode: GameMode,
    pub cards_studied: u32,
    pub correct_count: u32,
    /// Longest correct-answer combo reached during the session.
    pub combo_max: u32,
    /// XP earned during play, before the adaptive accuracy bonus.
    pub xp_earned: u32,
    pub duration_sec: u32,
    /// Ids of vocabulary items touched this session, for downstream sync.
    #[serde(default)]
    pub touched_item_ids: Vec<i64>,
}

/// Everything the caller needs to present after a completed session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResult {
    /// Final XP awarded, including the adaptive bonus.
    pub xp_earned: u32,
    pub new_total_xp: i64,
    pub new_level: u32,
    pub leveled_up: bool,
    pub current_streak: u32,
    pub streak_increased: bool,
    pub coins_earned: i64,
    pub adaptive_xp_bonus: u32,
    /// Human-readable note shown when an accuracy bonus fired.
    pub adaptive_message: Option<String>,
}

/// Per-day study aggregate, upserted additively keyed by date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStats {
    pub date: NaiveDate,
    pub cards_reviewed: u32,
    pub xp_earned: u32,
    pub study_time_sec: u32,
}
