//! SQLite Storage Implementation
//!
//! Single-database backing store for cards, profile, session log, daily
//! aggregates, and the local coin ledger.

use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use directories::ProjectDirs;
use rusqlite::{Connection, OpenFlags, OptionalExtension, params};

use crate::model::{
    CardState, CoinBalance, CoinEarnResult, CoinTier, DailyStats, GameMode, ReviewCard,
    StudySession, UserProfile,
};
use crate::store::{
    CardStore, ProfileStore, RewardLedger, SessionStore, StoreError, StoreResult,
};

/// Distinguishes shared-cache in-memory databases across store instances.
static MEM_DB_SEQ: AtomicU64 = AtomicU64::new(0);

// ============================================================================
// STORE
// ============================================================================

/// SQLite-backed store implementing the card, profile, session, and reward
/// interfaces over one database file.
///
/// Uses separate reader/writer connections for interior mutability. All
/// methods take `&self`, making the store `Send + Sync` so callers can
/// share it as `Arc<SqliteStore>` across every trait it implements.
pub struct SqliteStore {
    writer: Mutex<Connection>,
    reader: Mutex<Connection>,
}

impl SqliteStore {
    /// Apply PRAGMAs to a connection
    fn configure_connection(conn: &Connection) -> StoreResult<()> {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA foreign_keys = ON;
             PRAGMA busy_timeout = 5000;",
        )?;
        Ok(())
    }

    /// Open (or create) the store at `db_path`, falling back to the
    /// platform data directory when no path is given.
    pub fn new(db_path: Option<PathBuf>) -> StoreResult<Self> {
        let path = match db_path {
            Some(p) => p,
            None => {
                let proj_dirs = ProjectDirs::from("com", "lexquest", "core").ok_or_else(|| {
                    StoreError::Init("Could not determine project directories".to_string())
                })?;
                let data_dir = proj_dirs.data_dir();
                std::fs::create_dir_all(data_dir)?;
                data_dir.join("lexquest.db")
            }
        };

        let writer = Connection::open(&path)?;
        Self::configure_connection(&writer)?;
        super::migrations::apply_migrations(&writer)?;

        let reader = Connection::open(&path)?;
        Self::configure_connection(&reader)?;

        Ok(Self {
            writer: Mutex::new(writer),
            reader: Mutex::new(reader),
        })
    }

    /// Fresh in-memory store for tests; each call gets its own database.
    pub fn in_memory() -> StoreResult<Self> {
        let uri = format!(
            "file:lexquest-mem-{}?mode=memory&cache=shared",
            MEM_DB_SEQ.fetch_add(1, Ordering::Relaxed)
        );
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_URI;

        let writer = Connection::open_with_flags(&uri, flags)?;
        super::migrations::apply_migrations(&writer)?;
        let reader = Connection::open_with_flags(&uri, flags)?;

        Ok(Self {
            writer: Mutex::new(writer),
            reader: Mutex::new(reader),
        })
    }

    fn writer(&self) -> StoreResult<std::sync::MutexGuard<'_, Connection>> {
        self.writer
            .lock()
            .map_err(|_| StoreError::Init("writer lock poisoned".to_string()))
    }

    fn reader(&self) -> StoreResult<std::sync::MutexGuard<'_, Connection>> {
        self.reader
            .lock()
            .map_err(|_| StoreError::Init("reader lock poisoned".to_string()))
    }

    /// Earn events not yet reconciled with the backend.
    pub fn pending_event_count(&self) -> StoreResult<u32> {
        let reader = self.reader()?;
        let count = reader.query_row(
            "SELECT COUNT(*) FROM coin_event WHERE sync_status = 'pending'",
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

// ============================================================================
// ROW MAPPING
// ============================================================================

type RawCard = (i64, f64, u32, u32, i64, String, u32, u32);

fn card_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawCard> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
    ))
}

fn card_from_raw(raw: RawCard) -> StoreResult<ReviewCard> {
    let (item_id, ease_factor, interval_days, repetitions, due_secs, state, total, correct) = raw;
    Ok(ReviewCard {
        item_id,
        ease_factor,
        interval_days,
        repetitions,
        next_review_at: datetime_from_secs(due_secs)?,
        state: CardState::parse_name(&state),
        total_reviews: total,
        correct_count: correct,
    })
}

type RawSession = (i64, String, i64, u32, u32, u32, u32);

fn session_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawSession> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
    ))
}

fn session_from_raw(raw: RawSession) -> StoreResult<StudySession> {
    let (id, game_mode, started_secs, cards_studied, correct_count, xp_earned, duration_sec) = raw;
    Ok(StudySession {
        id,
        game_mode: GameMode::parse_name(&game_mode),
        started_at: datetime_from_secs(started_secs)?,
        cards_studied,
        correct_count,
        xp_earned,
        duration_sec,
    })
}

fn daily_stats_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<(String, u32, u32, u32)> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

fn daily_stats_from_raw(raw: (String, u32, u32, u32)) -> StoreResult<DailyStats> {
    let (date, cards_reviewed, xp_earned, study_time_sec) = raw;
    Ok(DailyStats {
        date: parse_date(&date)?,
        cards_reviewed,
        xp_earned,
        study_time_sec,
    })
}

fn datetime_from_secs(secs: i64) -> StoreResult<DateTime<Utc>> {
    Utc.timestamp_opt(secs, 0)
        .single()
        .ok_or(StoreError::InvalidTimestamp(secs))
}

fn parse_date(s: &str) -> StoreResult<NaiveDate> {
    s.parse::<NaiveDate>()
        .map_err(|_| StoreError::InvalidDate(s.to_string()))
}

fn ensure_profile_exists(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO user_profile
            (id, total_xp, level, current_streak, longest_streak, last_study_date, daily_goal)
         VALUES (1, 0, 1, 0, 0, NULL, 20)",
        [],
    )?;
    Ok(())
}

fn ensure_balance_exists(conn: &Connection, user_id: &str) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO coin_balance (user_id) VALUES (?1)",
        params![user_id],
    )?;
    Ok(())
}

// ============================================================================
// CARD STORE
// ============================================================================

#[async_trait]
impl CardStore for SqliteStore {
    async fn get_card(&self, item_id: i64) -> StoreResult<Option<ReviewCard>> {
        let reader = self.reader()?;
        let raw = reader
            .query_row(
                "SELECT item_id, ease_factor, interval_days, repetitions, next_review_at,
                        state, total_reviews, correct_count
                 FROM review_card WHERE item_id = ?1",
                params![item_id],
                card_row,
            )
            .optional()?;
        drop(reader);
        raw.map(card_from_raw).transpose()
    }

    async fn upsert_card(&self, card: &ReviewCard) -> StoreResult<()> {
        let writer = self.writer()?;
        writer.execute(
            "INSERT INTO review_card
                (item_id, ease_factor, interval_days, repetitions, next_review_at,
                 state, total_reviews, correct_count)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT(item_id) DO UPDATE SET
                ease_factor = excluded.ease_factor,
                interval_days = excluded.interval_days,
                repetitions = excluded.repetitions,
                next_review_at = excluded.next_review_at,
                state = excluded.state,
                total_reviews = excluded.total_reviews,
                correct_count = excluded.correct_count",
            params![
                card.item_id,
                card.ease_factor,
                card.interval_days,
                card.repetitions,
                card.next_review_at.timestamp(),
                card.state.as_str(),
                card.total_reviews,
                card.correct_count,
            ],
        )?;
        Ok(())
    }

    async fn cards_due(&self, now: DateTime<Utc>, limit: u32) -> StoreResult<Vec<ReviewCard>> {
        let reader = self.reader()?;
        let mut stmt = reader.prepare(
            "SELECT item_id, ease_factor, interval_days, repetitions, next_review_at,
                    state, total_reviews, correct_count
             FROM review_card
             WHERE next_review_at <= ?1 AND state != 'graduated'
             ORDER BY next_review_at ASC
             LIMIT ?2",
        )?;
        let rows = stmt.query_map(params![now.timestamp(), limit], card_row)?;

        let mut cards = Vec::new();
        for raw in rows {
            cards.push(card_from_raw(raw?)?);
        }
        Ok(cards)
    }

    async fn reviewed_count(&self) -> StoreResult<u32> {
        let reader = self.reader()?;
        let count = reader.query_row(
            "SELECT COUNT(*) FROM review_card WHERE total_reviews > 0",
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    async fn mastered_count(&self) -> StoreResult<u32> {
        let reader = self.reader()?;
        let count = reader.query_row(
            "SELECT COUNT(*) FROM review_card WHERE state = 'graduated'",
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

// ============================================================================
// PROFILE STORE
// ============================================================================

#[async_trait]
impl ProfileStore for SqliteStore {
    async fn get_profile(&self) -> StoreResult<UserProfile> {
        let writer = self.writer()?;
        ensure_profile_exists(&writer)?;
        let (total_xp, level, current_streak, longest_streak, last_study_date, daily_goal): (
            i64,
            u32,
            u32,
            u32,
            Option<String>,
            u32,
        ) = writer.query_row(
            "SELECT total_xp, level, current_streak, longest_streak, last_study_date, daily_goal
             FROM user_profile WHERE id = 1",
            [],
            |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                    row.get(5)?,
                ))
            },
        )?;
        drop(writer);

        Ok(UserProfile {
            total_xp,
            level,
            current_streak,
            longest_streak,
            last_study_date: last_study_date.as_deref().map(parse_date).transpose()?,
            daily_goal,
        })
    }

    async fn update_xp_and_level(&self, total_xp: i64, level: u32) -> StoreResult<()> {
        let writer = self.writer()?;
        ensure_profile_exists(&writer)?;
        writer.execute(
            "UPDATE user_profile SET total_xp = ?1, level = ?2 WHERE id = 1",
            params![total_xp, level],
        )?;
        Ok(())
    }

    async fn update_streak(
        &self,
        current: u32,
        longest: u32,
        last_study_date: NaiveDate,
    ) -> StoreResult<()> {
        let writer = self.writer()?;
        ensure_profile_exists(&writer)?;
        writer.execute(
            "UPDATE user_profile SET current_streak = ?1, longest_streak = ?2, last_study_date = ?3
             WHERE id = 1",
            params![current, longest, last_study_date.to_string()],
        )?;
        Ok(())
    }

    async fn update_daily_goal(&self, goal: u32) -> StoreResult<()> {
        let writer = self.writer()?;
        ensure_profile_exists(&writer)?;
        writer.execute(
            "UPDATE user_profile SET daily_goal = ?1 WHERE id = 1",
            params![goal],
        )?;
        Ok(())
    }
}

// ============================================================================
// SESSION STORE
// ============================================================================

#[async_trait]
impl SessionStore for SqliteStore {
    async fn record_session(&self, session: &StudySession) -> StoreResult<i64> {
        let writer = self.writer()?;
        writer.execute(
            "INSERT INTO study_session
                (game_mode, started_at, cards_studied, correct_count, xp_earned, duration_sec)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                session.game_mode.as_str(),
                session.started_at.timestamp(),
                session.cards_studied,
                session.correct_count,
                session.xp_earned,
                session.duration_sec,
            ],
        )?;
        Ok(writer.last_insert_rowid())
    }

    async fn recent_sessions(&self, limit: u32) -> StoreResult<Vec<StudySession>> {
        let reader = self.reader()?;
        let mut stmt = reader.prepare(
            "SELECT id, game_mode, started_at, cards_studied, correct_count, xp_earned, duration_sec
             FROM study_session
             ORDER BY started_at DESC
             LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit], session_row)?;

        let mut sessions = Vec::new();
        for raw in rows {
            sessions.push(session_from_raw(raw?)?);
        }
        Ok(sessions)
    }

    async fn record_daily_stats(
        &self,
        date: NaiveDate,
        cards_reviewed: u32,
        xp_earned: u32,
        study_time_sec: u32,
    ) -> StoreResult<()> {
        let writer = self.writer()?;
        writer.execute(
            "INSERT INTO daily_stats (date, cards_reviewed, xp_earned, study_time_sec)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(date) DO UPDATE SET
                cards_reviewed = cards_reviewed + excluded.cards_reviewed,
                xp_earned = xp_earned + excluded.xp_earned,
                study_time_sec = study_time_sec + excluded.study_time_sec",
            params![date.to_string(), cards_reviewed, xp_earned, study_time_sec],
        )?;
        Ok(())
    }

    async fn daily_stats(&self, date: NaiveDate) -> StoreResult<Option<DailyStats>> {
        let reader = self.reader()?;
        let raw = reader
            .query_row(
                "SELECT date, cards_reviewed, xp_earned, study_time_sec
                 FROM daily_stats WHERE date = ?1",
                params![date.to_string()],
                daily_stats_row,
            )
            .optional()?;
        drop(reader);
        raw.map(daily_stats_from_raw).transpose()
    }

    async fn daily_stats_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> StoreResult<Vec<DailyStats>> {
        let reader = self.reader()?;
        let mut stmt = reader.prepare(
            "SELECT date, cards_reviewed, xp_earned, study_time_sec
             FROM daily_stats
             WHERE date >= ?1 AND date <= ?2
             ORDER BY date",
        )?;
        let rows = stmt.query_map(params![start.to_string(), end.to_string()], daily_stats_row)?;

        let mut stats = Vec::new();
        for raw in rows {
            stats.push(daily_stats_from_raw(raw?)?);
        }
        Ok(stats)
    }
}

// ============================================================================
// REWARD LEDGER
// ============================================================================

#[async_trait]
impl RewardLedger for SqliteStore {
    async fn earn_coins(
        &self,
        user_id: &str,
        source_type: &str,
        base_amount: i64,
        description: &str,
    ) -> StoreResult<CoinEarnResult> {
        let mut writer = self.writer()?;
        let tx = writer.transaction()?;

        ensure_balance_exists(&tx, user_id)?;
        tx.execute(
            "UPDATE coin_balance SET
                local_balance = local_balance + ?1,
                lifetime_earned = lifetime_earned + ?1,
                needs_sync = 1
             WHERE user_id = ?2",
            params![base_amount, user_id],
        )?;
        tx.execute(
            "INSERT INTO coin_event
                (user_id, event_type, source_type, base_amount, description, created_at)
             VALUES (?1, 'earn', ?2, ?3, ?4, ?5)",
            params![
                user_id,
                source_type,
                base_amount,
                description,
                Utc::now().timestamp(),
            ],
        )?;
        let new_balance: i64 = tx.query_row(
            "SELECT local_balance FROM coin_balance WHERE user_id = ?1",
            params![user_id],
            |row| row.get(0),
        )?;
        tx.commit()?;

        Ok(CoinEarnResult {
            earned: base_amount,
            new_balance,
            source_type: source_type.to_string(),
            queued: true,
        })
    }

    async fn balance(&self, user_id: &str) -> StoreResult<CoinBalance> {
        let writer = self.writer()?;
        ensure_balance_exists(&writer, user_id)?;
        let balance = writer.query_row(
            "SELECT user_id, local_balance, synced_balance, lifetime_earned, lifetime_spent,
                    tier, last_synced_at, needs_sync
             FROM coin_balance WHERE user_id = ?1",
            params![user_id],
            |row| {
                Ok(CoinBalance {
                    user_id: row.get(0)?,
                    local_balance: row.get(1)?,
                    synced_balance: row.get(2)?,
                    lifetime_earned: row.get(3)?,
                    lifetime_spent: row.get(4)?,
                    tier: CoinTier::parse_name(&row.get::<_, String>(5)?),
                    last_synced_at: row.get(6)?,
                    needs_sync: row.get(7)?,
                })
            },
        )?;
        Ok(balance)
    }
}

// ============================================================================
// TESTS
// ============================================================================
