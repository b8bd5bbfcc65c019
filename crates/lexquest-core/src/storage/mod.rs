//! Storage Module
//!
//! SQLite-backed implementation of the store interfaces:
//! - Review cards keyed by vocabulary item id
//! - Singleton user profile with materialized defaults
//! - Study session log and additive per-day aggregates
//! - Local coin ledger with a pending-event sync queue

mod migrations;
mod sqlite;

pub use migrations::MIGRATIONS;
pub use sqlite::SqliteStore;
