#![forbid(unsafe_code)]

mod achievements;
mod categories;
mod completions;
mod error;
mod requests;
mod rows;
mod stats;
mod users;

pub use error::StoreError;
pub use requests::*;
pub use rows::*;

use lt_core::ids::{AchievementId, CategoryId, UserId};
use rusqlite::{Connection, ErrorCode, Transaction, params};
use std::path::{Path, PathBuf};
use std::time::Duration;

const DB_FILE: &str = "lifetrack.db";
const SCHEMA_VERSION: &str = "v1";

#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
    storage_dir: PathBuf,
}

impl SqliteStore {
    pub fn open(storage_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let storage_dir = storage_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&storage_dir)?;

        let conn = Connection::open(storage_dir.join(DB_FILE))?;
        conn.busy_timeout(Duration::from_secs(5))?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        install_schema(&conn)?;

        Ok(Self { conn, storage_dir })
    }

    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }
}

fn install_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        r#"
        PRAGMA journal_mode=WAL;
        PRAGMA synchronous=NORMAL;

        CREATE TABLE IF NOT EXISTS meta (
          key TEXT PRIMARY KEY,
          value TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS counters (
          name TEXT PRIMARY KEY,
          value INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS users (
          id TEXT PRIMARY KEY,
          email TEXT NOT NULL UNIQUE,
          created_at_ms INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS categories (
          id TEXT PRIMARY KEY,
          name TEXT NOT NULL UNIQUE,
          description TEXT NOT NULL,
          display_order INTEGER NOT NULL,
          created_at_ms INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS achievements (
          id TEXT PRIMARY KEY,
          title TEXT NOT NULL,
          description TEXT NOT NULL,
          category_id TEXT REFERENCES categories(id),
          custom_achievement INTEGER NOT NULL DEFAULT 0,
          created_at_ms INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS user_achievements (
          user_id TEXT NOT NULL REFERENCES users(id),
          achievement_id TEXT NOT NULL REFERENCES achievements(id),
          achieved_at_ms INTEGER NOT NULL,
          points_at_achievement INTEGER NOT NULL,
          PRIMARY KEY (user_id, achievement_id)
        );

        CREATE INDEX IF NOT EXISTS idx_user_achievements_achievement
          ON user_achievements(achievement_id);
        "#,
    )?;
    conn.execute(
        "INSERT OR IGNORE INTO meta(key, value) VALUES (?1, ?2)",
        params!["schema_version", SCHEMA_VERSION],
    )?;
    Ok(())
}

fn now_ms() -> i64 {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    now.as_millis() as i64
}

fn next_counter_tx(tx: &Transaction<'_>, name: &str) -> Result<i64, StoreError> {
    use rusqlite::OptionalExtension as _;
    let current: i64 = tx
        .query_row(
            "SELECT value FROM counters WHERE name = ?1",
            params![name],
            |row| row.get(0),
        )
        .optional()?
        .unwrap_or(0);
    let next = current + 1;
    tx.execute(
        r#"
        INSERT INTO counters(name, value) VALUES (?1, ?2)
        ON CONFLICT(name) DO UPDATE SET value=excluded.value
        "#,
        params![name, next],
    )?;
    Ok(next)
}

fn canonicalize_user(value: &str) -> Result<String, StoreError> {
    UserId::try_new(value)
        .map(|id| id.as_str().to_string())
        .map_err(|_| StoreError::InvalidInput("invalid user id"))
}

fn canonicalize_achievement(value: &str) -> Result<String, StoreError> {
    AchievementId::try_new(value)
        .map(|id| id.as_str().to_string())
        .map_err(|_| StoreError::InvalidInput("invalid achievement id"))
}

fn canonicalize_category(value: &str) -> Result<String, StoreError> {
    CategoryId::try_new(value)
        .map(|id| id.as_str().to_string())
        .map_err(|_| StoreError::InvalidInput("invalid category id"))
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(code, message) => {
            code.code == ErrorCode::ConstraintViolation
                || message.as_deref().is_some_and(|value| {
                    value.contains("UNIQUE constraint failed")
                        || value.contains("PRIMARY KEY constraint failed")
                        || value.contains("FOREIGN KEY constraint failed")
                })
        }
        _ => false,
    }
}

fn constraint_mentions(err: &rusqlite::Error, column: &str) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(_, message) => message
            .as_deref()
            .is_some_and(|value| value.contains(column)),
        _ => false,
    }
}

fn map_insert_conflict(err: rusqlite::Error, mapped: StoreError) -> StoreError {
    if is_constraint_violation(&err) {
        return mapped;
    }
    StoreError::Sql(err)
}
