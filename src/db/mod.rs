//! SQLite pool bootstrap, schema creation, and first-run seeding.

pub mod friend_repo;
pub mod models;
pub mod player_repo;
pub mod session_repo;
pub mod user_repo;

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

// session_players / player_results carry no uniqueness constraints and no
// ON DELETE action: deleting a session leaves its rows behind.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    player_id     TEXT NOT NULL UNIQUE,
    username      TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    avatar        TEXT,
    created_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS login_history (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id    INTEGER NOT NULL REFERENCES users(id),
    login_time TEXT NOT NULL,
    ip_address TEXT,
    user_agent TEXT
);

CREATE TABLE IF NOT EXISTS players (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    username   TEXT NOT NULL UNIQUE,
    score      INTEGER NOT NULL DEFAULT 0,
    avatar     TEXT,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS poker_sessions (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    date          TEXT NOT NULL,
    buy_in_amount REAL,
    notes         TEXT,
    created_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS session_players (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    session_id INTEGER NOT NULL REFERENCES poker_sessions(id),
    player_id  INTEGER NOT NULL REFERENCES players(id)
);

CREATE TABLE IF NOT EXISTS player_results (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    session_id   INTEGER NOT NULL REFERENCES poker_sessions(id),
    player_id    INTEGER NOT NULL REFERENCES players(id),
    final_amount REAL NOT NULL
);

CREATE TABLE IF NOT EXISTS friendships (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id    INTEGER NOT NULL REFERENCES users(id),
    friend_id  INTEGER NOT NULL REFERENCES users(id),
    status     TEXT NOT NULL DEFAULT 'pending',
    created_at TEXT NOT NULL,
    UNIQUE (user_id, friend_id)
);
"#;

/// Open (and create if missing) the SQLite database behind `database_url`.
pub async fn connect(database_url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .context("invalid DATABASE_URL")?
        .create_if_missing(true);

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .context("opening sqlite pool")
}

/// Create every table that does not exist yet. Idempotent.
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::raw_sql(SCHEMA)
        .execute(pool)
        .await
        .context("creating schema")?;
    Ok(())
}

/// Populate the leaderboard with sample players on a fresh database.
pub async fn seed_sample_players(pool: &SqlitePool) -> Result<()> {
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM players")
        .fetch_one(pool)
        .await
        .context("counting players")?;
    if existing > 0 {
        return Ok(());
    }

    let samples = [
        ("PokerPro", 1500i64),
        ("CardShark", 1200),
        ("RiverKing", 1000),
        ("BluffMaster", 800),
        ("AceHigh", 750),
    ];
    for (username, score) in samples {
        sqlx::query("INSERT INTO players (username, score, created_at) VALUES (?1, ?2, ?3)")
            .bind(username)
            .bind(score)
            .bind(chrono::Utc::now())
            .execute(pool)
            .await
            .context("inserting sample player")?;
    }

    log::info!("seeded {} sample players", samples.len());
    Ok(())
}
