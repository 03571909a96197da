//! Flat leaderboard player records.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};

use crate::db::models::Player;
use crate::error::ApiError;

pub async fn create(
    conn: &mut SqliteConnection,
    username: &str,
    avatar: Option<&str>,
) -> Result<Player, ApiError> {
    sqlx::query_as::<_, Player>(
        "INSERT INTO players (username, score, avatar, created_at) \
         VALUES (?1, 0, ?2, ?3) \
         RETURNING id, username, score, avatar, created_at",
    )
    .bind(username)
    .bind(avatar)
    .bind(Utc::now())
    .fetch_one(conn)
    .await
    .map_err(|e| ApiError::on_unique(e, ApiError::DuplicateUsername))
}

pub async fn list(pool: &SqlitePool) -> Result<Vec<Player>, ApiError> {
    let players = sqlx::query_as::<_, Player>(
        "SELECT id, username, score, avatar, created_at FROM players ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    Ok(players)
}

/// Top `limit` players by score, descending.
pub async fn top(pool: &SqlitePool, limit: i64) -> Result<Vec<Player>, ApiError> {
    let players = sqlx::query_as::<_, Player>(
        "SELECT id, username, score, avatar, created_at FROM players \
         ORDER BY score DESC, id LIMIT ?1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(players)
}
