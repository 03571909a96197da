//! Poker sessions, per-player results, and the stats query.

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use sqlx::{FromRow, SqliteConnection, SqlitePool};

use crate::db::models::PokerSession;
use crate::error::ApiError;
use crate::stats::SessionOutcome;

/// One result row joined with the player's username.
#[derive(Debug, Serialize, FromRow)]
pub struct SessionResultRow {
    pub player_id: i64,
    pub player_name: String,
    pub final_amount: f64,
}

pub async fn create(
    conn: &mut SqliteConnection,
    date: NaiveDate,
    buy_in_amount: Option<f64>,
    notes: Option<&str>,
) -> Result<PokerSession, ApiError> {
    let session = sqlx::query_as::<_, PokerSession>(
        "INSERT INTO poker_sessions (date, buy_in_amount, notes, created_at) \
         VALUES (?1, ?2, ?3, ?4) \
         RETURNING id, date, buy_in_amount, notes, created_at",
    )
    .bind(date)
    .bind(buy_in_amount)
    .bind(notes)
    .bind(Utc::now())
    .fetch_one(conn)
    .await?;
    Ok(session)
}

pub async fn list(pool: &SqlitePool) -> Result<Vec<PokerSession>, ApiError> {
    let sessions = sqlx::query_as::<_, PokerSession>(
        "SELECT id, date, buy_in_amount, notes, created_at FROM poker_sessions \
         ORDER BY date DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(sessions)
}

/// Delete a session row. Associated session_players / player_results rows
/// are left behind (no cascade).
pub async fn delete(conn: &mut SqliteConnection, id: i64) -> Result<bool, ApiError> {
    let rows = sqlx::query("DELETE FROM poker_sessions WHERE id = ?1")
        .bind(id)
        .execute(conn)
        .await?
        .rows_affected();
    Ok(rows > 0)
}

/// Attach a player's cash-out to a session. Inserts both the membership
/// row and the result row; re-submitting duplicates both.
pub async fn add_result(
    conn: &mut SqliteConnection,
    session_id: i64,
    player_id: i64,
    final_amount: f64,
) -> Result<(), ApiError> {
    sqlx::query("INSERT INTO session_players (session_id, player_id) VALUES (?1, ?2)")
        .bind(session_id)
        .bind(player_id)
        .execute(&mut *conn)
        .await?;

    sqlx::query(
        "INSERT INTO player_results (session_id, player_id, final_amount) VALUES (?1, ?2, ?3)",
    )
    .bind(session_id)
    .bind(player_id)
    .bind(final_amount)
    .execute(conn)
    .await?;
    Ok(())
}

/// All results for a session, joined with the player's username. Results
/// whose player row is gone are omitted by the join.
pub async fn results(
    pool: &SqlitePool,
    session_id: i64,
) -> Result<Vec<SessionResultRow>, ApiError> {
    let rows = sqlx::query_as::<_, SessionResultRow>(
        "SELECT r.player_id, p.username AS player_name, r.final_amount \
         FROM player_results r \
         JOIN players p ON p.id = r.player_id \
         WHERE r.session_id = ?1 \
         ORDER BY r.id",
    )
    .bind(session_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Sessions the player took part in, in join order, paired with their
/// first recorded result. Only the first 10 sessions get a result lookup;
/// the stats aggregation never inspects outcomes past that window.
pub async fn player_outcomes(
    pool: &SqlitePool,
    player_id: i64,
) -> Result<Vec<SessionOutcome>, ApiError> {
    let sessions = sqlx::query_as::<_, (i64, NaiveDate, Option<f64>, Option<String>)>(
        "SELECT s.id, s.date, s.buy_in_amount, s.notes \
         FROM poker_sessions s \
         JOIN session_players sp ON sp.session_id = s.id \
         WHERE sp.player_id = ?1 \
         ORDER BY sp.id",
    )
    .bind(player_id)
    .fetch_all(pool)
    .await?;

    let mut outcomes = Vec::with_capacity(sessions.len());
    for (i, (session_id, date, buy_in_amount, notes)) in sessions.into_iter().enumerate() {
        let final_amount = if i < 10 {
            sqlx::query_scalar::<_, f64>(
                "SELECT final_amount FROM player_results \
                 WHERE session_id = ?1 AND player_id = ?2 \
                 ORDER BY id LIMIT 1",
            )
            .bind(session_id)
            .bind(player_id)
            .fetch_optional(pool)
            .await?
        } else {
            None
        };

        outcomes.push(SessionOutcome {
            date,
            buy_in_amount,
            notes,
            final_amount,
        });
    }
    Ok(outcomes)
}
