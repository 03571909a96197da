//! Friend-request lifecycle and friendship lookups.
//!
//! A friendship is a directed row (user_id → friend_id) with a status of
//! pending, accepted or rejected. Only the recipient may move a pending
//! row forward, and nothing ever moves out of accepted or rejected.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};

use crate::db::models::User;
use crate::error::ApiError;

const USER_COLUMNS: &str = "u.id, u.player_id, u.username, u.password_hash, u.avatar, u.created_at";

/// Insert a pending request from `user_id` to `friend_id`. Fails when the
/// two are the same user or when any row already links the pair in either
/// direction, whatever its status: a rejected pair stays closed.
pub async fn add_friend(
    conn: &mut SqliteConnection,
    user_id: i64,
    friend_id: i64,
) -> Result<(), ApiError> {
    if user_id == friend_id {
        return Err(ApiError::SelfFriend);
    }

    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS( \
             SELECT 1 FROM friendships \
             WHERE (user_id = ?1 AND friend_id = ?2) \
                OR (user_id = ?2 AND friend_id = ?1))",
    )
    .bind(user_id)
    .bind(friend_id)
    .fetch_one(&mut *conn)
    .await?;
    if exists {
        return Err(ApiError::DuplicateFriendship);
    }

    sqlx::query(
        "INSERT INTO friendships (user_id, friend_id, status, created_at) \
         VALUES (?1, ?2, 'pending', ?3)",
    )
    .bind(user_id)
    .bind(friend_id)
    .bind(Utc::now())
    .execute(conn)
    .await
    .map_err(|e| ApiError::on_unique(e, ApiError::DuplicateFriendship))?;
    Ok(())
}

/// Recipient accepts the pending request sent by `requester_id`.
pub async fn accept(
    conn: &mut SqliteConnection,
    recipient_id: i64,
    requester_id: i64,
) -> Result<bool, ApiError> {
    respond(conn, recipient_id, requester_id, "accepted").await
}

/// Recipient rejects the pending request sent by `requester_id`.
pub async fn reject(
    conn: &mut SqliteConnection,
    recipient_id: i64,
    requester_id: i64,
) -> Result<bool, ApiError> {
    respond(conn, recipient_id, requester_id, "rejected").await
}

// The WHERE clause is the whole state machine: only the recipient side of
// a still-pending row matches, so wrong callers and settled rows both
// come back as zero rows affected.
async fn respond(
    conn: &mut SqliteConnection,
    recipient_id: i64,
    requester_id: i64,
    status: &str,
) -> Result<bool, ApiError> {
    let rows = sqlx::query(
        "UPDATE friendships SET status = ?1 \
         WHERE user_id = ?2 AND friend_id = ?3 AND status = 'pending'",
    )
    .bind(status)
    .bind(requester_id)
    .bind(recipient_id)
    .execute(conn)
    .await?
    .rows_affected();
    Ok(rows > 0)
}

/// Accepted friendships from either side, resolved to the counterpart.
pub async fn friends_of(pool: &SqlitePool, user_id: i64) -> Result<Vec<User>, ApiError> {
    let friends = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} \
         FROM friendships f \
         JOIN users u ON u.id = CASE WHEN f.user_id = ?1 THEN f.friend_id ELSE f.user_id END \
         WHERE (f.user_id = ?1 OR f.friend_id = ?1) AND f.status = 'accepted' \
         ORDER BY f.id"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(friends)
}

/// Pending requests where `user_id` is the recipient, resolved to the
/// requester.
pub async fn pending_for(pool: &SqlitePool, user_id: i64) -> Result<Vec<User>, ApiError> {
    let requesters = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} \
         FROM friendships f \
         JOIN users u ON u.id = f.user_id \
         WHERE f.friend_id = ?1 AND f.status = 'pending' \
         ORDER BY f.id"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(requesters)
}
