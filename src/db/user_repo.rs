//! User accounts, credentials, and login history.

use argon2::{
    password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

use crate::db::models::User;
use crate::error::ApiError;

const USER_COLUMNS: &str = "id, player_id, username, password_hash, avatar, created_at";

/// Insert a new user with an argon2-hashed password and a generated
/// public player id.
pub async fn create(
    conn: &mut SqliteConnection,
    username: &str,
    password: &str,
    avatar: &str,
) -> Result<User, ApiError> {
    let password_hash = hash_password(password)?;
    let player_id = generate_player_id();

    sqlx::query_as::<_, User>(
        "INSERT INTO users (player_id, username, password_hash, avatar, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5) \
         RETURNING id, player_id, username, password_hash, avatar, created_at",
    )
    .bind(&player_id)
    .bind(username)
    .bind(&password_hash)
    .bind(avatar)
    .bind(Utc::now())
    .fetch_one(conn)
    .await
    .map_err(|e| ApiError::on_unique(e, ApiError::DuplicateUsername))
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> Result<Option<User>, ApiError> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE username = ?1"
    ))
    .bind(username)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<User>, ApiError> {
    let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

/// Look a user up by their public player id.
pub async fn find_by_player_id(
    pool: &SqlitePool,
    player_id: &str,
) -> Result<Option<User>, ApiError> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE player_id = ?1"
    ))
    .bind(player_id)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

/// Case-insensitive substring search on username, excluding the caller.
pub async fn search(
    pool: &SqlitePool,
    query: &str,
    exclude_user_id: i64,
) -> Result<Vec<User>, ApiError> {
    let pattern = format!("%{query}%");
    let users = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE username LIKE ?1 AND id != ?2 LIMIT 10"
    ))
    .bind(&pattern)
    .bind(exclude_user_id)
    .fetch_all(pool)
    .await?;
    Ok(users)
}

/// Append a login_history row. Append-only, never read back by the API.
pub async fn record_login(
    conn: &mut SqliteConnection,
    user_id: i64,
    ip_address: Option<&str>,
    user_agent: Option<&str>,
) -> Result<(), ApiError> {
    sqlx::query(
        "INSERT INTO login_history (user_id, login_time, ip_address, user_agent) \
         VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(user_id)
    .bind(Utc::now())
    .bind(ip_address)
    .bind(user_agent)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn set_avatar(
    conn: &mut SqliteConnection,
    user_id: i64,
    avatar: &str,
) -> Result<(), ApiError> {
    sqlx::query("UPDATE users SET avatar = ?1 WHERE id = ?2")
        .bind(avatar)
        .bind(user_id)
        .execute(conn)
        .await?;
    Ok(())
}

/// Check a plaintext password against the stored argon2 hash.
pub fn verify_password(user: &User, password: &str) -> bool {
    PasswordHash::new(&user.password_hash)
        .map(|hash| {
            Argon2::default()
                .verify_password(password.as_bytes(), &hash)
                .is_ok()
        })
        .unwrap_or(false)
}

fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Internal(format!("password hashing failed: {e}")))
}

/// Short hex token used as the public player id.
fn generate_player_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(12);
    id
}
