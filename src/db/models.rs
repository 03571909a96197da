use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    /// Public identifier handed out for friend requests.
    pub player_id: String,
    pub username: String,
    pub password_hash: String,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct Player {
    pub id: i64,
    pub username: String,
    /// Manually assigned leaderboard score, never derived from results.
    pub score: i64,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct PokerSession {
    pub id: i64,
    pub date: NaiveDate,
    pub buy_in_amount: Option<f64>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}
