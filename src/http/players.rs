//! Flat player records backing the leaderboard.

use actix_web::{get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::db::{models::Player, player_repo};
use crate::error::ApiError;

#[derive(Serialize)]
pub struct PlayerRow {
    pub id: i64,
    pub username: String,
    pub score: i64,
    pub avatar: Option<String>,
}

impl From<Player> for PlayerRow {
    fn from(p: Player) -> Self {
        PlayerRow {
            id: p.id,
            username: p.username,
            score: p.score,
            avatar: p.avatar,
        }
    }
}

#[derive(Deserialize)]
pub struct CreatePlayerRequest {
    pub username: Option<String>,
    pub avatar: Option<String>,
}

/// GET /api/players
#[get("/players")]
pub async fn list(db: web::Data<SqlitePool>) -> Result<HttpResponse, ApiError> {
    let players = player_repo::list(&db).await?;
    let rows: Vec<PlayerRow> = players.into_iter().map(PlayerRow::from).collect();
    Ok(HttpResponse::Ok().json(rows))
}

/// POST /api/players
#[post("/players")]
pub async fn create(
    info: web::Json<CreatePlayerRequest>,
    db: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    let username = info
        .username
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::validation("Missing username"))?;

    let mut tx = db.begin().await?;
    let player = player_repo::create(&mut tx, username, info.avatar.as_deref()).await?;
    tx.commit().await?;

    Ok(HttpResponse::Ok().json(PlayerRow::from(player)))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list).service(create);
}
