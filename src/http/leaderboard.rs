//! Top players by manually assigned score.

use actix_web::{get, web, HttpResponse};
use sqlx::SqlitePool;

use crate::db::player_repo;
use crate::error::ApiError;
use crate::http::players::PlayerRow;

/// GET /api/leaderboard
#[get("/leaderboard")]
pub async fn leaderboard(db: web::Data<SqlitePool>) -> Result<HttpResponse, ApiError> {
    let players = player_repo::top(&db, 10).await?;
    let rows: Vec<PlayerRow> = players.into_iter().map(PlayerRow::from).collect();
    Ok(HttpResponse::Ok().json(rows))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(leaderboard);
}
