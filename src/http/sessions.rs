//! Poker session CRUD and per-session results.

use actix_web::{delete, get, post, web, HttpResponse};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::db::{models::PokerSession, session_repo};
use crate::error::ApiError;
use crate::http::auth::Auth;

//////////////////////////////////////////////////
// Data structs
//////////////////////////////////////////////////

#[derive(Deserialize)]
pub struct CreateSessionRequest {
    pub date: Option<String>,
    pub buy_in_amount: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct AddResultRequest {
    pub player_id: Option<i64>,
    pub final_amount: Option<f64>,
}

#[derive(Serialize)]
pub struct SessionRow {
    pub id: i64,
    pub date: NaiveDate,
    pub buy_in_amount: Option<f64>,
    pub notes: Option<String>,
}

impl From<PokerSession> for SessionRow {
    fn from(s: PokerSession) -> Self {
        SessionRow {
            id: s.id,
            date: s.date,
            buy_in_amount: s.buy_in_amount,
            notes: s.notes,
        }
    }
}

//////////////////////////////////////////////////
// Handlers
//////////////////////////////////////////////////

/// GET /api/sessions
#[get("/sessions")]
pub async fn list(_auth: Auth, db: web::Data<SqlitePool>) -> Result<HttpResponse, ApiError> {
    let sessions = session_repo::list(&db).await?;
    let rows: Vec<SessionRow> = sessions.into_iter().map(SessionRow::from).collect();
    Ok(HttpResponse::Ok().json(rows))
}

/// POST /api/sessions
#[post("/sessions")]
pub async fn create(
    _auth: Auth,
    info: web::Json<CreateSessionRequest>,
    db: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    let date_str = info
        .date
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::validation("Missing session date"))?;
    let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|_| ApiError::validation("Date must be formatted as YYYY-MM-DD"))?;

    let mut tx = db.begin().await?;
    let session = session_repo::create(&mut tx, date, info.buy_in_amount, info.notes.as_deref()).await?;
    tx.commit().await?;

    Ok(HttpResponse::Ok().json(SessionRow::from(session)))
}

/// DELETE /api/sessions/{id}
#[delete("/sessions/{id}")]
pub async fn remove(
    _auth: Auth,
    path: web::Path<i64>,
    db: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    let mut tx = db.begin().await?;
    if !session_repo::delete(&mut tx, path.into_inner()).await? {
        return Err(ApiError::NotFound("Session"));
    }
    tx.commit().await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Session deleted successfully" })))
}

/// GET /api/session/{id}/results
#[get("/session/{id}/results")]
pub async fn results(
    path: web::Path<i64>,
    db: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    let rows = session_repo::results(&db, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(rows))
}

/// POST /api/session/{id}/results
#[post("/session/{id}/results")]
pub async fn add_result(
    path: web::Path<i64>,
    info: web::Json<AddResultRequest>,
    db: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    let player_id = info
        .player_id
        .ok_or_else(|| ApiError::validation("Missing player_id"))?;
    let final_amount = info
        .final_amount
        .ok_or_else(|| ApiError::validation("Missing final_amount"))?;

    let mut tx = db.begin().await?;
    session_repo::add_result(&mut tx, path.into_inner(), player_id, final_amount).await?;
    tx.commit().await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "status": "success" })))
}

//////////////////////////////////////////////////
// Mount
//////////////////////////////////////////////////
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list)
        .service(create)
        .service(remove)
        .service(results)
        .service(add_result);
}
