//! Friend requests (add / accept / reject / list / pending) and user search

use actix_web::{get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::db::{friend_repo, user_repo};
use crate::error::ApiError;
use crate::http::auth::{Auth, UserInfo};

//////////////////////////////////////////////////
// Requests
//////////////////////////////////////////////////

#[derive(Deserialize)]
pub struct AddFriendRequest {
    /// Public player id of the user being invited.
    pub player_id: Option<String>,
}

#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub query: String,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub player_id: String,
    pub username: String,
    pub avatar: Option<String>,
}

//////////////////////////////////////////////////
// Handlers
//////////////////////////////////////////////////

/// GET /api/friends
#[get("/friends")]
pub async fn friends(auth: Auth, db: web::Data<SqlitePool>) -> Result<HttpResponse, ApiError> {
    let friends = friend_repo::friends_of(&db, auth.user_id).await?;
    let out: Vec<UserInfo> = friends.into_iter().map(UserInfo::from).collect();
    Ok(HttpResponse::Ok().json(out))
}

/// GET /api/friends/pending
#[get("/friends/pending")]
pub async fn pending(auth: Auth, db: web::Data<SqlitePool>) -> Result<HttpResponse, ApiError> {
    let requesters = friend_repo::pending_for(&db, auth.user_id).await?;
    let out: Vec<UserInfo> = requesters.into_iter().map(UserInfo::from).collect();
    Ok(HttpResponse::Ok().json(out))
}

/// POST /api/friends/add
#[post("/friends/add")]
pub async fn add(
    auth: Auth,
    info: web::Json<AddFriendRequest>,
    db: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    let player_id = info
        .player_id
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::validation("Player ID is required"))?;

    let target = user_repo::find_by_player_id(&db, player_id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    let mut tx = db.begin().await?;
    friend_repo::add_friend(&mut tx, auth.user_id, target.id).await?;
    tx.commit().await?;

    Ok(HttpResponse::Created().json(serde_json::json!({ "message": "Friend request sent" })))
}

/// POST /api/friends/accept/{friend_id}
///
/// `friend_id` is the user id of the requester; only the recipient of a
/// still-pending request gets anything other than a 404.
#[post("/friends/accept/{friend_id}")]
pub async fn accept(
    auth: Auth,
    path: web::Path<i64>,
    db: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    let mut tx = db.begin().await?;
    if !friend_repo::accept(&mut tx, auth.user_id, path.into_inner()).await? {
        return Err(ApiError::NotFound("Friend request"));
    }
    tx.commit().await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Friend request accepted" })))
}

/// POST /api/friends/reject/{friend_id}
#[post("/friends/reject/{friend_id}")]
pub async fn reject(
    auth: Auth,
    path: web::Path<i64>,
    db: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    let mut tx = db.begin().await?;
    if !friend_repo::reject(&mut tx, auth.user_id, path.into_inner()).await? {
        return Err(ApiError::NotFound("Friend request"));
    }
    tx.commit().await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Friend request rejected" })))
}

/// GET /api/users/search?query=
#[get("/users/search")]
pub async fn search(
    auth: Auth,
    query: web::Query<SearchQuery>,
    db: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    if query.query.is_empty() {
        return Ok(HttpResponse::Ok().json(Vec::<SearchHit>::new()));
    }

    let users = user_repo::search(&db, &query.query, auth.user_id).await?;
    let hits: Vec<SearchHit> = users
        .into_iter()
        .map(|u| SearchHit {
            player_id: u.player_id,
            username: u.username,
            avatar: u.avatar,
        })
        .collect();
    Ok(HttpResponse::Ok().json(hits))
}

//////////////////////////////////////////////////
// Mount
//////////////////////////////////////////////////
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(friends)
        .service(pending)
        .service(add)
        .service(accept)
        .service(reject)
        .service(search);
}
