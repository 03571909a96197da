//! Cookie-session authentication (register / login / logout / check)

use actix_web::{cookie::Cookie, get, post, web, HttpRequest, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::db::{models::User, user_repo};
use crate::error::ApiError;
use crate::session::{SessionStore, SESSION_COOKIE};

//////////////////////////////////////////////////
// Data structs
//////////////////////////////////////////////////

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub avatar: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Public view of a user row. Never carries the password hash.
#[derive(Serialize)]
pub struct UserInfo {
    pub id: i64,
    pub player_id: String,
    pub username: String,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        UserInfo {
            id: user.id,
            player_id: user.player_id,
            username: user.username,
            avatar: user.avatar,
            created_at: user.created_at,
        }
    }
}

//////////////////////////////////////////////////
// ─────────────  Auth extractor  ─────────────
//////////////////////////////////////////////////

pub mod extractor {
    use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
    use futures_util::future::{ready, Ready};

    use crate::error::ApiError;
    use crate::session::{SessionStore, SESSION_COOKIE};

    /// Resolves the session cookie against the session store, exposing the
    /// authenticated user id to protected handlers.
    #[derive(Debug, Clone, Copy)]
    pub struct Auth {
        pub user_id: i64,
    }

    impl FromRequest for Auth {
        type Error = ApiError;
        type Future = Ready<Result<Self, Self::Error>>;

        fn from_request(req: &HttpRequest, _pl: &mut Payload) -> Self::Future {
            let res = (|| {
                let cookie = req
                    .cookie(SESSION_COOKIE)
                    .ok_or(ApiError::Unauthenticated)?;

                let store = req
                    .app_data::<web::Data<SessionStore>>()
                    .ok_or(ApiError::Unauthenticated)?;

                let user_id = store
                    .user_id(cookie.value())
                    .ok_or(ApiError::Unauthenticated)?;

                Ok(Auth { user_id })
            })();

            ready(res)
        }
    }
}
pub use extractor::Auth; // <-- makes path crate::http::auth::Auth work

//////////////////////////////////////////////////
// POST /api/auth/register
//////////////////////////////////////////////////
#[post("/auth/register")]
pub async fn register(
    info: web::Json<RegisterRequest>,
    db: web::Data<SqlitePool>,
    sessions: web::Data<SessionStore>,
) -> Result<HttpResponse, ApiError> {
    let username = non_empty(&info.username)?;
    let password = non_empty(&info.password)?;

    if user_repo::find_by_username(&db, username).await?.is_some() {
        return Err(ApiError::DuplicateUsername);
    }

    let avatar = info.avatar.as_deref().unwrap_or("default.png");

    let mut tx = db.begin().await?;
    let user = user_repo::create(&mut tx, username, password, avatar).await?;
    tx.commit().await?;

    // auto-login
    let token = sessions.create(user.id);

    Ok(HttpResponse::Created()
        .cookie(session_cookie(token))
        .json(UserInfo::from(user)))
}

//////////////////////////////////////////////////
// POST /api/auth/login
//////////////////////////////////////////////////
#[post("/auth/login")]
pub async fn login(
    req: HttpRequest,
    info: web::Json<LoginRequest>,
    db: web::Data<SqlitePool>,
    sessions: web::Data<SessionStore>,
) -> Result<HttpResponse, ApiError> {
    let username = non_empty(&info.username)?;
    let password = non_empty(&info.password)?;

    let user = user_repo::find_by_username(&db, username)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;
    if !user_repo::verify_password(&user, password) {
        return Err(ApiError::InvalidCredentials);
    }

    let ip = req
        .connection_info()
        .realip_remote_addr()
        .map(str::to_string);
    let user_agent = req
        .headers()
        .get("User-Agent")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let mut tx = db.begin().await?;
    user_repo::record_login(&mut tx, user.id, ip.as_deref(), user_agent.as_deref()).await?;
    tx.commit().await?;

    let token = sessions.create(user.id);

    Ok(HttpResponse::Ok()
        .cookie(session_cookie(token))
        .json(UserInfo::from(user)))
}

//////////////////////////////////////////////////
// POST /api/auth/logout
//////////////////////////////////////////////////
#[post("/auth/logout")]
pub async fn logout(req: HttpRequest, sessions: web::Data<SessionStore>) -> HttpResponse {
    // revoke whatever token came in, authenticated or not
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        sessions.revoke(cookie.value());
    }

    let mut expired = Cookie::build(SESSION_COOKIE, "").path("/").finish();
    expired.make_removal();

    HttpResponse::Ok()
        .cookie(expired)
        .json(serde_json::json!({ "message": "Logged out successfully" }))
}

//////////////////////////////////////////////////
// GET /api/auth/check
//////////////////////////////////////////////////
#[get("/auth/check")]
pub async fn check(auth: Auth, db: web::Data<SqlitePool>) -> Result<HttpResponse, ApiError> {
    let user = user_repo::find_by_id(&db, auth.user_id)
        .await?
        .ok_or(ApiError::Unauthenticated)?;
    Ok(HttpResponse::Ok().json(UserInfo::from(user)))
}

fn non_empty(field: &Option<String>) -> Result<&str, ApiError> {
    match field.as_deref() {
        Some(s) if !s.is_empty() => Ok(s),
        _ => Err(ApiError::validation("Missing username or password")),
    }
}

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .finish()
}

//////////////////////////////////////////////////
// Mount
//////////////////////////////////////////////////
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(register)
        .service(login)
        .service(logout)
        .service(check);
}
