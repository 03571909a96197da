//! Avatar upload and per-user statistics.

use actix_multipart::Multipart;
use actix_web::{get, post, web, HttpResponse};
use chrono::Utc;
use futures_util::TryStreamExt;
use sqlx::SqlitePool;
use std::path::Path;

use crate::config;
use crate::db::{session_repo, user_repo};
use crate::error::ApiError;
use crate::http::auth::Auth;
use crate::stats;

const ALLOWED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

/// POST /api/profile/avatar
///
/// Reads the `avatar` multipart field, stores it under the upload
/// directory as `{user_id}_{timestamp}_{original name}` and replaces any
/// previous avatar file.
#[post("/profile/avatar")]
pub async fn upload_avatar(
    auth: Auth,
    mut payload: Multipart,
    db: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    let settings = config::settings();
    let mut stored: Option<String> = None;

    while let Some(mut field) = payload.try_next().await.map_err(bad_multipart)? {
        if field.name() != "avatar" {
            // drain and skip unrelated fields
            while field.try_next().await.map_err(bad_multipart)?.is_some() {}
            continue;
        }

        let filename = field
            .content_disposition()
            .get_filename()
            .map(str::to_string)
            .unwrap_or_default();
        if filename.is_empty() {
            return Err(ApiError::validation("No selected file"));
        }
        if !allowed_file(&filename) {
            return Err(ApiError::InvalidFileType);
        }

        let mut data = Vec::new();
        while let Some(chunk) = field.try_next().await.map_err(bad_multipart)? {
            data.extend_from_slice(&chunk);
            if data.len() > settings.max_avatar_bytes {
                return Err(ApiError::FileTooLarge);
            }
        }

        let name = format!(
            "{}_{}_{}",
            auth.user_id,
            Utc::now().format("%Y%m%d_%H%M%S"),
            sanitize_filename(&filename)
        );
        tokio::fs::write(Path::new(&settings.upload_dir).join(&name), &data).await?;
        stored = Some(name);
        break;
    }

    let Some(stored) = stored else {
        return Err(ApiError::validation("No file part"));
    };

    let user = user_repo::find_by_id(&db, auth.user_id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    // delete the previous avatar file, if one was uploaded before
    if let Some(old) = &user.avatar {
        let old_path = Path::new(&settings.upload_dir).join(old);
        if old_path.is_file() {
            tokio::fs::remove_file(&old_path).await.ok();
        }
    }

    let mut tx = db.begin().await?;
    user_repo::set_avatar(&mut tx, auth.user_id, &stored).await?;
    tx.commit().await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "avatar": stored })))
}

/// GET /api/profile/stats/{user_id}
#[get("/profile/stats/{user_id}")]
pub async fn user_stats(
    _auth: Auth,
    path: web::Path<i64>,
    db: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    let outcomes = session_repo::player_outcomes(&db, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(stats::summarize(&outcomes)))
}

fn bad_multipart(err: actix_multipart::MultipartError) -> ApiError {
    log::debug!("rejecting multipart payload: {err}");
    ApiError::validation("Invalid multipart payload")
}

fn allowed_file(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Keep the stored name shell- and path-safe, werkzeug style.
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

//////////////////////////////////////////////////
// Mount
//////////////////////////////////////////////////
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(upload_avatar).service(user_stats);
}
