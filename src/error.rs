//! Request-boundary error type and its HTTP mapping.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

/// Every failure a handler can surface. Rendered as `{"error": ...}` with
/// a 400/401/404/500 status at the request boundary.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Username already exists")]
    DuplicateUsername,

    #[error("Friendship already exists")]
    DuplicateFriendship,

    #[error("Cannot add yourself as a friend")]
    SelfFriend,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Invalid file type")]
    InvalidFileType,

    #[error("File too large")]
    FileTooLarge,

    #[error("Internal server error")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error")]
    Io(#[from] std::io::Error),

    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    /// Missing or malformed request field.
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::Validation(msg.into())
    }

    /// Re-map a unique-constraint violation to a domain error, passing
    /// every other database failure through unchanged.
    pub fn on_unique(err: sqlx::Error, unique: ApiError) -> Self {
        match err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => unique,
            other => ApiError::Database(other),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_)
            | ApiError::DuplicateUsername
            | ApiError::DuplicateFriendship
            | ApiError::SelfFriend
            | ApiError::InvalidFileType
            | ApiError::FileTooLarge => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated | ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Database(_) | ApiError::Io(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::Database(e) => log::error!("database failure: {e}"),
            ApiError::Io(e) => log::error!("io failure: {e}"),
            ApiError::Internal(msg) => log::error!("internal failure: {msg}"),
            _ => {}
        }
        HttpResponse::build(self.status_code())
            .json(serde_json::json!({ "error": self.to_string() }))
    }
}
