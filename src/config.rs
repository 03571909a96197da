//! Runtime configuration for the poker tracker server.

use once_cell::sync::Lazy;
use std::env;

#[derive(Debug)]
pub struct Settings {
    /// SQLite connection string.
    pub database_url: String,
    /// Address the HTTP server binds to.
    pub server_addr: String,
    /// Directory avatar uploads are written to.
    pub upload_dir: String,
    /// Upload size cap for avatar images (bytes).
    pub max_avatar_bytes: usize,
}

impl Settings {
    fn from_env() -> Self {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://poker_tracker.db".into());

        let server_addr = env::var("SERVER_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".into());

        let upload_dir = env::var("UPLOAD_DIR").unwrap_or_else(|_| "static/uploads".into());

        let max_avatar_bytes = env::var("MAX_AVATAR_BYTES")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(16 * 1024 * 1024); // 16 MiB

        Settings {
            database_url,
            server_addr,
            upload_dir,
            max_avatar_bytes,
        }
    }
}

static SETTINGS: Lazy<Settings> = Lazy::new(Settings::from_env);

pub fn settings() -> &'static Settings {
    &SETTINGS
}
