// src/config.rs

use std::env;
use std::path::PathBuf;
use dotenvy::dotenv;

/// Login seeded into an empty user directory when `ADMIN_LOGIN` is unset.
pub const DEFAULT_ADMIN_LOGIN: &str = "admin";
/// Password seeded alongside [`DEFAULT_ADMIN_LOGIN`] when `ADMIN_PASSWORD` is unset.
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the JSON documents.
    pub data_dir: PathBuf,
    /// Directory the frontend is served from.
    pub static_dir: PathBuf,
    pub log_dir: PathBuf,
    pub port: u16,
    pub rust_log: String,
    /// Allowed CORS origins. Empty means any origin.
    pub cors_origins: Vec<String>,
    pub admin_login: Option<String>,
    pub admin_password: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let data_dir = env::var("DATA_DIR")
            .unwrap_or_else(|_| "data".to_string())
            .into();

        let static_dir = env::var("STATIC_DIR")
            .unwrap_or_else(|_| "static".to_string())
            .into();

        let log_dir = env::var("LOG_DIR")
            .unwrap_or_else(|_| "logs".to_string())
            .into();

        let port = env::var("PORT")
            .ok()
            .map(|p| p.parse().expect("PORT must be a valid port number"))
            .unwrap_or(5000);

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        let cors_origins = env::var("CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        let admin_login = env::var("ADMIN_LOGIN").ok();
        let admin_password = env::var("ADMIN_PASSWORD").ok();

        Self {
            data_dir,
            static_dir,
            log_dir,
            port,
            rust_log,
            cors_origins,
            admin_login,
            admin_password,
        }
    }

    /// Configuration rooted at `data_dir`, used by tests and tooling.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            static_dir: data_dir.join("static"),
            log_dir: data_dir.join("logs"),
            data_dir,
            port: 0,
            rust_log: "error".to_string(),
            cors_origins: Vec::new(),
            admin_login: None,
            admin_password: None,
        }
    }
}
