//! Configuration module for the Violet backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Base URL of the upstream content provider. Empty disables fetching.
    pub provider_url: String,
    /// Per-request timeout for provider calls
    pub provider_timeout: Duration,
    /// Bootstrap admin account, seeded into the admin set on startup
    pub admin_email: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let db_path = env::var("VIOLET_DB_PATH")
            .unwrap_or_else(|_| "./data/violet.sqlite".to_string())
            .into();

        let bind_addr = env::var("VIOLET_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .expect("Invalid VIOLET_BIND_ADDR format");

        let log_level = env::var("VIOLET_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let provider_url = env::var("VIOLET_PROVIDER_URL")
            .unwrap_or_else(|_| "https://jsonplaceholder.typicode.com".to_string());

        let provider_timeout = env::var("VIOLET_PROVIDER_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(10));

        let admin_email =
            env::var("VIOLET_ADMIN_EMAIL").unwrap_or_else(|_| "admin@example.com".to_string());

        Self {
            db_path,
            bind_addr,
            log_level,
            provider_url,
            provider_timeout,
            admin_email,
        }
    }

    /// True when a provider base URL is configured.
    pub fn provider_enabled(&self) -> bool {
        !self.provider_url.trim().is_empty()
    }
}
