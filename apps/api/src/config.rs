use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the staffing REST API, e.g. `http://localhost:6262`.
    pub upstream_api_url: String,
    /// Bearer token sent with every upstream call, when set.
    pub upstream_api_token: Option<String>,
    pub upstream_timeout: Duration,
    /// Operator sessions unused for this long are dropped.
    pub session_idle_timeout: Duration,
    pub max_sessions: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            upstream_api_url: require_env("UPSTREAM_API_URL")?,
            upstream_api_token: std::env::var("UPSTREAM_API_TOKEN")
                .ok()
                .filter(|t| !t.trim().is_empty()),
            upstream_timeout: Duration::from_secs(
                std::env::var("UPSTREAM_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse::<u64>()
                    .context("UPSTREAM_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            session_idle_timeout: Duration::from_secs(
                std::env::var("SESSION_IDLE_SECS")
                    .unwrap_or_else(|_| "28800".to_string())
                    .parse::<u64>()
                    .context("SESSION_IDLE_SECS must be a whole number of seconds")?,
            ),
            max_sessions: std::env::var("MAX_SESSIONS")
                .unwrap_or_else(|_| "1024".to_string())
                .parse::<usize>()
                .context("MAX_SESSIONS must be a whole number")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
