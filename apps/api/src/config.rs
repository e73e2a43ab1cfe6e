use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a default — a bare `genius-map-api` starts with a
/// local `./data` directory and the template report generator.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root directory for the key/value JSON blobs.
    pub data_dir: PathBuf,
    pub port: u16,
    /// Delay before a merged section update is persisted.
    pub debounce_ms: u64,
    /// Upper bound on a single report generation request.
    pub report_timeout_secs: u64,
    /// When set, reports are generated by Claude instead of the
    /// built-in templates.
    pub anthropic_api_key: Option<String>,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            data_dir: std::env::var("DATA_DIR")
                .unwrap_or_else(|_| "./data".to_string())
                .into(),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            debounce_ms: std::env::var("DEBOUNCE_MS")
                .unwrap_or_else(|_| "300".to_string())
                .parse::<u64>()
                .context("DEBOUNCE_MS must be a number of milliseconds")?,
            report_timeout_secs: std::env::var("REPORT_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse::<u64>()
                .context("REPORT_TIMEOUT_SECS must be a number of seconds")?,
            anthropic_api_key: std::env::var("ANTHROPIC_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}
