//! Client Configuration
//!
//! Loads configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Directory name under the platform data directory.
const APP_DIR_NAME: &str = "jrnl";

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding persisted state (default: `<data dir>/jrnl`)
    pub data_dir: PathBuf,

    /// Per-request HTTP timeout in seconds (default: 30)
    pub http_timeout_secs: u64,

    /// Deliveries allowed in flight during one send (default: 4)
    pub max_in_flight: usize,

    /// Sentry DSN for error reporting (optional)
    pub sentry_dsn: Option<String>,

    /// Deployment environment reported to Sentry (default: "development")
    pub app_env: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let data_dir = match lookup("JRNL_DATA_DIR") {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => default_data_dir(),
        };

        let http_timeout_secs = match lookup("JRNL_HTTP_TIMEOUT_SECS") {
            Some(v) => v
                .parse()
                .with_context(|| format!("JRNL_HTTP_TIMEOUT_SECS is not a number: {v}"))?,
            None => 30,
        };

        let max_in_flight = match lookup("JRNL_MAX_IN_FLIGHT") {
            Some(v) => v
                .parse::<usize>()
                .with_context(|| format!("JRNL_MAX_IN_FLIGHT is not a number: {v}"))?
                .max(1),
            None => 4,
        };

        Ok(Self {
            data_dir,
            http_timeout_secs,
            max_in_flight,
            sentry_dsn: lookup("SENTRY_DSN_CLIENT").filter(|dsn| !dsn.is_empty()),
            app_env: lookup("APP_ENV").unwrap_or_else(|| "development".into()),
        })
    }

    pub const fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

fn default_data_dir() -> PathBuf {
    dirs_next::data_dir()
        .or_else(dirs_next::home_dir)
        .unwrap_or_default()
        .join(APP_DIR_NAME)
}
