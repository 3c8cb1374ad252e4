//! Managed-backend connection settings and environment variable handling.

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Connection settings for the managed backend's REST interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Project base URL, e.g. `https://project.example.co`
    pub base_url: String,
    /// Public API key sent with every request
    pub api_key: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    15
}

impl RemoteConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Create a configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `BOOKING_REMOTE_URL` (required): project base URL
    /// - `BOOKING_REMOTE_KEY` (required): API key
    /// - `BOOKING_REMOTE_TIMEOUT_SECS` (optional, default: 15)
    ///
    /// # Errors
    /// Returns an error if required variables are not set or invalid.
    pub fn from_env() -> Result<Self, String> {
        let base_url = env::var("BOOKING_REMOTE_URL")
            .map_err(|_| "BOOKING_REMOTE_URL environment variable not set".to_string())?;
        let api_key = env::var("BOOKING_REMOTE_KEY")
            .map_err(|_| "BOOKING_REMOTE_KEY environment variable not set".to_string())?;
        let timeout_secs = match env::var("BOOKING_REMOTE_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .map_err(|_| format!("Invalid BOOKING_REMOTE_TIMEOUT_SECS: {}", raw))?,
            Err(_) => default_timeout_secs(),
        };

        let config = Self {
            base_url,
            api_key,
            timeout_secs,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that the URL is http(s) and the key is present.
    pub fn validate(&self) -> Result<(), String> {
        let url = self.base_url.trim();
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(format!("Remote base URL must be http(s): '{}'", self.base_url));
        }
        if self.api_key.trim().is_empty() {
            return Err("Remote API key must not be empty".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("Remote timeout must be at least one second".to_string());
        }
        Ok(())
    }

    /// REST endpoint for a table, without trailing slash duplication.
    pub fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url.trim().trim_end_matches('/'), table)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
