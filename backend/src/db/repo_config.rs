//! Repository configuration file support.
//!
//! Reads `booking.toml`:
//!
//! ```toml
//! [repository]
//! type = "remote"
//!
//! [remote]
//! base_url = "https://project.example.co"
//! api_key = "public-anon-key"
//! timeout_secs = 15
//!
//! [session]
//! ttl_minutes = 720
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::config::RemoteConfig;
use super::factory::RepositoryType;
use super::repository::RepositoryError;
use crate::session::{DEFAULT_SESSION_TTL_MINUTES, MAX_SESSION_TTL_MINUTES};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "booking.toml";

/// Repository configuration from file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    pub repository: RepositorySettings,
    #[serde(default)]
    pub remote: Option<RemoteConfig>,
    #[serde(default)]
    pub session: SessionSettings,
}

/// Repository type settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositorySettings {
    #[serde(rename = "type")]
    pub repo_type: String,
}

/// Session lifetime settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    #[serde(default = "default_ttl_minutes")]
    pub ttl_minutes: i64,
}

fn default_ttl_minutes() -> i64 {
    DEFAULT_SESSION_TTL_MINUTES
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            ttl_minutes: default_ttl_minutes(),
        }
    }
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            repository: RepositorySettings {
                repo_type: "local".to_string(),
            },
            remote: None,
            session: SessionSettings::default(),
        }
    }
}

impl RepositoryConfig {
    /// Load repository configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RepositoryError::configuration(format!("Failed to read config file: {}", e))
        })?;

        Self::parse(&content)
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, RepositoryError> {
        toml::from_str(content).map_err(|e| {
            RepositoryError::configuration(format!("Failed to parse config file: {}", e))
        })
    }

    /// Load repository configuration from the default location.
    ///
    /// Searches for `booking.toml` in the current directory, `backend/` and
    /// the parent directory.
    pub fn from_default_location() -> Result<Self, RepositoryError> {
        let search_paths = [
            PathBuf::from(CONFIG_FILE_NAME),
            PathBuf::from("backend").join(CONFIG_FILE_NAME),
            PathBuf::from("..").join(CONFIG_FILE_NAME),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Err(RepositoryError::configuration(format!(
            "No {} found in standard locations",
            CONFIG_FILE_NAME
        )))
    }

    /// Apply `REPOSITORY_TYPE`, `BOOKING_REMOTE_URL` and `BOOKING_REMOTE_KEY`.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(repo_type) = std::env::var("REPOSITORY_TYPE") {
            self.repository.repo_type = repo_type;
        }
        if let (Ok(base_url), Ok(api_key)) = (
            std::env::var("BOOKING_REMOTE_URL"),
            std::env::var("BOOKING_REMOTE_KEY"),
        ) {
            let timeout_secs = self.remote.as_ref().map(|r| r.timeout_secs);
            let mut remote = RemoteConfig::new(base_url, api_key);
            if let Some(secs) = timeout_secs {
                remote.timeout_secs = secs;
            }
            self.remote = Some(remote);
        }
        self
    }

    /// Get the repository type from configuration.
    pub fn repository_type(&self) -> Result<RepositoryType, String> {
        RepositoryType::from_str(&self.repository.repo_type)
    }

    /// The validated `[remote]` section when the remote type is selected.
    pub fn to_remote_config(&self) -> Result<Option<RemoteConfig>, RepositoryError> {
        let repo_type = self.repository_type().map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })?;

        if repo_type != RepositoryType::Remote {
            return Ok(None);
        }

        let remote = self.remote.clone().ok_or_else(|| {
            RepositoryError::configuration("Remote repository requires a [remote] section")
        })?;
        remote.validate().map_err(RepositoryError::configuration)?;
        Ok(Some(remote))
    }

    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.session.ttl_minutes.clamp(1, MAX_SESSION_TTL_MINUTES))
    }
}
