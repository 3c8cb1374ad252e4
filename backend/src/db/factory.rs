//! Repository factory for dependency injection.
//!
//! Picks and builds a repository implementation from runtime configuration.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use super::config::RemoteConfig;
use super::repo_config::RepositoryConfig;
use super::repositories::LocalRepository;
#[cfg(feature = "remote-repo")]
use super::repositories::RemoteRepository;
use super::repository::{FullRepository, RepositoryError, RepositoryResult};

/// Repository type configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    /// In-memory local repository
    Local,
    /// Managed backend over REST
    Remote,
}

impl FromStr for RepositoryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" | "memory" => Ok(Self::Local),
            "remote" | "rest" => Ok(Self::Remote),
            _ => Err(format!("Unknown repository type: {}", s)),
        }
    }
}

impl RepositoryType {
    /// Get repository type from environment variable.
    ///
    /// Reads `REPOSITORY_TYPE`. Without it, defaults to Remote when
    /// `BOOKING_REMOTE_URL` is set, otherwise Local.
    pub fn from_env() -> Self {
        if let Ok(val) = std::env::var("REPOSITORY_TYPE") {
            return val.parse().unwrap_or(Self::Local);
        }

        if std::env::var("BOOKING_REMOTE_URL").is_ok() {
            Self::Remote
        } else {
            Self::Local
        }
    }
}

/// Repository factory for creating repository instances.
///
/// # Example
/// ```
/// use tour_booking::db::repository::PackageRepository;
/// use tour_booking::db::{RepositoryFactory, RepositoryType};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let repo = RepositoryFactory::create(RepositoryType::Local, None)
///     .await
///     .unwrap();
/// assert!(repo.health_check().await.unwrap());
/// # }
/// ```
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create a repository instance based on type.
    ///
    /// `remote_config` is required for [`RepositoryType::Remote`].
    pub async fn create(
        repo_type: RepositoryType,
        remote_config: Option<&RemoteConfig>,
    ) -> RepositoryResult<Arc<dyn FullRepository>> {
        match repo_type {
            RepositoryType::Local => Ok(Self::create_local()),
            RepositoryType::Remote => {
                let config = remote_config.ok_or_else(|| {
                    RepositoryError::configuration("Remote repository requires RemoteConfig")
                })?;
                Self::create_remote(config)
            }
        }
    }

    /// Create a remote repository.
    #[cfg(feature = "remote-repo")]
    pub fn create_remote(config: &RemoteConfig) -> RepositoryResult<Arc<dyn FullRepository>> {
        let repo = RemoteRepository::new(config.clone())?;
        Ok(Arc::new(repo))
    }

    #[cfg(not(feature = "remote-repo"))]
    pub fn create_remote(_config: &RemoteConfig) -> RepositoryResult<Arc<dyn FullRepository>> {
        Err(RepositoryError::configuration(
            "Remote repository feature not enabled",
        ))
    }

    /// Create an in-memory local repository.
    pub fn create_local() -> Arc<dyn FullRepository> {
        Arc::new(LocalRepository::new())
    }

    /// Create repository from environment configuration.
    pub async fn from_env() -> RepositoryResult<Arc<dyn FullRepository>> {
        match RepositoryType::from_env() {
            RepositoryType::Local => Ok(Self::create_local()),
            RepositoryType::Remote => {
                let config = RemoteConfig::from_env().map_err(RepositoryError::configuration)?;
                Self::create_remote(&config)
            }
        }
    }

    /// Create repository from a TOML configuration file.
    pub async fn from_config_file<P: AsRef<Path>>(
        config_path: P,
    ) -> RepositoryResult<Arc<dyn FullRepository>> {
        let config = RepositoryConfig::from_file(config_path)?;
        Self::from_repository_config(&config).await
    }

    /// Create repository from a parsed [`RepositoryConfig`].
    pub async fn from_repository_config(
        config: &RepositoryConfig,
    ) -> RepositoryResult<Arc<dyn FullRepository>> {
        Self::build(config)
    }

    /// Synchronous variant of [`Self::from_repository_config`]; no backend
    /// needs I/O to be constructed.
    pub fn build(config: &RepositoryConfig) -> RepositoryResult<Arc<dyn FullRepository>> {
        let repo_type = config.repository_type().map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })?;
        match repo_type {
            RepositoryType::Local => Ok(Self::create_local()),
            RepositoryType::Remote => {
                let remote = config.to_remote_config()?.ok_or_else(|| {
                    RepositoryError::configuration("Remote repository requires RemoteConfig")
                })?;
                Self::create_remote(&remote)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_type_from_str() {
        assert_eq!(RepositoryType::from_str("local").unwrap(), RepositoryType::Local);
        assert_eq!(RepositoryType::from_str(" Remote ").unwrap(), RepositoryType::Remote);
        assert_eq!(RepositoryType::from_str("REST").unwrap(), RepositoryType::Remote);
        assert!(RepositoryType::from_str("postgres").is_err());
    }

    #[tokio::test]
    async fn test_create_local_repository() {
        let repo = RepositoryFactory::create_local();
        assert!(repo.health_check().await.unwrap());
    }

    #[tokio::test]
    async fn test_remote_requires_config() {
        let err = RepositoryFactory::create(RepositoryType::Remote, None)
            .await
            .err()
            .unwrap();
        assert!(matches!(err, RepositoryError::ConfigurationError { .. }));
    }
}
