use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{PackageId, TourPackage};

/// Catalog reads.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait PackageRepository: Send + Sync {
    /// Check if the data source is reachable.
    ///
    /// # Returns
    /// - `Ok(true)` if healthy
    /// - `Ok(false)` if unhealthy but no error occurred
    /// - `Err(RepositoryError)` if the check itself failed
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// List every published package in catalog order.
    async fn list_packages(&self) -> RepositoryResult<Vec<TourPackage>>;

    /// Retrieve one package.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If the package doesn't exist
    async fn get_package(&self, package_id: PackageId) -> RepositoryResult<TourPackage>;
}
