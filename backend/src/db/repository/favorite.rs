use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{PackageId, UserId};

/// Per-user favorite packages.
#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    /// Favorited package ids, oldest first.
    async fn list_favorites(&self, user_id: UserId) -> RepositoryResult<Vec<PackageId>>;

    /// Add a favorite. Returns `false` if it was already present.
    async fn add_favorite(&self, user_id: UserId, package_id: PackageId) -> RepositoryResult<bool>;

    /// Remove a favorite. Returns `false` if it was not present.
    async fn remove_favorite(&self, user_id: UserId, package_id: PackageId)
        -> RepositoryResult<bool>;
}
