use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::UserProfile;

/// Profile lookups. Credential checks belong to the external auth provider.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Find a profile by email, compared case-insensitively.
    async fn find_user_by_email(&self, email: &str) -> RepositoryResult<Option<UserProfile>>;
}
