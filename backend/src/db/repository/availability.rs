use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{DateRangeRow, PackageId};

/// Raw date-range rows. Normalisation happens in [`crate::availability`], never here.
#[async_trait]
pub trait AvailabilityRepository: Send + Sync {
    /// Fetch every date-range row stored for a package, in storage order.
    ///
    /// An unknown package yields an empty list, not an error.
    async fn fetch_date_range_rows(&self, package_id: PackageId)
        -> RepositoryResult<Vec<DateRangeRow>>;
}
