//! Repository trait definitions for data-source operations.
//!
//! Responsibilities are split across focused traits so implementations and test
//! doubles stay small:
//!
//! - [`error`]: Error types for repository operations
//! - [`package`]: Catalog reads and connection health
//! - [`availability`]: Raw date-range rows per package
//! - [`account`]: User profile lookups
//! - [`favorite`]: Per-user favorite packages
//! - [`booking`]: Confirmed checkouts
//!
//! # Convenience Trait Bound
//!
//! Functions that need every capability take a [`FullRepository`]:
//!
//! ```ignore
//! async fn my_service<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<()> {
//!     let packages = repo.list_packages().await?;
//!     let rows = repo.fetch_date_range_rows(packages[0].id).await?;
//!     Ok(())
//! }
//! ```

pub mod account;
pub mod availability;
pub mod booking;
pub mod error;
pub mod favorite;
pub mod package;

// Re-export error types
pub use error::{ErrorContext, RepositoryError, RepositoryResult};

// Re-export all traits
pub use account::AccountRepository;
pub use availability::AvailabilityRepository;
pub use booking::BookingRepository;
pub use favorite::FavoriteRepository;
pub use package::PackageRepository;

/// Composite trait bound for a complete repository implementation.
pub trait FullRepository:
    PackageRepository
    + AvailabilityRepository
    + AccountRepository
    + FavoriteRepository
    + BookingRepository
{
}

// Blanket implementation: any type implementing all five traits is a FullRepository
impl<T> FullRepository for T where
    T: PackageRepository
        + AvailabilityRepository
        + AccountRepository
        + FavoriteRepository
        + BookingRepository
{
}
