//! Data access for packages, availability, accounts, favorites and bookings.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Application Layer (REST API, clients)                  │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services.rs)                            │
//! │  - Availability normalisation                           │
//! │  - Session checks, booking deduplication                │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Traits (repository/) - Abstract Interface   │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────┴──────────────┐
//!     │                              │
//! ┌───▼──────────────┐   ┌───────────▼────────────┐
//! │ LocalRepository  │   │ RemoteRepository       │
//! │ (in-memory)      │   │ (REST, `remote-repo`)  │
//! └──────────────────┘   └────────────────────────┘
//! ```
//!
//! Prefer the [`services`] functions over calling repository traits directly.

#[cfg(not(any(feature = "remote-repo", feature = "local-repo")))]
compile_error!("Enable at least one repository backend feature.");

pub mod checksum;
pub mod config;
pub mod factory;
pub mod repo_config;
pub mod repositories;
pub mod repository;
pub mod services;


pub use services::{
    add_favorite, favorite_packages, get_package, health_check, list_bookings, list_favorites,
    list_packages, load_availability, remove_favorite, sign_in, store_booking, toggle_favorite,
    AvailabilityLoad, ServiceError, ServiceResult,
};

pub use checksum::{booking_reference, calculate_checksum};
pub use config::RemoteConfig;
pub use factory::{RepositoryFactory, RepositoryType};
pub use repo_config::RepositoryConfig;
pub use repositories::LocalRepository;
#[cfg(feature = "remote-repo")]
pub use repositories::RemoteRepository;
pub use repository::{
    AccountRepository, AvailabilityRepository, BookingRepository, ErrorContext,
    FavoriteRepository, FullRepository, PackageRepository, RepositoryError, RepositoryResult,
};

use anyhow::{Context, Result};
use std::sync::{Arc, OnceLock};

/// Global repository instance initialized once per process.
static REPOSITORY: OnceLock<Arc<dyn FullRepository>> = OnceLock::new();

/// Initialize the global repository from `config`. Later calls keep the first
/// repository.
pub fn init_repository(config: &RepositoryConfig) -> Result<&'static Arc<dyn FullRepository>> {
    if let Some(repo) = REPOSITORY.get() {
        return Ok(repo);
    }

    let repo = RepositoryFactory::build(config)
        .map_err(|e| anyhow::Error::msg(e.to_string()))
        .context("Failed to initialize repository")?;
    Ok(REPOSITORY.get_or_init(|| repo))
}

/// Get the global repository, initializing it from `booking.toml` (or the
/// environment when no file is found) on first use.
pub fn get_repository() -> Result<&'static Arc<dyn FullRepository>> {
    if let Some(repo) = REPOSITORY.get() {
        return Ok(repo);
    }

    let config = RepositoryConfig::from_default_location()
        .unwrap_or_default()
        .with_env_overrides();
    init_repository(&config)
}
