//! In-memory local repository implementation.
//!
//! This module provides a local implementation of all repository traits
//! suitable for unit testing and local development. All data lives in memory,
//! giving fast, deterministic and isolated execution.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::db::repository::*;
use crate::models::{
    BookingId, BookingRecord, DateRangeRow, PackageId, TourPackage, UserId, UserProfile,
};

/// In-memory local repository.
///
/// Clones share the same underlying data.
///
/// # Example
/// ```
/// use rust_decimal::Decimal;
/// use tour_booking::db::repositories::LocalRepository;
/// use tour_booking::models::{PackageId, TourPackage};
///
/// let repo = LocalRepository::new();
/// repo.insert_package(TourPackage::new(
///     PackageId::new(1),
///     "Bromo Sunrise",
///     "East Java",
///     2,
///     Decimal::from(150),
/// ));
/// assert_eq!(repo.package_count(), 1);
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    packages: Vec<TourPackage>,
    date_rows: Vec<DateRangeRow>,
    users: HashMap<UserId, UserProfile>,
    favorites: HashMap<UserId, Vec<PackageId>>,
    bookings: Vec<BookingRecord>,

    next_booking_id: i64,

    // Connection health
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            packages: Vec::new(),
            date_rows: Vec::new(),
            users: HashMap::new(),
            favorites: HashMap::new(),
            bookings: Vec::new(),
            next_booking_id: 1,
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Add or replace a package (matched by id). New packages go to the end of
    /// the catalog.
    pub fn insert_package(&self, package: TourPackage) {
        let mut data = self.data.write();
        match data.packages.iter_mut().find(|p| p.id == package.id) {
            Some(existing) => *existing = package,
            None => data.packages.push(package),
        }
    }

    /// Append a raw date-range row.
    pub fn insert_date_range_row(&self, row: DateRangeRow) {
        self.data.write().date_rows.push(row);
    }

    /// Drop every date-range row of a package; returns how many were removed.
    pub fn clear_date_range_rows(&self, package_id: PackageId) -> usize {
        let mut data = self.data.write();
        let before = data.date_rows.len();
        data.date_rows.retain(|r| r.package_id != package_id);
        before - data.date_rows.len()
    }

    pub fn insert_user(&self, user: UserProfile) {
        self.data.write().users.insert(user.id, user);
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        let mut data = self.data.write();
        *data = LocalData {
            is_healthy: data.is_healthy,
            ..Default::default()
        };
    }

    pub fn package_count(&self) -> usize {
        self.data.read().packages.len()
    }

    pub fn booking_count(&self) -> usize {
        self.data.read().bookings.len()
    }

    /// Helper to check health and return error if unhealthy.
    fn check_health(&self, operation: &str) -> RepositoryResult<()> {
        if !self.data.read().is_healthy {
            return Err(RepositoryError::connection_with_context(
                "Data source is not reachable",
                ErrorContext::new(operation),
            ));
        }
        Ok(())
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PackageRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn list_packages(&self) -> RepositoryResult<Vec<TourPackage>> {
        self.check_health("list_packages")?;
        Ok(self.data.read().packages.clone())
    }

    async fn get_package(&self, package_id: PackageId) -> RepositoryResult<TourPackage> {
        self.check_health("get_package")?;
        self.data
            .read()
            .packages
            .iter()
            .find(|p| p.id == package_id)
            .cloned()
            .ok_or_else(|| {
                RepositoryError::not_found_with_context(
                    format!("Package {} not found", package_id),
                    ErrorContext::new("get_package")
                        .with_entity("package")
                        .with_entity_id(package_id),
                )
            })
    }
}

#[async_trait]
impl AvailabilityRepository for LocalRepository {
    async fn fetch_date_range_rows(
        &self,
        package_id: PackageId,
    ) -> RepositoryResult<Vec<DateRangeRow>> {
        self.check_health("fetch_date_range_rows")?;
        Ok(self
            .data
            .read()
            .date_rows
            .iter()
            .filter(|r| r.package_id == package_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl AccountRepository for LocalRepository {
    async fn find_user_by_email(&self, email: &str) -> RepositoryResult<Option<UserProfile>> {
        self.check_health("find_user_by_email")?;
        let wanted = email.trim();
        Ok(self
            .data
            .read()
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(wanted))
            .cloned())
    }
}

#[async_trait]
impl FavoriteRepository for LocalRepository {
    async fn list_favorites(&self, user_id: UserId) -> RepositoryResult<Vec<PackageId>> {
        self.check_health("list_favorites")?;
        Ok(self
            .data
            .read()
            .favorites
            .get(&user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn add_favorite(&self, user_id: UserId, package_id: PackageId) -> RepositoryResult<bool> {
        self.check_health("add_favorite")?;
        let mut data = self.data.write();
        let favorites = data.favorites.entry(user_id).or_default();
        if favorites.contains(&package_id) {
            return Ok(false);
        }
        favorites.push(package_id);
        Ok(true)
    }

    async fn remove_favorite(
        &self,
        user_id: UserId,
        package_id: PackageId,
    ) -> RepositoryResult<bool> {
        self.check_health("remove_favorite")?;
        let mut data = self.data.write();
        let Some(favorites) = data.favorites.get_mut(&user_id) else {
            return Ok(false);
        };
        let before = favorites.len();
        favorites.retain(|id| *id != package_id);
        Ok(favorites.len() != before)
    }
}

#[async_trait]
impl BookingRepository for LocalRepository {
    async fn store_booking(&self, booking: &BookingRecord) -> RepositoryResult<BookingRecord> {
        self.check_health("store_booking")?;
        let mut data = self.data.write();
        if data.bookings.iter().any(|b| b.reference == booking.reference) {
            return Err(RepositoryError::Conflict {
                message: format!("Booking {} already exists", booking.reference),
                context: ErrorContext::new("store_booking")
                    .with_entity("booking")
                    .with_entity_id(&booking.reference),
            });
        }

        let mut stored = booking.clone();
        stored.id = Some(BookingId::new(data.next_booking_id));
        data.next_booking_id += 1;
        data.bookings.push(stored.clone());
        Ok(stored)
    }

    async fn find_booking_by_reference(
        &self,
        reference: &str,
    ) -> RepositoryResult<Option<BookingRecord>> {
        self.check_health("find_booking_by_reference")?;
        Ok(self
            .data
            .read()
            .bookings
            .iter()
            .find(|b| b.reference == reference)
            .cloned())
    }

    async fn list_bookings(&self, user_id: UserId) -> RepositoryResult<Vec<BookingRecord>> {
        self.check_health("list_bookings")?;
        let mut bookings: Vec<BookingRecord> = self
            .data
            .read()
            .bookings
            .iter()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(bookings)
    }
}
