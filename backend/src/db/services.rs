//! High-level operations over any [`FullRepository`].
//!
//! Handlers and clients call these rather than the repository traits directly:
//! they add session checks, availability normalisation and booking
//! deduplication on top of raw data access.

use log::{debug, info, warn};

use super::repository::{ErrorContext, FullRepository, RepositoryError, RepositoryResult};
use crate::availability::{ingest_rows, AvailabilitySet};
use crate::models::{BookingRecord, PackageId, TourPackage};
use crate::services::catalog::only_favorites;
use crate::session::{Session, SessionError, SessionRegistry};

/// Failure of a service call that acts on behalf of a user.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Outcome of loading a package's dates.
///
/// A package without any usable range is a displayable state, not an error;
/// source failures come back as `Err` instead.
#[derive(Debug, Clone, PartialEq)]
pub enum AvailabilityLoad {
    Available(AvailabilitySet),
    NoDates,
}

impl AvailabilityLoad {
    /// The loaded set; empty for [`AvailabilityLoad::NoDates`].
    pub fn into_set(self) -> AvailabilitySet {
        match self {
            AvailabilityLoad::Available(set) => set,
            AvailabilityLoad::NoDates => AvailabilitySet::empty(),
        }
    }

    pub fn has_dates(&self) -> bool {
        matches!(self, AvailabilityLoad::Available(_))
    }
}

pub async fn health_check<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check().await
}

pub async fn list_packages<R: FullRepository + ?Sized>(
    repo: &R,
) -> RepositoryResult<Vec<TourPackage>> {
    repo.list_packages().await
}

pub async fn get_package<R: FullRepository + ?Sized>(
    repo: &R,
    package_id: PackageId,
) -> RepositoryResult<TourPackage> {
    repo.get_package(package_id).await
}

/// Fetch and normalise every date-range row of a package.
///
/// Malformed rows are skipped with a warning; the remaining rows still count.
pub async fn load_availability<R: FullRepository + ?Sized>(
    repo: &R,
    package_id: PackageId,
) -> RepositoryResult<AvailabilityLoad> {
    let rows = repo
        .fetch_date_range_rows(package_id)
        .await
        .map_err(|e| e.with_entity("package", package_id))?;

    let report = ingest_rows(&rows);
    if report.rows_skipped > 0 || report.candidates_skipped > 0 {
        warn!(
            "Package {}: {} of {} rows and {} candidates were unusable",
            package_id,
            report.rows_skipped,
            rows.len(),
            report.candidates_skipped
        );
    }

    if report.set.is_empty() {
        debug!("Package {} has no available dates", package_id);
        Ok(AvailabilityLoad::NoDates)
    } else {
        Ok(AvailabilityLoad::Available(report.set))
    }
}

/// Look the user up by email and register a new session.
pub async fn sign_in<R: FullRepository + ?Sized>(
    repo: &R,
    registry: &SessionRegistry,
    email: &str,
) -> ServiceResult<Session> {
    let user = repo
        .find_user_by_email(email)
        .await?
        .ok_or_else(|| SessionError::UnknownUser(email.trim().to_string()))?;
    Ok(registry.sign_in(user))
}

pub async fn list_favorites<R: FullRepository + ?Sized>(
    repo: &R,
    session: &Session,
) -> ServiceResult<Vec<PackageId>> {
    session.validate()?;
    Ok(repo.list_favorites(session.user_id()).await?)
}

/// Favorite packages in catalog order.
pub async fn favorite_packages<R: FullRepository + ?Sized>(
    repo: &R,
    session: &Session,
) -> ServiceResult<Vec<TourPackage>> {
    let favorites = list_favorites(repo, session).await?;
    if favorites.is_empty() {
        return Ok(Vec::new());
    }
    let packages = repo.list_packages().await?;
    Ok(only_favorites(&packages, &favorites))
}

/// Add a favorite. Adding one twice is not an error; returns whether it was new.
pub async fn add_favorite<R: FullRepository + ?Sized>(
    repo: &R,
    session: &Session,
    package_id: PackageId,
) -> ServiceResult<bool> {
    session.validate()?;
    repo.get_package(package_id).await?;
    Ok(repo.add_favorite(session.user_id(), package_id).await?)
}

/// Remove a favorite; returns whether one was removed.
pub async fn remove_favorite<R: FullRepository + ?Sized>(
    repo: &R,
    session: &Session,
    package_id: PackageId,
) -> ServiceResult<bool> {
    session.validate()?;
    Ok(repo.remove_favorite(session.user_id(), package_id).await?)
}

/// Flip a favorite, returning the new state.
pub async fn toggle_favorite<R: FullRepository + ?Sized>(
    repo: &R,
    session: &Session,
    package_id: PackageId,
) -> ServiceResult<bool> {
    let favorites = list_favorites(repo, session).await?;
    if favorites.contains(&package_id) {
        remove_favorite(repo, session, package_id).await?;
        Ok(false)
    } else {
        add_favorite(repo, session, package_id).await?;
        Ok(true)
    }
}

/// Persist a booking unless one with the same reference already exists, in
/// which case the existing record is returned.
///
/// A resubmission that changes the contact, payment method or instalment plan
/// of an already stored booking is a conflict.
pub async fn store_booking<R: FullRepository + ?Sized>(
    repo: &R,
    booking: &BookingRecord,
) -> RepositoryResult<BookingRecord> {
    if let Some(existing) = repo.find_booking_by_reference(&booking.reference).await? {
        info!("Booking {} already stored, reusing it", booking.reference);
        return ensure_same_choices(existing, booking);
    }

    match repo.store_booking(booking).await {
        Ok(stored) => {
            info!(
                "Stored booking {} for user {}",
                stored.reference, stored.user_id
            );
            Ok(stored)
        }
        // Lost a race with an identical submission.
        Err(RepositoryError::Conflict { .. }) => {
            let existing = repo
                .find_booking_by_reference(&booking.reference)
                .await?
                .ok_or_else(|| {
                    RepositoryError::conflict(format!(
                        "Booking {} conflicted but could not be read back",
                        booking.reference
                    ))
                })?;
            ensure_same_choices(existing, booking)
        }
        Err(e) => Err(e),
    }
}

fn ensure_same_choices(
    existing: BookingRecord,
    submitted: &BookingRecord,
) -> RepositoryResult<BookingRecord> {
    if existing.contact == submitted.contact
        && existing.payment_method == submitted.payment_method
        && existing.installments == submitted.installments
    {
        return Ok(existing);
    }
    warn!(
        "Booking {} resubmitted with different checkout choices",
        submitted.reference
    );
    Err(RepositoryError::Conflict {
        message: "A booking for these dates already exists with different checkout choices"
            .to_string(),
        context: ErrorContext::new("store_booking")
            .with_entity("booking")
            .with_entity_id(&submitted.reference),
    })
}

/// The session user's bookings, newest first.
pub async fn list_bookings<R: FullRepository + ?Sized>(
    repo: &R,
    session: &Session,
) -> ServiceResult<Vec<BookingRecord>> {
    session.validate()?;
    Ok(repo.list_bookings(session.user_id()).await?)
}
