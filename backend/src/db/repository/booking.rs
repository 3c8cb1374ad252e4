use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{BookingRecord, UserId};

/// Confirmed checkouts.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Persist a booking and return it with its assigned id.
    ///
    /// # Returns
    /// * `Err(RepositoryError::Conflict)` - If the reference is already stored
    async fn store_booking(&self, booking: &BookingRecord) -> RepositoryResult<BookingRecord>;

    /// Look up a booking by its content reference.
    async fn find_booking_by_reference(
        &self,
        reference: &str,
    ) -> RepositoryResult<Option<BookingRecord>>;

    /// Bookings made by a user, newest first.
    async fn list_bookings(&self, user_id: UserId) -> RepositoryResult<Vec<BookingRecord>>;
}
