//! Booking handoff: turning a date selection into a [`BookingIntent`].

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::availability::{AvailabilitySet, DateSelector};
use crate::models::{iso_date, BookingIntent, DateRange, PaymentMethod, TourPackage};

use super::checkout::CheckoutStep;

/// Errors raised while building an intent or walking the checkout flow.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingError {
    #[error("No date range selected")]
    NoSelection,
    #[error("Party size must be at least 1, got {0}")]
    InvalidPartySize(u32),
    #[error("Package does not offer {start} to {end}")]
    RangeNotOffered { start: NaiveDate, end: NaiveDate },
    #[error("Invalid {field}: {reason}")]
    InvalidContact { field: &'static str, reason: String },
    #[error("{0:?} does not allow instalments")]
    InstallmentsNotAllowed(PaymentMethod),
    #[error("Unsupported instalment term: {0} months")]
    UnsupportedTerm(u8),
    #[error("Checkout is at {actual:?}, expected {expected:?}")]
    OutOfOrder {
        expected: CheckoutStep,
        actual: CheckoutStep,
    },
}

pub type BookingResult<T> = Result<T, BookingError>;

/// Price per person times party size.
pub fn subtotal(package: &TourPackage, party_size: u32) -> Decimal {
    package.price_per_person * Decimal::from(party_size)
}

fn intent(package: &TourPackage, range: &DateRange, party_size: u32) -> BookingResult<BookingIntent> {
    if party_size == 0 {
        return Err(BookingError::InvalidPartySize(party_size));
    }
    Ok(BookingIntent {
        package_id: package.id,
        start_date: iso_date(range.start),
        end_date: iso_date(range.end),
        party_size,
        subtotal: subtotal(package, party_size),
    })
}

/// Package the selector's current range and `party_size` for checkout.
///
/// Slot counts are not re-checked here; the selected range is taken as is.
pub fn build_intent(
    package: &TourPackage,
    selector: &DateSelector,
    party_size: u32,
) -> BookingResult<BookingIntent> {
    let range = selector
        .selection()
        .range()
        .ok_or(BookingError::NoSelection)?;
    intent(package, range, party_size)
}

/// Build an intent for an explicit span, which must be one of the offered ranges.
pub fn intent_for_range(
    package: &TourPackage,
    availability: &AvailabilitySet,
    start: NaiveDate,
    end: NaiveDate,
    party_size: u32,
) -> BookingResult<BookingIntent> {
    let range = availability
        .find_span(start, end)
        .ok_or(BookingError::RangeNotOffered { start, end })?;
    intent(package, range, party_size)
}
