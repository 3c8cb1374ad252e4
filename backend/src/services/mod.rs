//! Client-side business logic that needs no data access.
//!
//! - [`catalog`]: package filtering and sorting
//! - [`booking`]: booking intents built from a date selection
//! - [`checkout`]: the contact → payment → instalments → review flow
//!
//! Operations that read or write the data source live in [`crate::db::services`].

pub mod booking;
pub mod catalog;
pub mod checkout;

pub use booking::{build_intent, intent_for_range, subtotal, BookingError, BookingResult};
pub use catalog::{destinations, only_favorites, PackageQuery, PackageSort};
pub use checkout::{validate_contact, Checkout, CheckoutStep, CheckoutSummary};
