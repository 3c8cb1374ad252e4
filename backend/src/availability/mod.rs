//! Booking date availability.
//!
//! Raw per-package date-range rows are normalised into an [`AvailabilitySet`],
//! which answers the membership queries a booking calendar needs. A
//! [`DateSelector`] pairs a set with the user's current [`Selection`].
//!
//! ```
//! use chrono::NaiveDate;
//! use tour_booking::availability::{AvailabilitySet, DateSelector};
//! use tour_booking::models::{DateRangeRow, PackageId};
//!
//! let rows = vec![DateRangeRow::new(
//!     PackageId::new(1),
//!     r#"[{"start":"2025-09-09","end":"2025-09-14","remaining_slots":3}]"#,
//! )];
//! let mut selector = DateSelector::new(AvailabilitySet::from_rows(&rows));
//!
//! selector.select_day(NaiveDate::from_ymd_opt(2025, 9, 11).unwrap());
//! assert_eq!(selector.label().as_deref(), Some("9 - 14 Sep, 2025"));
//! ```

pub mod ingest;
pub mod selection;
pub mod set;

pub use ingest::{ingest_rows, normalize_payload, IngestError, IngestReport};
pub use selection::{classify_day, format_range_label, DateSelector, DayState, Selection};
pub use set::AvailabilitySet;
