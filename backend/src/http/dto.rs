//! Data Transfer Objects for the HTTP API.
//!
//! Domain records that already derive `Serialize` are returned as-is; the
//! types here add request bodies, query strings and response envelopes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::availability::{format_range_label, AvailabilitySet, DayState};
use crate::calendar::{CalendarCell, CalendarMonth};
use crate::inclusions::InclusionEntry;
use crate::models::{
    iso_date, BookingIntent, BookingRecord, ContactDetails, DateRange, InstallmentOption,
    PackageId, PaymentMethod, TourPackage, UserProfile,
};
use crate::session::Session;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignInRequest {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserProfile,
}

impl From<Session> for SessionResponse {
    fn from(session: Session) -> Self {
        Self {
            access_token: session.access_token,
            expires_at: session.expires_at,
            user: session.user,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageListResponse {
    pub packages: Vec<TourPackage>,
    pub total: usize,
    /// Destinations across the whole catalog, for filter chips
    pub destinations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageDetailResponse {
    pub package: TourPackage,
    pub inclusions: Vec<InclusionEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityStatus {
    Available,
    FullyBooked,
    NoDates,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateRangeDto {
    pub start: String,
    pub end: String,
    pub remaining_slots: u32,
    pub label: String,
}

impl From<&DateRange> for DateRangeDto {
    fn from(range: &DateRange) -> Self {
        Self {
            start: iso_date(range.start),
            end: iso_date(range.end),
            remaining_slots: range.remaining_slots,
            label: format_range_label(range),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub package_id: PackageId,
    pub status: AvailabilityStatus,
    pub all_fully_booked: bool,
    /// Nearest first
    pub ranges: Vec<DateRangeDto>,
}

impl AvailabilityResponse {
    pub fn new(package_id: PackageId, set: &AvailabilitySet) -> Self {
        let status = if set.is_empty() {
            AvailabilityStatus::NoDates
        } else if set.all_fully_booked() {
            AvailabilityStatus::FullyBooked
        } else {
            AvailabilityStatus::Available
        };
        Self {
            package_id,
            status,
            all_fully_booked: set.all_fully_booked(),
            ranges: set.sorted_nearest_first().iter().map(Into::into).collect(),
        }
    }
}

/// `month` is zero-based. `start`/`end` preselect a range.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalendarQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarDayDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<DayState>,
}

impl From<(CalendarCell, Option<DayState>)> for CalendarDayDto {
    fn from((cell, state): (CalendarCell, Option<DayState>)) -> Self {
        Self {
            date: cell.date().map(iso_date),
            state,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthRef {
    pub year: i32,
    pub month: u32,
}

impl From<CalendarMonth> for MonthRef {
    fn from(month: CalendarMonth) -> Self {
        Self {
            year: month.year(),
            month: month.month(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarResponse {
    pub title: String,
    pub year: i32,
    pub month: u32,
    pub weekday_labels: Vec<String>,
    pub weeks: Vec<Vec<CalendarDayDto>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection_label: Option<String>,
    pub previous: MonthRef,
    pub next: MonthRef,
}

/// Either a tapped `date` (selects the covering range) or an explicit
/// `start_date`/`end_date` pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingIntentRequest {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    pub party_size: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingIntentResponse {
    pub intent: BookingIntent,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoritesResponse {
    pub package_ids: Vec<PackageId>,
    pub packages: Vec<TourPackage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteResponse {
    pub package_id: PackageId,
    pub favorite: bool,
    /// False when the request left the state unchanged
    pub changed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    pub package_id: PackageId,
    pub start_date: String,
    pub end_date: String,
    pub party_size: u32,
    pub contact: ContactDetails,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub installments: InstallmentOption,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingListResponse {
    pub bookings: Vec<BookingRecord>,
    pub total: usize,
}
