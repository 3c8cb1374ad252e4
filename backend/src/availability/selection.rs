//! Date-range selection state machine and calendar-day classification.

use chrono::{Datelike, NaiveDate};
use log::debug;
use serde::{Deserialize, Serialize};

use super::AvailabilitySet;
use crate::models::DateRange;

/// Fixed short month names used in selection labels.
pub const SHORT_MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// At most one selected range at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "range", rename_all = "snake_case")]
pub enum Selection {
    #[default]
    NoSelection,
    RangeSelected(DateRange),
}

impl Selection {
    pub fn range(&self) -> Option<&DateRange> {
        match self {
            Selection::NoSelection => None,
            Selection::RangeSelected(range) => Some(range),
        }
    }

    pub fn is_selected(&self) -> bool {
        matches!(self, Selection::RangeSelected(_))
    }

    /// Human-readable label, e.g. `"9 - 14 Sep, 2025"`.
    pub fn label(&self) -> Option<String> {
        self.range().map(format_range_label)
    }
}

/// Display state of one calendar day. Exactly one applies to any day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DayState {
    Unavailable,
    AvailableUnselected,
    RangeStart,
    RangeEnd,
    InRange,
    RangeEndpointAndSelected,
}

/// Classify `day` against the availability set and the current selection.
///
/// Selection takes precedence over availability, so a range chosen directly
/// still renders even if it is not part of `set`.
pub fn classify_day(day: NaiveDate, set: &AvailabilitySet, selection: &Selection) -> DayState {
    if let Some(selected) = selection.range() {
        if day == selected.start || day == selected.end {
            return DayState::RangeEndpointAndSelected;
        }
        if selected.contains(day) {
            return DayState::InRange;
        }
    }

    match set.range_containing(day) {
        None => DayState::Unavailable,
        Some(range) if day == range.start => DayState::RangeStart,
        Some(range) if day == range.end => DayState::RangeEnd,
        Some(_) => DayState::AvailableUnselected,
    }
}

/// Format a range with the fixed month table.
///
/// Same month: `9 - 14 Sep, 2025`; same year: `28 Sep - 3 Oct, 2025`;
/// across years: `28 Dec, 2025 - 3 Jan, 2026`; single day: `9 Sep, 2025`.
pub fn format_range_label(range: &DateRange) -> String {
    let (start, end) = (range.start, range.end);
    let start_month = SHORT_MONTH_NAMES[start.month0() as usize];
    let end_month = SHORT_MONTH_NAMES[end.month0() as usize];

    if start == end {
        format!("{} {}, {}", start.day(), start_month, start.year())
    } else if start.year() != end.year() {
        format!(
            "{} {}, {} - {} {}, {}",
            start.day(),
            start_month,
            start.year(),
            end.day(),
            end_month,
            end.year()
        )
    } else if start.month() != end.month() {
        format!(
            "{} {} - {} {}, {}",
            start.day(),
            start_month,
            end.day(),
            end_month,
            end.year()
        )
    } else {
        format!("{} - {} {}, {}", start.day(), end.day(), end_month, end.year())
    }
}

/// Booking-screen state: the package's availability plus the current selection.
///
/// Selecting is last-write-wins; replacing the availability always clears the
/// selection so a stale range never survives a refetch.
#[derive(Debug, Clone, Default)]
pub struct DateSelector {
    availability: AvailabilitySet,
    selection: Selection,
}

impl DateSelector {
    pub fn new(availability: AvailabilitySet) -> Self {
        Self {
            availability,
            selection: Selection::NoSelection,
        }
    }

    pub fn availability(&self) -> &AvailabilitySet {
        &self.availability
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Select the whole range covering `date`. Days outside every range are ignored.
    ///
    /// Returns whether the selection changed state.
    pub fn select_day(&mut self, date: NaiveDate) -> bool {
        match self.availability.range_containing(date) {
            Some(range) => {
                let next = Selection::RangeSelected(*range);
                let changed = next != self.selection;
                self.selection = next;
                changed
            }
            None => {
                debug!("Ignoring selection of unavailable day {}", date);
                false
            }
        }
    }

    /// Select a range picked from a pre-rendered list, without re-validation.
    pub fn select_range_directly(&mut self, range: DateRange) {
        self.selection = Selection::RangeSelected(range);
    }

    pub fn reset(&mut self) {
        self.selection = Selection::NoSelection;
    }

    /// Swap in freshly fetched availability and drop the selection.
    pub fn replace_availability(&mut self, availability: AvailabilitySet) {
        self.availability = availability;
        self.reset();
    }

    pub fn label(&self) -> Option<String> {
        self.selection.label()
    }

    pub fn classify_day(&self, day: NaiveDate) -> DayState {
        classify_day(day, &self.availability, &self.selection)
    }
}
