use chrono::NaiveDate;
use serde::Serialize;

use crate::models::DateRange;

/// Normalised date ranges for one package, in ingestion order.
///
/// Rebuilt on every fetch and never patched in place. Overlapping ranges are
/// kept as delivered; lookups resolve to the first match in set order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AvailabilitySet {
    ranges: Vec<DateRange>,
    all_fully_booked: bool,
}

impl AvailabilitySet {
    pub fn new(ranges: Vec<DateRange>) -> Self {
        let all_fully_booked = !ranges.is_empty() && ranges.iter().all(DateRange::is_sold_out);
        Self {
            ranges,
            all_fully_booked,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn ranges(&self) -> &[DateRange] {
        &self.ranges
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// True iff some range covers `date`.
    pub fn is_available(&self, date: NaiveDate) -> bool {
        self.range_containing(date).is_some()
    }

    /// First range in set order whose span covers `date`.
    pub fn range_containing(&self, date: NaiveDate) -> Option<&DateRange> {
        self.ranges.iter().find(|r| r.contains(date))
    }

    /// False for an empty set: missing inventory data is not the same as sold out.
    pub fn all_fully_booked(&self) -> bool {
        self.all_fully_booked
    }

    /// First range with exactly this span.
    pub fn find_span(&self, start: NaiveDate, end: NaiveDate) -> Option<&DateRange> {
        self.ranges
            .iter()
            .find(|r| r.start == start && r.end == end)
    }

    /// Ranges ordered nearest-first by start date. Ties keep ingestion order.
    pub fn sorted_nearest_first(&self) -> Vec<DateRange> {
        let mut sorted = self.ranges.clone();
        sorted.sort_by_key(|r| r.start);
        sorted
    }

    /// Ranges that have not finished before `today`, nearest-first.
    pub fn upcoming(&self, today: NaiveDate) -> Vec<DateRange> {
        let mut upcoming: Vec<DateRange> =
            self.ranges.iter().filter(|r| r.end >= today).copied().collect();
        upcoming.sort_by_key(|r| r.start);
        upcoming
    }
}

impl From<Vec<DateRange>> for AvailabilitySet {
    fn from(ranges: Vec<DateRange>) -> Self {
        Self::new(ranges)
    }
}
