use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::PackageId;

/// A bookable span of calendar days for one package.
///
/// Both `start` and `end` are inclusive and carry no time-of-day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub remaining_slots: u32,
}

impl DateRange {
    /// Build a range, returning `None` when `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate, remaining_slots: u32) -> Option<Self> {
        (start <= end).then_some(Self {
            start,
            end,
            remaining_slots,
        })
    }

    /// Inclusive day-granularity membership.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Same span of days, regardless of slot count.
    pub fn same_span(&self, other: &DateRange) -> bool {
        self.start == other.start && self.end == other.end
    }

    pub fn is_sold_out(&self) -> bool {
        self.remaining_slots == 0
    }

    /// Number of calendar days covered, counting both endpoints.
    pub fn day_count(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// Date-range payload as the data source delivers it.
///
/// Rows written by older clients hold JSON text; newer rows hold the decoded
/// structure directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawDateRanges {
    Encoded(String),
    Structured(serde_json::Value),
}

impl From<&str> for RawDateRanges {
    fn from(s: &str) -> Self {
        RawDateRanges::Encoded(s.to_string())
    }
}

impl From<serde_json::Value> for RawDateRanges {
    fn from(v: serde_json::Value) -> Self {
        RawDateRanges::Structured(v)
    }
}

/// One row of the `package_dates` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateRangeRow {
    pub package_id: PackageId,
    pub date_ranges: RawDateRanges,
}

impl DateRangeRow {
    pub fn new(package_id: PackageId, date_ranges: impl Into<RawDateRanges>) -> Self {
        Self {
            package_id,
            date_ranges: date_ranges.into(),
        }
    }
}

/// Read a calendar date from the first ten characters (`YYYY-MM-DD`) of `raw`.
///
/// Any time-of-day suffix (`T10:00:00Z`, ` 08:30`) is ignored.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let day = trimmed.get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// ISO `YYYY-MM-DD` rendering used in booking payloads.
pub fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_new_rejects_inverted_range() {
        assert!(DateRange::new(d(2025, 9, 14), d(2025, 9, 9), 1).is_none());
        assert!(DateRange::new(d(2025, 9, 9), d(2025, 9, 9), 1).is_some());
    }

    #[test]
    fn test_contains_is_inclusive() {
        let range = DateRange::new(d(2025, 9, 9), d(2025, 9, 14), 3).unwrap();
        assert!(range.contains(d(2025, 9, 9)));
        assert!(range.contains(d(2025, 9, 14)));
        assert!(!range.contains(d(2025, 9, 8)));
        assert!(!range.contains(d(2025, 9, 15)));
        assert_eq!(range.day_count(), 6);
    }

    #[test]
    fn test_parse_calendar_date_ignores_time() {
        assert_eq!(parse_calendar_date("2025-09-09"), Some(d(2025, 9, 9)));
        assert_eq!(
            parse_calendar_date("2025-09-09T23:59:00+07:00"),
            Some(d(2025, 9, 9))
        );
        assert_eq!(parse_calendar_date(" 2025-09-09 08:00 "), Some(d(2025, 9, 9)));
        assert_eq!(parse_calendar_date("09/09/2025"), None);
        assert_eq!(parse_calendar_date(""), None);
        assert_eq!(parse_calendar_date("2025-02-30"), None);
    }

    #[test]
    fn test_raw_payload_untagged() {
        let row: DateRangeRow =
            serde_json::from_str(r#"{"package_id": 1, "date_ranges": "[]"}"#).unwrap();
        assert_eq!(row.date_ranges, RawDateRanges::Encoded("[]".to_string()));

        let row: DateRangeRow =
            serde_json::from_str(r#"{"package_id": 1, "date_ranges": []}"#).unwrap();
        assert_eq!(
            row.date_ranges,
            RawDateRanges::Structured(serde_json::json!([]))
        );
    }

    #[test]
    fn test_date_range_serializes_iso() {
        let range = DateRange::new(d(2025, 9, 9), d(2025, 9, 14), 3).unwrap();
        let json = serde_json::to_value(range).unwrap();
        assert_eq!(json["start"], "2025-09-09");
        assert_eq!(json["end"], "2025-09-14");
        assert_eq!(json["remaining_slots"], 3);
    }
}
