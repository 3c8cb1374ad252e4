//! Normalisation of raw date-range rows into an [`AvailabilitySet`].
//!
//! Each row's payload is either JSON text or an already-decoded value holding an
//! array of candidate objects. Failures are isolated: a malformed row is skipped
//! and logged without discarding ranges already taken from other rows, and a bad
//! candidate is skipped without discarding its siblings.

use log::{debug, warn};
use serde_json::Value;

use super::AvailabilitySet;
use crate::models::{parse_calendar_date, DateRange, DateRangeRow, PackageId, RawDateRanges};

/// Why a row or candidate was left out of the normalised set.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("payload is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("payload is a JSON {0}, expected an array of ranges")]
    UnexpectedShape(&'static str),

    #[error("candidate is not a range object")]
    NotAnObject,

    #[error("candidate is missing a start or end date")]
    MissingBounds,

    #[error("candidate date '{0}' is not a YYYY-MM-DD calendar date")]
    InvalidDate(String),

    #[error("candidate starts after it ends ({start} > {end})")]
    Inverted { start: String, end: String },
}

/// Outcome of ingesting a batch of rows.
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    pub set: AvailabilitySet,
    pub rows_skipped: usize,
    pub candidates_skipped: usize,
}

/// Slot-count keys in lookup order; the first one present wins.
const SLOT_KEYS: [&str; 3] = ["remaining_slots", "remainingSlots", "remaining"];

/// Ingest rows in order, returning the normalised set together with skip counts.
pub fn ingest_rows<'a, I>(rows: I) -> IngestReport
where
    I: IntoIterator<Item = &'a DateRangeRow>,
{
    let mut ranges = Vec::new();
    let mut rows_skipped = 0;
    let mut candidates_skipped = 0;

    for row in rows {
        let candidates = match decode_payload(&row.date_ranges) {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!("Skipping date-range row for package {}: {}", row.package_id, e);
                rows_skipped += 1;
                continue;
            }
        };

        for candidate in candidates {
            match normalize_candidate(candidate) {
                Ok(range) => ranges.push(range),
                Err(e) => {
                    warn!(
                        "Skipping date-range candidate for package {}: {}",
                        row.package_id, e
                    );
                    candidates_skipped += 1;
                }
            }
        }
    }

    debug!(
        "Normalised {} date ranges ({} rows and {} candidates skipped)",
        ranges.len(),
        rows_skipped,
        candidates_skipped
    );

    IngestReport {
        set: AvailabilitySet::new(ranges),
        rows_skipped,
        candidates_skipped,
    }
}

/// Normalise a single package's payload, failing on the first malformed layer.
///
/// Used where a caller needs to know a payload is clean, e.g. before storing it.
pub fn normalize_payload(
    package_id: PackageId,
    payload: &RawDateRanges,
) -> Result<Vec<DateRange>, IngestError> {
    let candidates = decode_payload(payload)?;
    let ranges = candidates
        .into_iter()
        .map(normalize_candidate)
        .collect::<Result<Vec<_>, _>>()?;
    debug!("Payload for package {} holds {} ranges", package_id, ranges.len());
    Ok(ranges)
}

fn decode_payload(payload: &RawDateRanges) -> Result<Vec<Value>, IngestError> {
    let value = match payload {
        RawDateRanges::Encoded(text) => serde_json::from_str::<Value>(text)?,
        RawDateRanges::Structured(value) => value.clone(),
    };

    match value {
        Value::Array(items) => Ok(items),
        // A lone range object is accepted as a one-element list.
        Value::Object(_) => Ok(vec![value]),
        Value::Null => Err(IngestError::UnexpectedShape("null")),
        Value::Bool(_) => Err(IngestError::UnexpectedShape("boolean")),
        Value::Number(_) => Err(IngestError::UnexpectedShape("number")),
        Value::String(_) => Err(IngestError::UnexpectedShape("string")),
    }
}

fn normalize_candidate(candidate: Value) -> Result<DateRange, IngestError> {
    let Value::Object(fields) = candidate else {
        return Err(IngestError::NotAnObject);
    };

    let text = |key: &str| {
        fields
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
    };
    let (start_raw, end_raw) = match (non_empty(text("start")), non_empty(text("end"))) {
        (Some(start), Some(end)) => (start, end),
        _ => return Err(IngestError::MissingBounds),
    };

    let start =
        parse_calendar_date(&start_raw).ok_or_else(|| IngestError::InvalidDate(start_raw.clone()))?;
    let end =
        parse_calendar_date(&end_raw).ok_or_else(|| IngestError::InvalidDate(end_raw.clone()))?;
    let slots = SLOT_KEYS
        .iter()
        .find_map(|key| fields.get(*key))
        .map(slot_count)
        .unwrap_or(0);

    DateRange::new(start, end, slots).ok_or(IngestError::Inverted {
        start: start_raw,
        end: end_raw,
    })
}

fn non_empty(field: Option<String>) -> Option<String> {
    field.filter(|s| !s.trim().is_empty())
}

/// Lenient slot count: numbers or numeric strings, negatives clamp to zero.
fn slot_count(value: &Value) -> u32 {
    let count = match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.floor() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    count
        .map(|c| c.clamp(0, u32::MAX as i64) as u32)
        .unwrap_or(0)
}

impl AvailabilitySet {
    /// Build a set from raw rows, skipping malformed rows and candidates.
    pub fn from_rows<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = &'a DateRangeRow>,
    {
        ingest_rows(rows).set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn row(payload: impl Into<RawDateRanges>) -> DateRangeRow {
        DateRangeRow::new(PackageId::new(1), payload)
    }

    #[test]
    fn test_encoded_row() {
        let rows = vec![row(
            r#"[{"start":"2025-09-09","end":"2025-09-14","remaining_slots":3}]"#,
        )];
        let set = AvailabilitySet::from_rows(&rows);
        assert_eq!(set.len(), 1);
        assert_eq!(set.ranges()[0].start, d(2025, 9, 9));
        assert_eq!(set.ranges()[0].end, d(2025, 9, 14));
        assert_eq!(set.ranges()[0].remaining_slots, 3);
    }

    #[test]
    fn test_structured_row() {
        let rows = vec![row(json!([
            {"start": "2025-10-01", "end": "2025-10-03", "remainingSlots": 5},
            {"start": "2025-11-01", "end": "2025-11-03"}
        ]))];
        let set = AvailabilitySet::from_rows(&rows);
        assert_eq!(set.len(), 2);
        assert_eq!(set.ranges()[0].remaining_slots, 5);
        assert_eq!(set.ranges()[1].remaining_slots, 0);
    }

    #[test]
    fn test_malformed_row_is_isolated() {
        let rows = vec![
            row(r#"[{"start":"2025-09-01","end":"2025-09-02","remaining_slots":1}]"#),
            row("not json"),
            row(r#"[{"start":"2025-09-09","end":"2025-09-14","remaining_slots":3}]"#),
        ];
        let report = ingest_rows(&rows);
        assert_eq!(report.rows_skipped, 1);
        assert_eq!(report.set.len(), 2);
        assert_eq!(report.set.ranges()[0].start, d(2025, 9, 1));
        assert_eq!(report.set.ranges()[1].start, d(2025, 9, 9));
    }

    #[test]
    fn test_candidates_without_bounds_are_skipped() {
        let rows = vec![row(json!([
            {"start": "2025-09-01"},
            {"end": "2025-09-02"},
            {"start": "", "end": "2025-09-02"},
            {"start": "2025-09-05", "end": "2025-09-06", "remaining_slots": 2},
            "2025-09-07",
            {"start": 20250901, "end": "2025-09-02"}
        ]))];
        let report = ingest_rows(&rows);
        assert_eq!(report.set.len(), 1);
        assert_eq!(report.candidates_skipped, 5);
        assert_eq!(report.rows_skipped, 0);
    }

    #[test]
    fn test_inverted_and_unreadable_dates_are_skipped() {
        let rows = vec![row(json!([
            {"start": "2025-09-14", "end": "2025-09-09"},
            {"start": "next week", "end": "2025-09-09"},
            {"start": "2025-09-09T08:00:00Z", "end": "2025-09-14T18:00:00Z"}
        ]))];
        let report = ingest_rows(&rows);
        assert_eq!(report.candidates_skipped, 2);
        assert_eq!(report.set.ranges()[0].start, d(2025, 9, 9));
        assert_eq!(report.set.ranges()[0].end, d(2025, 9, 14));
    }

    #[test]
    fn test_repeated_slot_keys_keep_the_candidate() {
        let rows = vec![row(json!([
            {"start": "2025-09-09", "end": "2025-09-14", "remaining_slots": 3, "remainingSlots": 3},
            {"start": "2025-10-01", "end": "2025-10-03", "remaining": 9, "remainingSlots": 4}
        ]))];
        let report = ingest_rows(&rows);
        assert_eq!(report.candidates_skipped, 0);
        assert_eq!(report.set.len(), 2);
        assert!(report.set.is_available(d(2025, 9, 11)));
        assert_eq!(report.set.ranges()[0].remaining_slots, 3);
        assert_eq!(report.set.ranges()[1].remaining_slots, 4);
    }

    #[test]
    fn test_single_object_payload() {
        let rows = vec![row(r#"{"start":"2025-09-09","end":"2025-09-14","remaining":"4"}"#)];
        let set = AvailabilitySet::from_rows(&rows);
        assert_eq!(set.len(), 1);
        assert_eq!(set.ranges()[0].remaining_slots, 4);
    }

    #[test]
    fn test_non_array_payloads_are_malformed_rows() {
        let rows = vec![row("42"), row(json!(null)), row(r#""[]""#)];
        let report = ingest_rows(&rows);
        assert_eq!(report.rows_skipped, 3);
        assert!(report.set.is_empty());
    }

    #[test]
    fn test_slot_count_leniency() {
        assert_eq!(slot_count(&json!(3)), 3);
        assert_eq!(slot_count(&json!(-2)), 0);
        assert_eq!(slot_count(&json!(2.9)), 2);
        assert_eq!(slot_count(&json!(" 12 ")), 12);
        assert_eq!(slot_count(&json!("many")), 0);
        assert_eq!(slot_count(&json!(null)), 0);
    }

    #[test]
    fn test_normalize_payload_is_strict() {
        let ok = normalize_payload(
            PackageId::new(1),
            &RawDateRanges::from(r#"[{"start":"2025-09-09","end":"2025-09-14"}]"#),
        )
        .unwrap();
        assert_eq!(ok.len(), 1);

        let err = normalize_payload(
            PackageId::new(1),
            &RawDateRanges::from(json!([{"start": "2025-09-09"}])),
        )
        .unwrap_err();
        assert!(matches!(err, IngestError::MissingBounds));

        let err = normalize_payload(PackageId::new(1), &RawDateRanges::from("not json"))
            .unwrap_err();
        assert!(matches!(err, IngestError::InvalidJson(_)));
    }
}
