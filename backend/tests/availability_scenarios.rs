//! End-to-end availability scenarios: raw rows in, queries and selection out.

mod support;

use serde_json::json;
use support::d;
use tour_booking::availability::{ingest_rows, AvailabilitySet, DateSelector, DayState, Selection};
use tour_booking::calendar::CalendarMonth;
use tour_booking::models::{DateRange, DateRangeRow, PackageId};

fn rows(payloads: Vec<DateRangeRow>) -> AvailabilitySet {
    AvailabilitySet::from_rows(&payloads)
}

fn row(payload: serde_json::Value) -> DateRangeRow {
    DateRangeRow::new(PackageId::new(1), payload)
}

#[test]
fn open_range_is_available_and_not_fully_booked() {
    let set = rows(vec![row(
        json!([{"start": "2025-09-09", "end": "2025-09-14", "remaining_slots": 3}]),
    )]);
    assert!(set.is_available(d(2025, 9, 11)));
    assert!(!set.all_fully_booked());
}

#[test]
fn sold_out_range_is_fully_booked() {
    let set = rows(vec![row(
        json!([{"start": "2025-09-09", "end": "2025-09-14", "remaining_slots": 0}]),
    )]);
    assert!(set.all_fully_booked());
    assert!(set.is_available(d(2025, 9, 9)));
}

#[test]
fn empty_input_is_neither_available_nor_fully_booked() {
    let set = rows(vec![row(json!([]))]);
    assert!(!set.all_fully_booked());
    assert!(!set.is_available(d(2025, 9, 11)));

    let none = rows(vec![]);
    assert!(!none.all_fully_booked());
    assert!(none.is_empty());
}

#[test]
fn malformed_row_does_not_discard_valid_rows() {
    let payloads = vec![
        DateRangeRow::new(PackageId::new(1), "not json"),
        row(json!([{"start": "2025-09-09", "end": "2025-09-14", "remaining_slots": 3}])),
    ];
    let report = ingest_rows(&payloads);
    assert_eq!(report.rows_skipped, 1);
    assert_eq!(
        report.set.ranges(),
        &[DateRange::new(d(2025, 9, 9), d(2025, 9, 14), 3).unwrap()]
    );
}

#[test]
fn selecting_inner_day_selects_whole_range_and_reset_clears_it() {
    let set = rows(vec![row(
        json!([{"start": "2025-09-09", "end": "2025-09-14", "remaining_slots": 3}]),
    )]);
    let mut selector = DateSelector::new(set);

    assert!(selector.select_day(d(2025, 9, 11)));
    let selected = selector.selection().range().copied().unwrap();
    assert_eq!(selected.start, d(2025, 9, 9));
    assert_eq!(selected.end, d(2025, 9, 14));

    selector.reset();
    assert_eq!(*selector.selection(), Selection::NoSelection);
}

#[test]
fn tapping_unavailable_day_keeps_previous_selection() {
    let set = rows(vec![row(json!([
        {"start": "2025-09-09", "end": "2025-09-14", "remaining_slots": 3},
        {"start": "2025-09-20", "end": "2025-09-22", "remaining_slots": 1}
    ]))]);
    let mut selector = DateSelector::new(set);
    selector.select_day(d(2025, 9, 21));
    let before = *selector.selection();

    assert!(!selector.select_day(d(2025, 9, 16)));
    assert_eq!(*selector.selection(), before);
}

#[test]
fn mixed_payload_shapes_across_rows() {
    let payloads = vec![
        // Structured, camelCase slots
        row(json!([{"start": "2025-09-20", "end": "2025-09-22", "remainingSlots": 2}])),
        // Encoded single object, timestamps with time of day
        DateRangeRow::new(
            PackageId::new(1),
            r#"{"start":"2025-09-01T08:00:00Z","end":"2025-09-03T18:00:00Z","remaining_slots":"4"}"#,
        ),
        // Candidate without an end is skipped
        row(json!([{"start": "2025-10-01"}])),
    ];
    let report = ingest_rows(&payloads);
    assert_eq!(report.candidates_skipped, 1);
    assert_eq!(report.set.len(), 2);

    let nearest: Vec<_> = report.set.sorted_nearest_first().iter().map(|r| r.start).collect();
    assert_eq!(nearest, vec![d(2025, 9, 1), d(2025, 9, 20)]);
    assert_eq!(report.set.ranges()[1].remaining_slots, 4);
}

#[test]
fn calendar_renders_selection_states() {
    let set = rows(vec![row(json!([
        {"start": "2025-09-09", "end": "2025-09-14", "remaining_slots": 3},
        {"start": "2025-09-28", "end": "2025-10-03", "remaining_slots": 2}
    ]))]);
    let mut selector = DateSelector::new(set);
    selector.select_day(d(2025, 9, 12));

    let month = CalendarMonth::new(2025, 8).unwrap();
    assert_eq!(month.title(), "September 2025");
    let weeks = month.classified_weeks(&selector);

    // 1 September 2025 is a Monday.
    assert_eq!(weeks[0][0].1, None);
    let state_of = |day: u32| {
        weeks
            .iter()
            .flatten()
            .find(|(cell, _)| cell.date() == Some(d(2025, 9, day)))
            .and_then(|(_, state)| *state)
            .unwrap()
    };
    assert_eq!(state_of(9), DayState::RangeEndpointAndSelected);
    assert_eq!(state_of(10), DayState::InRange);
    assert_eq!(state_of(14), DayState::RangeEndpointAndSelected);
    assert_eq!(state_of(15), DayState::Unavailable);
    assert_eq!(state_of(28), DayState::RangeStart);
    assert_eq!(state_of(29), DayState::AvailableUnselected);
    assert_eq!(selector.label().as_deref(), Some("9 - 14 Sep, 2025"));

    selector.select_day(d(2025, 10, 1));
    assert_eq!(selector.label().as_deref(), Some("28 Sep - 3 Oct, 2025"));
}
