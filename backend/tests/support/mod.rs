//! Shared fixtures for integration tests.
#![allow(dead_code)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::json;
use tour_booking::db::repositories::LocalRepository;
use tour_booking::models::{DateRangeRow, PackageId, TourPackage, UserId, UserProfile};
use std::collections::HashSet;
use std::sync::Mutex;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// This is panic-safe (restores variables on unwind) and also serializes access to
/// process-global env vars to avoid flaky tests when Rust runs tests in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().expect("ENV_LOCK poisoned");
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

pub const BROMO: PackageId = PackageId(1);
pub const KOMODO: PackageId = PackageId(2);
pub const TOBA: PackageId = PackageId(3);
pub const TRAVELLER: UserId = UserId(7);
pub const TRAVELLER_EMAIL: &str = "ayu@example.com";

/// Three packages:
/// - Bromo: one open range, one sold-out range (stored as JSON text), and a
///   malformed row
/// - Komodo: every range sold out
/// - Toba: no date rows at all
pub fn seeded_repository() -> LocalRepository {
    let repo = LocalRepository::new();

    let mut bromo = TourPackage::new(BROMO, "Bromo Sunrise", "East Java", 2, Decimal::from(150));
    bromo.category = Some("Adventure".into());
    bromo.rating = Some(4.7);
    bromo.inclusions = json!({"Hotel": true, "Jeep": "4x4 with driver", "Flights": false});
    repo.insert_package(bromo);

    let mut komodo = TourPackage::new(KOMODO, "Komodo Sailing", "Flores", 4, Decimal::from(420));
    komodo.rating = Some(4.9);
    komodo.inclusions = json!(["Boat cabin", {"name": "Meals", "description": "Full board"}]);
    repo.insert_package(komodo);

    let toba = TourPackage::new(TOBA, "Lake Toba Retreat", "North Sumatra", 3, Decimal::from(95));
    repo.insert_package(toba);

    repo.insert_date_range_row(DateRangeRow::new(
        BROMO,
        json!([{"start": "2025-09-09", "end": "2025-09-14", "remaining_slots": 3}]),
    ));
    repo.insert_date_range_row(DateRangeRow::new(BROMO, "not json"));
    repo.insert_date_range_row(DateRangeRow::new(
        BROMO,
        r#"[{"start":"2025-08-01","end":"2025-08-03","remaining_slots":0}]"#,
    ));

    repo.insert_date_range_row(DateRangeRow::new(
        KOMODO,
        json!([
            {"start": "2025-10-01", "end": "2025-10-04", "remaining_slots": 0},
            {"start": "2025-11-01", "end": "2025-11-04"}
        ]),
    ));

    repo.insert_user(UserProfile::new(TRAVELLER, TRAVELLER_EMAIL).with_display_name("Ayu"));
    repo
}
