//! Month grid construction for the booking calendar.
//!
//! Months are zero-based (`0` = January) and weeks start on Sunday.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::availability::{DateSelector, DayState};

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// One cell of the month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "date", rename_all = "snake_case")]
pub enum CalendarCell {
    Blank,
    Day(NaiveDate),
}

impl CalendarCell {
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            CalendarCell::Blank => None,
            CalendarCell::Day(date) => Some(*date),
        }
    }
}

/// A displayed month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CalendarMonth {
    year: i32,
    month: u32,
}

impl CalendarMonth {
    /// `month` is zero-based; anything above 11 (or a year chrono cannot
    /// represent) yields `None`.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month.checked_add(1)?, 1)?;
        Some(Self { year, month })
    }

    /// The month containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month0(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Zero-based month.
    pub fn month(&self) -> u32 {
        self.month
    }

    /// The month before; stays put at the earliest representable month.
    pub fn previous(&self) -> Self {
        let neighbour = if self.month == 0 {
            Self::new(self.year - 1, 11)
        } else {
            Self::new(self.year, self.month - 1)
        };
        neighbour.unwrap_or(*self)
    }

    /// The month after; stays put at the latest representable month.
    pub fn next(&self) -> Self {
        let neighbour = if self.month == 11 {
            Self::new(self.year + 1, 0)
        } else {
            Self::new(self.year, self.month + 1)
        };
        neighbour.unwrap_or(*self)
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month + 1, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn days_in_month(&self) -> u32 {
        let first = self.first_day();
        first
            .iter_days()
            .take_while(|d| d.month() == first.month())
            .count() as u32
    }

    /// Weekday index of the 1st (0 = Sunday), i.e. the number of leading blanks.
    pub fn leading_blanks(&self) -> usize {
        self.first_day().weekday().num_days_from_sunday() as usize
    }

    /// Leading blanks followed by every day of the month; no trailing padding.
    pub fn cells(&self) -> Vec<CalendarCell> {
        let first = self.first_day();
        let mut cells = vec![CalendarCell::Blank; self.leading_blanks()];
        cells.extend(
            first
                .iter_days()
                .take(self.days_in_month() as usize)
                .map(CalendarCell::Day),
        );
        cells
    }

    /// Cells in rows of seven; the last row may be shorter.
    pub fn weeks(&self) -> Vec<Vec<CalendarCell>> {
        self.cells().chunks(7).map(<[CalendarCell]>::to_vec).collect()
    }

    /// e.g. `"September 2025"`.
    pub fn title(&self) -> String {
        format!("{} {}", MONTH_NAMES[self.month as usize], self.year)
    }

    /// Week rows with every day classified against the selector.
    pub fn classified_weeks(&self, selector: &DateSelector) -> Vec<Vec<(CalendarCell, Option<DayState>)>> {
        self.weeks()
            .into_iter()
            .map(|week| {
                week.into_iter()
                    .map(|cell| (cell, cell.date().map(|d| selector.classify_day(d))))
                    .collect()
            })
            .collect()
    }
}
