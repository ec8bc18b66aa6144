//! Calendar layout: where a year's days land in the 53 x 7 grid.
//!
//! Slots are column-major: slot `i` sits in week column `i / 7` and weekday
//! row `i % 7` (Sunday first). January 1st lands on its weekday row in the
//! first column, so everything before it is padding.

use crate::models::{CalendarCell, GridYear, YearGrid};
use chrono::{Datelike, Days, NaiveDate};

pub const WEEKS: usize = 53;
pub const DAYS_PER_WEEK: usize = 7;
pub const GRID_SLOTS: usize = WEEKS * DAYS_PER_WEEK;

/// Width of the active window. A leap year's 366th day has no slot.
pub const ACTIVE_DAYS: usize = 365;

pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
pub const WEEKDAY_LABELS: [&str; DAYS_PER_WEEK] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Weekday of January 1st, Sunday = 0 through Saturday = 6.
pub fn starting_index(year: GridYear) -> usize {
    year.first_day().weekday().num_days_from_sunday() as usize
}

pub fn build_year_grid(year: GridYear, starting_index: usize) -> YearGrid {
    let first_day = year.first_day();
    let window = starting_index..starting_index.saturating_add(ACTIVE_DAYS);

    let slots = (0..GRID_SLOTS)
        .map(|index| {
            if !window.contains(&index) {
                return None;
            }
            let offset = (index - starting_index) as u64;
            first_day
                .checked_add_days(Days::new(offset))
                .map(|date| CalendarCell::unchecked(day_label(date)))
        })
        .collect();

    YearGrid::from_slots(slots)
}

pub fn fresh_grid(year: GridYear) -> YearGrid {
    build_year_grid(year, starting_index(year))
}

/// "Monday, Jan 1, 2024"
pub fn day_label(date: NaiveDate) -> String {
    date.format("%A, %b %-d, %Y").to_string()
}

/// Days of `year` that fall outside the active window.
pub fn truncated_days(year: GridYear) -> usize {
    year.day_count().saturating_sub(ACTIVE_DAYS)
}

/// Week column holding the first day of each month, for the header row.
pub fn month_columns(year: GridYear) -> [usize; 12] {
    let start = starting_index(year);
    let mut columns = [0; 12];
    for (month, column) in columns.iter_mut().enumerate() {
        let first = NaiveDate::from_ymd_opt(year.value(), month as u32 + 1, 1)
            .map(|date| date.ordinal0() as usize)
            .unwrap_or_default();
        *column = (start + first) / DAYS_PER_WEEK;
    }
    columns
}
