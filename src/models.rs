use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One trackable day: its display label and completion flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarCell {
    pub date: String,
    pub is_checked: bool,
}

impl CalendarCell {
    pub fn unchecked(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            is_checked: false,
        }
    }
}

/// Outcome of flipping one slot of a [`YearGrid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    /// The cell flipped; carries the new flag.
    Flipped(bool),
    /// The slot is padding and was left alone.
    Padding,
    /// The index is past the end of the grid.
    OutOfRange,
}

/// The slot sequence for one year. `None` entries are padding.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct YearGrid(Vec<Option<CalendarCell>>);

impl YearGrid {
    pub fn from_slots(slots: Vec<Option<CalendarCell>>) -> Self {
        Self(slots)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CalendarCell> {
        self.0.get(index).and_then(Option::as_ref)
    }

    pub fn slots(&self) -> &[Option<CalendarCell>] {
        &self.0
    }

    pub fn active_count(&self) -> usize {
        self.0.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn toggle(&mut self, index: usize) -> Toggle {
        match self.0.get_mut(index) {
            None => Toggle::OutOfRange,
            Some(None) => Toggle::Padding,
            Some(Some(cell)) => {
                cell.is_checked = !cell.is_checked;
                Toggle::Flipped(cell.is_checked)
            }
        }
    }
}

/// Body of a document in the `years` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearDocument {
    pub calendar_data: YearGrid,
}

/// A calendar year whose document id is a 4-digit decimal string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridYear {
    first_day: NaiveDate,
}

impl GridYear {
    pub const MIN: i32 = 1;
    pub const MAX: i32 = 9999;

    pub fn new(year: i32) -> Option<Self> {
        if !(Self::MIN..=Self::MAX).contains(&year) {
            return None;
        }
        NaiveDate::from_ymd_opt(year, 1, 1).map(|first_day| Self { first_day })
    }

    pub fn current() -> Option<Self> {
        Self::new(Local::now().year())
    }

    pub fn value(&self) -> i32 {
        self.first_day.year()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    pub fn is_leap(&self) -> bool {
        NaiveDate::from_ymd_opt(self.value(), 2, 29).is_some()
    }

    pub fn day_count(&self) -> usize {
        if self.is_leap() { 366 } else { 365 }
    }

    pub fn document_id(&self) -> String {
        format!("{:04}", self.value())
    }
}

impl fmt::Display for GridYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub index: usize,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleResponse {
    pub index: usize,
    pub cell: Option<CalendarCell>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridResponse {
    pub year: i32,
    pub starting_index: usize,
    pub cells: YearGrid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_uses_camel_case_flag() {
        let cell = CalendarCell::unchecked("Monday, Jan 1, 2024");
        let json = serde_json::to_value(&cell).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "date": "Monday, Jan 1, 2024", "isChecked": false })
        );
    }

    #[test]
    fn document_serializes_padding_as_null() {
        let doc = YearDocument {
            calendar_data: YearGrid::from_slots(vec![None, Some(CalendarCell::unchecked("x"))]),
        };
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "calendarData": [null, { "date": "x", "isChecked": false }] })
        );
    }

    #[test]
    fn toggle_flips_cells_and_skips_padding() {
        let mut grid = YearGrid::from_slots(vec![None, Some(CalendarCell::unchecked("x"))]);
        assert_eq!(grid.toggle(0), Toggle::Padding);
        assert_eq!(grid.toggle(1), Toggle::Flipped(true));
        assert_eq!(grid.toggle(1), Toggle::Flipped(false));
        assert_eq!(grid.toggle(2), Toggle::OutOfRange);
        assert_eq!(grid.get(1), Some(&CalendarCell::unchecked("x")));
    }

    #[test]
    fn grid_year_bounds_and_ids() {
        assert!(GridYear::new(0).is_none());
        assert!(GridYear::new(10_000).is_none());
        let year = GridYear::new(987).unwrap();
        assert_eq!(year.document_id(), "0987");
        assert_eq!(GridYear::new(2024).unwrap().day_count(), 366);
        assert_eq!(GridYear::new(2025).unwrap().day_count(), 365);
        assert!(!GridYear::new(1900).unwrap().is_leap());
    }
}
