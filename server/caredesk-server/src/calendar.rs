//! Month grid for the dashboard calendar
//!
//! Weeks start on Sunday. The grid is a flat run of cells, seven per week,
//! padded with empty cells before the 1st and after the last day.

use chrono::{Datelike, Local, NaiveDate};
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    #[error("Invalid month: {year}-{month}")]
    InvalidMonth { year: i32, month: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayCell {
    Empty,
    Day { day: u32, is_today: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub cells: Vec<DayCell>,
}

impl MonthGrid {
    pub fn weeks(&self) -> impl Iterator<Item = &[DayCell]> {
        self.cells.chunks(7)
    }

    /// Human-readable heading, e.g. "February 2024"
    pub fn title(&self) -> String {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map(|d| d.format("%B %Y").to_string())
            .unwrap_or_default()
    }

    /// (year, month) of the previous month
    pub fn previous(&self) -> (i32, u32) {
        if self.month == 1 {
            (self.year - 1, 12)
        } else {
            (self.year, self.month - 1)
        }
    }

    pub fn next(&self) -> (i32, u32) {
        if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        }
    }
}

/// Grid for `year`/`month`, marking the local current date
pub fn month_grid(year: i32, month: u32) -> Result<MonthGrid, CalendarError> {
    month_grid_on(year, month, Local::now().date_naive())
}

/// Grid for `year`/`month` with `today` supplied by the caller
pub fn month_grid_on(year: i32, month: u32, today: NaiveDate) -> Result<MonthGrid, CalendarError> {
    let invalid = CalendarError::InvalidMonth { year, month };
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or(invalid.clone())?;
    let days = days_in_month(first).ok_or(invalid)?;

    let leading = first.weekday().num_days_from_sunday() as usize;
    let total = (leading + days as usize).div_ceil(7) * 7;

    let mut cells = Vec::with_capacity(total);
    cells.resize(leading, DayCell::Empty);
    cells.extend((1..=days).map(|day| DayCell::Day {
        day,
        is_today: today.year() == year && today.month() == month && today.day() == day,
    }));
    cells.resize(total, DayCell::Empty);

    Ok(MonthGrid { year, month, cells })
}

fn days_in_month(first: NaiveDate) -> Option<u32> {
    let next_first = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)?
    };
    u32::try_from((next_first - first).num_days()).ok()
}

/// Optional `?year=&month=` on dashboard routes
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MonthQuery {
    pub year: Option<String>,
    pub month: Option<String>,
}

impl MonthQuery {
    /// Grid for the requested month; anything missing or invalid falls back
    /// to the month containing `today`
    pub fn grid_on(&self, today: NaiveDate) -> MonthGrid {
        let requested = self
            .year
            .as_deref()
            .and_then(|y| y.trim().parse::<i32>().ok())
            .zip(self.month.as_deref().and_then(|m| m.trim().parse::<u32>().ok()));

        if let Some((year, month)) = requested {
            if let Ok(grid) = month_grid_on(year, month, today) {
                return grid;
            }
        }

        current_month(today)
    }

    pub fn grid(&self) -> MonthGrid {
        self.grid_on(Local::now().date_naive())
    }
}

fn current_month(today: NaiveDate) -> MonthGrid {
    month_grid_on(today.year(), today.month(), today).unwrap_or_else(|_| MonthGrid {
        year: today.year(),
        month: today.month(),
        cells: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn day_count(grid: &MonthGrid) -> usize {
        grid.cells.iter().filter(|c| matches!(c, DayCell::Day { .. })).count()
    }

    fn today_count(grid: &MonthGrid) -> usize {
        grid.cells
            .iter()
            .filter(|c| matches!(c, DayCell::Day { is_today: true, .. }))
            .count()
    }

    #[test]
    fn test_leap_february_2024() {
        let grid = month_grid_on(2024, 2, date(2023, 7, 4)).unwrap();
        assert_eq!(day_count(&grid), 29);
        assert_eq!(today_count(&grid), 0);
        // 1 Feb 2024 is a Thursday
        assert_eq!(&grid.cells[..4], &[DayCell::Empty; 4]);
        assert_eq!(grid.cells[4], DayCell::Day { day: 1, is_today: false });
        assert_eq!(grid.cells.len(), 35);
        assert_eq!(grid.title(), "February 2024");
    }

    #[test]
    fn test_today_is_marked_once() {
        let grid = month_grid_on(2024, 2, date(2024, 2, 14)).unwrap();
        assert_eq!(today_count(&grid), 1);
        assert_eq!(grid.cells[4 + 13], DayCell::Day { day: 14, is_today: true });
    }

    #[test]
    fn test_invalid_month() {
        assert_eq!(
            month_grid_on(2024, 13, date(2024, 1, 1)),
            Err(CalendarError::InvalidMonth { year: 2024, month: 13 })
        );
        assert!(month_grid_on(2024, 0, date(2024, 1, 1)).is_err());
    }

    #[test]
    fn test_navigation_wraps_year() {
        let december = month_grid_on(2023, 12, date(2023, 1, 1)).unwrap();
        assert_eq!(december.next(), (2024, 1));
        let january = month_grid_on(2024, 1, date(2023, 1, 1)).unwrap();
        assert_eq!(january.previous(), (2023, 12));
    }

    #[test]
    fn test_query_fallback() {
        let today = date(2025, 3, 9);
        let bad = MonthQuery {
            year: Some("2025".into()),
            month: Some("14".into()),
        };
        let grid = bad.grid_on(today);
        assert_eq!((grid.year, grid.month), (2025, 3));
        assert_eq!(today_count(&grid), 1);

        let missing = MonthQuery::default().grid_on(today);
        assert_eq!(missing, grid);

        let chosen = MonthQuery {
            year: Some("2024".into()),
            month: Some("2".into()),
        }
        .grid_on(today);
        assert_eq!((chosen.year, chosen.month), (2024, 2));
    }

    proptest! {
        #[test]
        fn prop_grid_shape(year in 1900i32..2200, month in 1u32..=12) {
            let grid = month_grid_on(year, month, date(1899, 1, 1)).unwrap();
            let first = date(year, month, 1);
            let leading = first.weekday().num_days_from_sunday() as usize;

            prop_assert_eq!(grid.cells.len() % 7, 0);
            prop_assert!(grid.cells.iter().take(leading).all(|c| *c == DayCell::Empty));
            prop_assert_eq!(grid.cells[leading], DayCell::Day { day: 1, is_today: false });
            prop_assert_eq!(day_count(&grid), days_in_month(first).unwrap() as usize);
            prop_assert!(grid.cells.len() - day_count(&grid) - leading < 7);

            let days: Vec<u32> = grid.cells.iter().filter_map(|c| match c {
                DayCell::Day { day, .. } => Some(*day),
                DayCell::Empty => None,
            }).collect();
            prop_assert!(days.windows(2).all(|w| w[1] == w[0] + 1));
        }

        #[test]
        fn prop_today_marked_iff_in_month(year in 2000i32..2100, month in 1u32..=12, day in 1u32..=28) {
            let today = date(year, month, day);
            prop_assert_eq!(today_count(&month_grid_on(year, month, today).unwrap()), 1);
            let (ny, nm) = month_grid_on(year, month, today).unwrap().next();
            prop_assert_eq!(today_count(&month_grid_on(ny, nm, today).unwrap()), 0);
        }
    }
}
