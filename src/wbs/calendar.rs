//! Calendar grid bounds and column grouping.

use chrono::{Datelike, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{Result, WbsError};

/// The span of months shown on the planning grid.
///
/// Clicks can only land on days inside this range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarRange {
    pub year: i32,
    pub start_month: u32,
    pub end_month: u32,
}

impl Default for CalendarRange {
    /// January through March of the current year.
    fn default() -> Self {
        Self {
            year: Utc::now().year(),
            start_month: 1,
            end_month: 3,
        }
    }
}

/// One day column of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub month: u32,
    pub day: u32,
    pub weekday: Weekday,
}

impl CalendarDay {
    fn new(date: NaiveDate) -> Self {
        Self {
            date,
            month: date.month(),
            day: date.day(),
            weekday: date.weekday(),
        }
    }

    pub fn is_weekend(&self) -> bool {
        matches!(self.weekday, Weekday::Sat | Weekday::Sun)
    }
}

/// Days of the grid belonging to one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarMonth {
    pub month: u32,
    pub days: Vec<CalendarDay>,
}

/// A week header group.
///
/// Weeks close on Saturday, at the end of a month, and at the end of the grid.
/// The week number only advances after a Saturday, so a week split by a month
/// boundary shows the same number on both sides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarWeek {
    pub number: u32,
    pub days: Vec<CalendarDay>,
}

impl CalendarRange {
    pub fn new(year: i32, start_month: u32, end_month: u32) -> Result<Self> {
        let range = Self {
            year,
            start_month,
            end_month,
        };
        range.bounds()?;
        Ok(range)
    }

    fn invalid(&self) -> WbsError {
        WbsError::InvalidCalendarRange {
            year: self.year,
            start_month: self.start_month,
            end_month: self.end_month,
        }
    }

    /// First and last day shown on the grid.
    pub fn bounds(&self) -> Result<(NaiveDate, NaiveDate)> {
        if self.start_month > self.end_month {
            return Err(self.invalid());
        }
        let first = NaiveDate::from_ymd_opt(self.year, self.start_month, 1);
        let last = last_day_of_month(self.year, self.end_month);
        match (first, last) {
            (Some(first), Some(last)) => Ok((first, last)),
            _ => Err(self.invalid()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.bounds().map(|_| ())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.bounds()
            .map(|(first, last)| first <= date && date <= last)
            .unwrap_or(false)
    }

    /// Every day of the grid, in order. Empty for an invalid range.
    pub fn days(&self) -> Vec<CalendarDay> {
        let Ok((first, last)) = self.bounds() else {
            return Vec::new();
        };
        first
            .iter_days()
            .take_while(|d| *d <= last)
            .map(CalendarDay::new)
            .collect()
    }

    pub fn months(&self) -> Vec<CalendarMonth> {
        let mut months: Vec<CalendarMonth> = Vec::new();
        for day in self.days() {
            match months.last_mut() {
                Some(current) if current.month == day.month => current.days.push(day),
                _ => months.push(CalendarMonth {
                    month: day.month,
                    days: vec![day],
                }),
            }
        }
        months
    }

    pub fn weeks(&self) -> Vec<CalendarWeek> {
        let days = self.days();
        let mut weeks = Vec::new();
        let mut current = Vec::new();
        let mut number = 1;

        for (i, day) in days.iter().enumerate() {
            current.push(*day);

            let saturday = day.weekday == Weekday::Sat;
            let month_end = day.date.succ_opt().map_or(true, |next| next.month() != day.month);
            if saturday || month_end || i == days.len() - 1 {
                weeks.push(CalendarWeek {
                    number,
                    days: std::mem::take(&mut current),
                });
                if saturday {
                    number += 1;
                }
            }
        }

        weeks
    }
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    next.and_then(|d| d.pred_opt())
}
