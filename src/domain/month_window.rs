use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum MonthParseError {
    #[error("invalid month: {0} (expected YYYY-MM)")]
    InvalidFormat(String),
    #[error("month out of range: {0}")]
    OutOfRange(String),
}

/// The calendar month a forecast is computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthWindow {
    pub first_day: NaiveDate,
    pub last_day: NaiveDate,
    pub day_count: u32,
}

impl MonthWindow {
    /// Returns `None` when `month` is outside `1..=12` or the year cannot be
    /// represented as a calendar date.
    pub fn for_month(year: i32, month: u32) -> Option<Self> {
        let first_day = NaiveDate::from_ymd_opt(year, month, 1)?;
        let last_day = if month == 12 {
            NaiveDate::from_ymd_opt(year, 12, 31)?
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)?.pred_opt()?
        };
        Some(Self {
            first_day,
            last_day,
            day_count: last_day.day(),
        })
    }

    /// Parses a `YYYY-MM` month such as `2024-02`.
    pub fn parse(value: &str) -> Result<Self, MonthParseError> {
        let (year, month) = value
            .trim()
            .rsplit_once('-')
            .ok_or_else(|| MonthParseError::InvalidFormat(value.to_string()))?;
        let year: i32 = year
            .parse()
            .map_err(|_| MonthParseError::InvalidFormat(value.to_string()))?;
        let month: u32 = month
            .parse()
            .map_err(|_| MonthParseError::InvalidFormat(value.to_string()))?;
        Self::for_month(year, month).ok_or_else(|| MonthParseError::OutOfRange(value.to_string()))
    }

    pub fn year(&self) -> i32 {
        self.first_day.year()
    }

    pub fn month(&self) -> u32 {
        self.first_day.month()
    }

    /// English month name and year, e.g. `February 2024`.
    pub fn label(&self) -> String {
        self.first_day.format("%B %Y").to_string()
    }

    /// Date of the 1-based `day` of this month.
    pub fn date_of_day(&self, day: u32) -> Option<NaiveDate> {
        if day == 0 || day > self.day_count {
            return None;
        }
        self.first_day.with_day(day)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.first_day && date <= self.last_day
    }
}

/// First and last day of the month `month_offset` months away from the
/// month containing `anchor`.
///
/// Offsets roll over years in both directions. Offsets that would leave the
/// representable date range saturate at the earliest or latest month.
pub fn derive_month_window(anchor: NaiveDate, month_offset: i64) -> MonthWindow {
    let anchor_total = month_index(anchor);
    let min_total = month_index(NaiveDate::MIN);
    let max_total = month_index(NaiveDate::MAX);

    let total = (anchor_total + month_offset as i128).clamp(min_total, max_total);
    let year = total.div_euclid(12) as i32;
    let month = total.rem_euclid(12) as u32 + 1;

    MonthWindow::for_month(year, month).expect("clamped month lies within the date range")
}

fn month_index(date: NaiveDate) -> i128 {
    date.year() as i128 * 12 + date.month0() as i128
}
