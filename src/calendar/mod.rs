//! German statutory holiday calendars and working-day arithmetic.
//!
//! Holidays are either fixed dates, offsets from Easter Sunday (Gauss) or
//! computed (Buß- und Bettag). Which ones apply depends on the federal state
//! and, for a few of them, on the year.

pub mod easter;
pub mod holidays;
pub mod state;

use chrono::{Datelike, NaiveDate, Weekday};
use thiserror::Error;

pub use easter::easter_sunday;
pub use holidays::{holiday_name, holidays, is_holiday, Holiday, HolidayCalendar, HolidayKind};
pub use state::FederalState;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CalendarError {
    #[error("Year {0} is outside the supported range 1583-9999")]
    YearOutOfRange(i32),

    #[error("Invalid month: {0}")]
    InvalidMonth(u32),

    #[error("Unknown federal state: {0}")]
    UnknownState(String),

    #[error("Invalid date range: {from} is after {to}")]
    InvalidRange { from: NaiveDate, to: NaiveDate },
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

pub fn is_working_day(date: NaiveDate, state: FederalState) -> Result<bool, CalendarError> {
    Ok(!is_weekend(date) && !is_holiday(date, state)?)
}

pub fn days_in_month(year: i32, month: u32) -> Result<u32, CalendarError> {
    let first = first_of_month(year, month)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or(CalendarError::YearOutOfRange(year))?;
    Ok((next - first).num_days() as u32)
}

pub fn first_of_month(year: i32, month: u32) -> Result<NaiveDate, CalendarError> {
    if !(1..=12).contains(&month) {
        return Err(CalendarError::InvalidMonth(month));
    }
    NaiveDate::from_ymd_opt(year, month, 1).ok_or(CalendarError::YearOutOfRange(year))
}

pub fn last_of_month(year: i32, month: u32) -> Result<NaiveDate, CalendarError> {
    let days = days_in_month(year, month)?;
    NaiveDate::from_ymd_opt(year, month, days).ok_or(CalendarError::YearOutOfRange(year))
}

/// Number of working days (Mon-Fri, no holiday) in a month
pub fn working_days(year: i32, month: u32, state: FederalState) -> Result<u32, CalendarError> {
    working_days_in_range(first_of_month(year, month)?, last_of_month(year, month)?, state)
}

/// Number of working days in the inclusive range `from..=to`, which may span years
pub fn working_days_in_range(from: NaiveDate, to: NaiveDate, state: FederalState) -> Result<u32, CalendarError> {
    if from > to {
        return Err(CalendarError::InvalidRange { from, to });
    }

    let mut calendar = HolidayCalendar::new(from.year(), state)?;
    let mut count = 0;
    for date in from.iter_days().take_while(|d| *d <= to) {
        if date.year() != calendar.year {
            calendar = HolidayCalendar::new(date.year(), state)?;
        }
        if calendar.is_working_day(date) {
            count += 1;
        }
    }
    Ok(count)
}

/// Two-letter German weekday abbreviation as printed on the forms
pub fn weekday_abbrev(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "Mo",
        Weekday::Tue => "Di",
        Weekday::Wed => "Mi",
        Weekday::Thu => "Do",
        Weekday::Fri => "Fr",
        Weekday::Sat => "Sa",
        Weekday::Sun => "So",
    }
}

pub const MONTH_NAMES: [&str; 12] = [
    "Januar", "Februar", "März", "April", "Mai", "Juni", "Juli", "August", "September", "Oktober", "November",
    "Dezember",
];

pub fn month_name(month: u32) -> Result<&'static str, CalendarError> {
    MONTH_NAMES
        .get(month.wrapping_sub(1) as usize)
        .copied()
        .ok_or(CalendarError::InvalidMonth(month))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_lengths() {
        assert_eq!(days_in_month(2024, 2).unwrap(), 29);
        assert_eq!(days_in_month(2023, 2).unwrap(), 28);
        assert_eq!(days_in_month(2100, 2).unwrap(), 28);
        assert_eq!(days_in_month(2000, 2).unwrap(), 29);
        assert_eq!(days_in_month(2024, 12).unwrap(), 31);
        assert_eq!(days_in_month(2024, 4).unwrap(), 30);
        assert!(matches!(days_in_month(2024, 13), Err(CalendarError::InvalidMonth(13))));
    }

    #[test]
    fn working_days_per_month() {
        // May 2024 in Bavaria: 23 weekdays minus May 1, 9, 20, 30
        assert_eq!(working_days(2024, 5, FederalState::Bayern).unwrap(), 19);
        // Same month in Berlin has no Corpus Christi
        assert_eq!(working_days(2024, 5, FederalState::Berlin).unwrap(), 20);
        // October 2024 in Saxony: 23 weekdays minus Oct 3 and Oct 31
        assert_eq!(working_days(2024, 10, FederalState::Sachsen).unwrap(), 21);
    }

    #[test]
    fn working_days_for_a_whole_year() {
        let total = working_days_in_range(date(2024, 1, 1), date(2024, 12, 31), FederalState::Hamburg).unwrap();
        // 262 weekdays in 2024, 10 weekday holidays in Hamburg
        assert_eq!(total, 252);
    }

    #[test]
    fn working_days_across_year_boundary() {
        let n = working_days_in_range(date(2024, 12, 23), date(2025, 1, 3), FederalState::Hessen).unwrap();
        // 23, 24, 27, 30, 31 Dec and 2, 3 Jan
        assert_eq!(n, 7);
    }

    #[test]
    fn rejects_inverted_range() {
        let err = working_days_in_range(date(2024, 2, 1), date(2024, 1, 1), FederalState::Hessen).unwrap_err();
        assert!(matches!(err, CalendarError::InvalidRange { .. }));
    }

    #[test]
    fn weekday_helpers() {
        assert_eq!(weekday_abbrev(date(2024, 1, 1)), "Mo");
        assert_eq!(weekday_abbrev(date(2024, 1, 7)), "So");
        assert!(is_weekend(date(2024, 1, 6)));
        assert!(!is_working_day(date(2024, 1, 1), FederalState::Bremen).unwrap());
        assert_eq!(month_name(3).unwrap(), "März");
        assert!(month_name(0).is_err());
    }
}
