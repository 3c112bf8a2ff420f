//! Aggregation of raw time entries into the day grids printed on the forms.

pub mod month;
pub mod validation;
pub mod year;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::calendar::{CalendarError, HolidayCalendar};

pub use month::{DayRow, MonthInput, MonthSheet, PackageColumn};
pub use validation::{validate_entry, validate_month, Finding, FindingCode, Severity};
pub use year::{DayCell, MonthColumn, YearSheet};

#[derive(Debug, Error)]
pub enum TimesheetError {
    #[error(transparent)]
    Calendar(#[from] CalendarError),

    #[error("Hours must be greater than 0 and at most 24, got {0}")]
    InvalidHours(Decimal),

    #[error("Hours may have at most two decimal places, got {0}")]
    TooPrecise(Decimal),

    #[error("{date} is outside the project period {start} to {end}")]
    OutsideProjectPeriod { date: NaiveDate, start: NaiveDate, end: NaiveDate },

    #[error("{0} is outside the employment period")]
    OutsideEmployment(NaiveDate),

    #[error("Work package {work_package} does not belong to project {project}")]
    WorkPackageMismatch { work_package: Uuid, project: Uuid },

    #[error("A work package requires a project")]
    WorkPackageWithoutProject,
}

/// Classification of a calendar day for the grids
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "name", rename_all = "snake_case")]
pub enum DayKind {
    Workday,
    Weekend,
    Holiday(String),
}

impl DayKind {
    pub fn classify(date: NaiveDate, calendar: &HolidayCalendar) -> Self {
        match calendar.get(date) {
            Some(holiday) => DayKind::Holiday(holiday.name.clone()),
            None if crate::calendar::is_weekend(date) => DayKind::Weekend,
            None => DayKind::Workday,
        }
    }

    pub fn is_workday(&self) -> bool {
        matches!(self, DayKind::Workday)
    }
}

/// Sum of hours, rounded to the two decimals the forms print
pub(crate) fn sum_hours<'a>(hours: impl IntoIterator<Item = &'a Decimal>) -> Decimal {
    hours.into_iter().copied().sum::<Decimal>().round_dp(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::FederalState;
    use crate::testing::fixtures::date;

    #[test]
    fn classifies_days() {
        let cal = HolidayCalendar::new(2024, FederalState::Bayern).unwrap();
        assert_eq!(DayKind::classify(date(2024, 1, 2), &cal), DayKind::Workday);
        assert_eq!(DayKind::classify(date(2024, 1, 6), &cal), DayKind::Holiday("Heilige Drei Könige".into()));
        assert_eq!(DayKind::classify(date(2024, 1, 7), &cal), DayKind::Weekend);
    }

    #[test]
    fn day_kind_serializes_with_tag() {
        let v = serde_json::to_value(DayKind::Holiday("Neujahr".into())).unwrap();
        assert_eq!(v, serde_json::json!({"type": "holiday", "name": "Neujahr"}));
    }
}
