use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use super::{sum_hours, DayKind, TimesheetError};
use crate::calendar::{self, FederalState, HolidayCalendar};
use crate::database::models::TimeEntry;

#[derive(Debug, Clone, Serialize)]
pub struct DayCell {
    pub date: NaiveDate,
    pub kind: DayKind,
    pub hours: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthColumn {
    pub month: u32,
    pub cells: Vec<DayCell>,
    pub total: Decimal,
}

/// Project hours of one employee over a year as a 12 x 31 calendar matrix
#[derive(Debug, Clone, Serialize)]
pub struct YearSheet {
    pub year: i32,
    pub state: FederalState,
    pub project_id: Uuid,
    pub months: Vec<MonthColumn>,
    pub total: Decimal,
}

impl YearSheet {
    pub fn build(
        year: i32,
        state: FederalState,
        project_id: Uuid,
        employee_id: Uuid,
        entries: &[TimeEntry],
    ) -> Result<Self, TimesheetError> {
        let holidays = HolidayCalendar::new(year, state)?;

        let mut months = Vec::with_capacity(12);
        for month in 1..=12 {
            let first = calendar::first_of_month(year, month)?;
            let days = calendar::days_in_month(year, month)?;
            let cells = first
                .iter_days()
                .take(days as usize)
                .map(|date| DayCell { date, kind: DayKind::classify(date, &holidays), hours: Decimal::ZERO })
                .collect();
            months.push(MonthColumn { month, cells, total: Decimal::ZERO });
        }

        for entry in entries.iter().filter(|e| {
            e.employee_id == employee_id && e.project_id == Some(project_id) && e.entry_date.year() == year
        }) {
            let column = &mut months[entry.entry_date.month0() as usize];
            column.cells[entry.entry_date.day0() as usize].hours += entry.hours;
        }

        for column in months.iter_mut() {
            column.total = sum_hours(column.cells.iter().map(|c| &c.hours));
        }
        let total = sum_hours(months.iter().map(|m| &m.total));

        Ok(Self { year, state, project_id, months, total })
    }

    /// Cell for `day` (1-based) of `month`; None for dates that do not exist (e.g. Feb 30)
    pub fn cell(&self, month: u32, day: u32) -> Option<&DayCell> {
        self.months.get(month.checked_sub(1)? as usize)?.cells.get(day.checked_sub(1)? as usize)
    }

    pub fn month_total(&self, month: u32) -> Decimal {
        month
            .checked_sub(1)
            .and_then(|i| self.months.get(i as usize))
            .map_or(Decimal::ZERO, |m| m.total)
    }
}
