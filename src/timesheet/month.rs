use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

use super::{sum_hours, DayKind, TimesheetError};
use crate::calendar::{self, FederalState, HolidayCalendar};
use crate::database::models::{Absence, Employee, Project, TimeEntry, WorkPackage};
use crate::types::{AbsenceKind, HOLIDAY_CODE};

#[derive(Debug, Clone, Serialize)]
pub struct PackageColumn {
    pub id: Uuid,
    pub code: String,
    pub title: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DayRow {
    pub date: NaiveDate,
    pub kind: DayKind,
    /// Aligned with `MonthSheet::columns`
    pub package_hours: Vec<Decimal>,
    /// Project hours booked without a (known) work package
    pub unassigned: Decimal,
    pub project_total: Decimal,
    /// Hours on other projects or general work
    pub other: Decimal,
    pub absence: Option<AbsenceKind>,
    pub total: Decimal,
}

impl DayRow {
    /// Code for the absence column: the absence kind, or F for a holiday on a weekday
    pub fn absence_code(&self) -> Option<&'static str> {
        if let Some(kind) = self.absence {
            return Some(kind.code());
        }
        match &self.kind {
            DayKind::Holiday(_) if !calendar::is_weekend(self.date) => Some(HOLIDAY_CODE),
            _ => None,
        }
    }
}

pub struct MonthInput<'a> {
    pub year: i32,
    pub month: u32,
    pub state: FederalState,
    pub project: &'a Project,
    pub work_packages: &'a [WorkPackage],
    pub employee: &'a Employee,
    pub entries: &'a [TimeEntry],
    pub absences: &'a [Absence],
}

/// One employee's month on one project, one row per calendar day
#[derive(Debug, Clone, Serialize)]
pub struct MonthSheet {
    pub year: i32,
    pub month: u32,
    pub state: FederalState,
    pub columns: Vec<PackageColumn>,
    pub rows: Vec<DayRow>,
    pub package_totals: Vec<Decimal>,
    pub unassigned_total: Decimal,
    pub project_total: Decimal,
    pub other_total: Decimal,
    pub total: Decimal,
    pub working_days: u32,
    pub absence_days: HashMap<&'static str, u32>,
}

impl MonthSheet {
    pub fn build(input: MonthInput<'_>) -> Result<Self, TimesheetError> {
        let MonthInput { year, month, state, project, work_packages, employee, entries, absences } = input;

        let calendar = HolidayCalendar::new(year, state)?;
        let first = calendar::first_of_month(year, month)?;
        let days = calendar::days_in_month(year, month)?;

        let mut packages: Vec<&WorkPackage> =
            work_packages.iter().filter(|wp| wp.project_id == project.id).collect();
        packages.sort_by(|a, b| a.code.cmp(&b.code));
        let columns: Vec<PackageColumn> = packages
            .iter()
            .map(|wp| PackageColumn { id: wp.id, code: wp.code.clone(), title: wp.title.clone() })
            .collect();
        let column_index: HashMap<Uuid, usize> = columns.iter().enumerate().map(|(i, c)| (c.id, i)).collect();

        let in_month = |d: NaiveDate| d.year() == year && d.month() == month;

        let mut rows: Vec<DayRow> = first
            .iter_days()
            .take(days as usize)
            .map(|date| DayRow {
                date,
                kind: DayKind::classify(date, &calendar),
                package_hours: vec![Decimal::ZERO; columns.len()],
                unassigned: Decimal::ZERO,
                project_total: Decimal::ZERO,
                other: Decimal::ZERO,
                absence: None,
                total: Decimal::ZERO,
            })
            .collect();

        for entry in entries.iter().filter(|e| e.employee_id == employee.id && in_month(e.entry_date)) {
            let row = &mut rows[entry.entry_date.day0() as usize];
            if entry.project_id == Some(project.id) {
                match entry.work_package_id.and_then(|id| column_index.get(&id)) {
                    Some(&col) => row.package_hours[col] += entry.hours,
                    None => row.unassigned += entry.hours,
                }
                row.project_total += entry.hours;
            } else {
                row.other += entry.hours;
            }
            row.total += entry.hours;
        }

        let mut absence_days: HashMap<&'static str, u32> = HashMap::new();
        for absence in absences.iter().filter(|a| a.employee_id == employee.id && in_month(a.absence_date)) {
            let row = &mut rows[absence.absence_date.day0() as usize];
            if row.absence.is_none() {
                row.absence = Some(absence.kind);
                *absence_days.entry(absence.kind.code()).or_default() += 1;
            }
        }

        let package_totals: Vec<Decimal> = (0..columns.len())
            .map(|col| sum_hours(rows.iter().map(|r| &r.package_hours[col])))
            .collect();

        let working_days = rows.iter().filter(|r| r.kind.is_workday()).count() as u32;

        Ok(Self {
            year,
            month,
            state,
            package_totals,
            unassigned_total: sum_hours(rows.iter().map(|r| &r.unassigned)),
            project_total: sum_hours(rows.iter().map(|r| &r.project_total)),
            other_total: sum_hours(rows.iter().map(|r| &r.other)),
            total: sum_hours(rows.iter().map(|r| &r.total)),
            columns,
            rows,
            working_days,
            absence_days,
        })
    }

    pub fn has_unassigned(&self) -> bool {
        !self.unassigned_total.is_zero()
    }

    pub fn row(&self, day: u32) -> Option<&DayRow> {
        self.rows.get(day.checked_sub(1)? as usize)
    }
}
