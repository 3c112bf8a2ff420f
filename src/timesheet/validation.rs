use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

use super::{DayKind, TimesheetError};
use crate::calendar::{FederalState, HolidayCalendar};
use crate::database::models::{Absence, Employee, Project, TimeEntry, WorkPackage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingCode {
    DailyLimitExceeded,
    WorkOnNonWorkingDay,
    WorkDuringAbsence,
    OutsideProjectPeriod,
    OutsideEmployment,
}

#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    pub date: NaiveDate,
    pub severity: Severity,
    pub code: FindingCode,
    pub message: String,
}

/// Check a single entry before it is stored
pub fn validate_entry(
    employee: &Employee,
    project: Option<&Project>,
    work_package: Option<&WorkPackage>,
    date: NaiveDate,
    hours: Decimal,
) -> Result<(), TimesheetError> {
    if hours <= Decimal::ZERO || hours > Decimal::from(24) {
        return Err(TimesheetError::InvalidHours(hours));
    }
    if hours.normalize().scale() > 2 {
        return Err(TimesheetError::TooPrecise(hours));
    }
    if !employee.is_employed_on(date) {
        return Err(TimesheetError::OutsideEmployment(date));
    }
    if let Some(project) = project {
        if !project.runs_on(date) {
            return Err(TimesheetError::OutsideProjectPeriod {
                date,
                start: project.start_date,
                end: project.end_date,
            });
        }
    }
    match (project, work_package) {
        (None, Some(_)) => Err(TimesheetError::WorkPackageWithoutProject),
        (Some(project), Some(wp)) if wp.project_id != project.id => Err(TimesheetError::WorkPackageMismatch {
            work_package: wp.id,
            project: project.id,
        }),
        _ => Ok(()),
    }
}

/// Plausibility findings for already stored data of one employee and month
pub fn validate_month(
    employee: &Employee,
    state: FederalState,
    year: i32,
    month: u32,
    projects: &[Project],
    entries: &[TimeEntry],
    absences: &[Absence],
    max_daily_hours: Decimal,
) -> Result<Vec<Finding>, TimesheetError> {
    use chrono::Datelike;

    let calendar = HolidayCalendar::new(year, state)?;
    let projects: HashMap<Uuid, &Project> = projects.iter().map(|p| (p.id, p)).collect();
    let absent: HashMap<NaiveDate, &Absence> = absences
        .iter()
        .filter(|a| a.employee_id == employee.id)
        .map(|a| (a.absence_date, a))
        .collect();

    let mut findings = Vec::new();
    let mut per_day: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();

    for entry in entries.iter().filter(|e| {
        e.employee_id == employee.id && e.entry_date.year() == year && e.entry_date.month() == month
    }) {
        *per_day.entry(entry.entry_date).or_default() += entry.hours;

        if !employee.is_employed_on(entry.entry_date) {
            findings.push(Finding {
                date: entry.entry_date,
                severity: Severity::Error,
                code: FindingCode::OutsideEmployment,
                message: format!("{} h booked outside the employment period", entry.hours),
            });
        }

        if let Some(project) = entry.project_id.and_then(|id| projects.get(&id)) {
            if !project.runs_on(entry.entry_date) {
                findings.push(Finding {
                    date: entry.entry_date,
                    severity: Severity::Error,
                    code: FindingCode::OutsideProjectPeriod,
                    message: format!(
                        "{} h booked on '{}' outside its period {} to {}",
                        entry.hours, project.name, project.start_date, project.end_date
                    ),
                });
            }
        }
    }

    for (date, hours) in per_day {
        if hours.is_zero() {
            continue;
        }
        if hours > max_daily_hours {
            findings.push(Finding {
                date,
                severity: Severity::Warning,
                code: FindingCode::DailyLimitExceeded,
                message: format!("{} h exceed the daily maximum of {} h", hours, max_daily_hours),
            });
        }
        match DayKind::classify(date, &calendar) {
            DayKind::Workday => {}
            DayKind::Weekend => findings.push(Finding {
                date,
                severity: Severity::Warning,
                code: FindingCode::WorkOnNonWorkingDay,
                message: format!("{} h booked on a weekend", hours),
            }),
            DayKind::Holiday(name) => findings.push(Finding {
                date,
                severity: Severity::Warning,
                code: FindingCode::WorkOnNonWorkingDay,
                message: format!("{} h booked on {}", hours, name),
            }),
        }
        if let Some(absence) = absent.get(&date) {
            findings.push(Finding {
                date,
                severity: Severity::Error,
                code: FindingCode::WorkDuringAbsence,
                message: format!("{} h booked on an absence day ({})", hours, absence.kind.code()),
            });
        }
    }

    findings.sort_by(|a, b| a.date.cmp(&b.date).then(b.severity.cmp(&a.severity)));
    Ok(findings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures::{self, date};
    use crate::testing::dec;
    use crate::types::{AbsenceKind, FundingProgram};

    #[test]
    fn entry_hours_bounds() {
        let employee = fixtures::employee();
        let day = date(2024, 3, 4);
        assert!(validate_entry(&employee, None, None, day, dec("8")).is_ok());
        assert!(validate_entry(&employee, None, None, day, dec("24")).is_ok());
        assert!(matches!(
            validate_entry(&employee, None, None, day, dec("0")),
            Err(TimesheetError::InvalidHours(_))
        ));
        assert!(matches!(
            validate_entry(&employee, None, None, day, dec("24.5")),
            Err(TimesheetError::InvalidHours(_))
        ));
        assert!(matches!(
            validate_entry(&employee, None, None, day, dec("1.125")),
            Err(TimesheetError::TooPrecise(_))
        ));
        assert!(validate_entry(&employee, None, None, day, dec("1.500")).is_ok());
    }

    #[test]
    fn entry_must_match_project_and_package() {
        let employee = fixtures::employee();
        let project = fixtures::project(FundingProgram::Zim);
        let other = fixtures::project(FundingProgram::Zim);
        let wp = fixtures::work_package(&other, "AP1");

        let before_start = date(2023, 6, 30);
        assert!(matches!(
            validate_entry(&employee, Some(&project), None, before_start, dec("1")),
            Err(TimesheetError::OutsideProjectPeriod { .. })
        ));
        assert!(matches!(
            validate_entry(&employee, Some(&project), Some(&wp), date(2024, 1, 2), dec("1")),
            Err(TimesheetError::WorkPackageMismatch { .. })
        ));
        assert!(matches!(
            validate_entry(&employee, None, Some(&wp), date(2024, 1, 2), dec("1")),
            Err(TimesheetError::WorkPackageWithoutProject)
        ));

        let mut leaver = fixtures::employee();
        leaver.employment_end = Some(date(2023, 12, 31));
        assert!(matches!(
            validate_entry(&leaver, None, None, date(2024, 1, 2), dec("1")),
            Err(TimesheetError::OutsideEmployment(_))
        ));
    }

    #[test]
    fn month_findings() {
        let employee = fixtures::employee();
        let project = fixtures::project(FundingProgram::Zim);
        let entries = vec![
            fixtures::entry(&employee, Some(&project), None, date(2024, 5, 2), "7"),
            fixtures::entry(&employee, None, None, date(2024, 5, 2), "4"),
            fixtures::entry(&employee, Some(&project), None, date(2024, 5, 4), "3"),
            fixtures::entry(&employee, Some(&project), None, date(2024, 5, 9), "2"),
            fixtures::entry(&employee, Some(&project), None, date(2024, 5, 13), "8"),
            fixtures::entry(&employee, Some(&project), None, date(2024, 5, 14), "8"),
        ];
        let absences = vec![fixtures::absence(&employee, date(2024, 5, 13), AbsenceKind::Vacation)];

        let findings = validate_month(
            &employee,
            FederalState::Berlin,
            2024,
            5,
            &[project],
            &entries,
            &absences,
            dec("10"),
        )
        .unwrap();

        let codes: Vec<_> = findings.iter().map(|f| (f.date, f.code)).collect();
        assert_eq!(
            codes,
            vec![
                (date(2024, 5, 2), FindingCode::DailyLimitExceeded),
                (date(2024, 5, 4), FindingCode::WorkOnNonWorkingDay),
                (date(2024, 5, 9), FindingCode::WorkOnNonWorkingDay),
                (date(2024, 5, 13), FindingCode::WorkDuringAbsence),
            ]
        );
        assert!(findings[2].message.contains("Christi Himmelfahrt"));
        assert_eq!(findings[3].severity, Severity::Error);
    }

    #[test]
    fn flags_bookings_outside_project_period() {
        let employee = fixtures::employee();
        let project = fixtures::project(FundingProgram::Zim);
        let entries = vec![fixtures::entry(&employee, Some(&project), None, date(2025, 7, 1), "4")];

        let findings = validate_month(
            &employee,
            FederalState::Berlin,
            2025,
            7,
            std::slice::from_ref(&project),
            &entries,
            &[],
            dec("10"),
        )
        .unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].code, FindingCode::OutsideProjectPeriod);
    }
}
