//! Test fixtures shared by unit tests across modules.

use rust_decimal::Decimal;

/// Parse a decimal literal; panics on malformed input (tests only)
pub fn dec(s: &str) -> Decimal {
    s.parse().unwrap_or_else(|e| panic!("bad decimal literal '{}': {}", s, e))
}

pub mod fixtures {
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    use super::dec;
    use crate::calendar::FederalState;
    use crate::database::models::{Absence, Company, Employee, Project, TimeEntry, WorkPackage};
    use crate::types::{AbsenceKind, FundingProgram, Role};

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap_or_else(|| panic!("invalid date {}-{}-{}", y, m, d))
    }

    pub fn company() -> Company {
        Company {
            id: Uuid::new_v4(),
            name: "Muster Labs GmbH".to_string(),
            slug: "muster-labs".to_string(),
            database: "tenant_0123456789abcdef".to_string(),
            federal_state: FederalState::Bayern,
            is_sme: true,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        }
    }

    /// Full-time employee (40h, 5 days) employed since 2020 at 60k + 12k contributions
    pub fn employee() -> Employee {
        Employee {
            id: Uuid::new_v4(),
            first_name: "Erika".to_string(),
            last_name: "Mustermann".to_string(),
            email: "erika@muster-labs.example".to_string(),
            personnel_number: Some("1001".to_string()),
            role: Role::Employee,
            weekly_hours: dec("40"),
            workdays_per_week: 5,
            annual_salary: dec("60000"),
            employer_contributions: dec("12000"),
            is_owner: false,
            employment_start: date(2020, 1, 1),
            employment_end: None,
            federal_state: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        }
    }

    pub fn project(program: FundingProgram) -> Project {
        Project {
            id: Uuid::new_v4(),
            name: "Sensorfusion".to_string(),
            funding_program: program,
            funding_code: Some("KK5012301AB4".to_string()),
            start_date: date(2023, 7, 1),
            end_date: date(2025, 6, 30),
            description: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        }
    }

    pub fn work_package(project: &Project, code: &str) -> WorkPackage {
        WorkPackage {
            id: Uuid::new_v4(),
            project_id: project.id,
            code: code.to_string(),
            title: format!("Arbeitspaket {}", code),
            planned_hours: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        }
    }

    pub fn entry(
        employee: &Employee,
        project: Option<&Project>,
        work_package: Option<&WorkPackage>,
        day: NaiveDate,
        hours: &str,
    ) -> TimeEntry {
        TimeEntry {
            id: Uuid::new_v4(),
            employee_id: employee.id,
            project_id: project.map(|p| p.id),
            work_package_id: work_package.map(|wp| wp.id),
            entry_date: day,
            hours: dec(hours),
            description: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        }
    }

    pub fn absence(employee: &Employee, day: NaiveDate, kind: AbsenceKind) -> Absence {
        Absence {
            id: Uuid::new_v4(),
            employee_id: employee.id,
            absence_date: day,
            kind,
            note: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        }
    }

    /// Project hours on every working day of a month, `hours` per day
    pub fn fill_month(
        employee: &Employee,
        project: &Project,
        work_package: Option<&WorkPackage>,
        year: i32,
        month: u32,
        state: FederalState,
        hours: &str,
    ) -> Vec<TimeEntry> {
        let calendar = crate::calendar::HolidayCalendar::new(year, state).expect("calendar");
        let first = date(year, month, 1);
        first
            .iter_days()
            .take_while(|d| chrono::Datelike::month(d) == month)
            .filter(|d| calendar.is_working_day(*d))
            .map(|d| entry(employee, Some(project), work_package, d, hours))
            .collect()
    }
}
