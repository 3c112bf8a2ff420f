//! View models for the two forms, assembled from loaded rows.
//!
//! Everything here is pure: the report service loads companies, employees,
//! projects and entries, and these builders turn them into the sheets, cost
//! lines and assessments the layout code prints.

use chrono::Datelike;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::calendar::{CalendarError, FederalState};
use crate::database::models::{Absence, Company, Employee, Project, TimeEntry, WorkPackage};
use crate::database::DatabaseError;
use crate::funding::fzul::{self, Assessment, ProjectHours};
use crate::funding::zim::{self, PersonnelCosts};
use crate::funding::FundingError;
use crate::render::{file_component, ExportFormat, RenderError};
use crate::timesheet::{validate_month, Finding, MonthInput, MonthSheet, TimesheetError, YearSheet};
use crate::types::FundingProgram;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Calendar(#[from] CalendarError),

    #[error(transparent)]
    Timesheet(#[from] TimesheetError),

    #[error(transparent)]
    Funding(#[from] FundingError),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("Project '{project}' is not funded under {expected}")]
    WrongProgram { project: String, expected: &'static str },

    #[error("{0} not found")]
    NotFound(String),

    #[error("No FZul hours recorded for {0}")]
    NothingToReport(i32),
}

/// Monthly ZIM timesheet of one employee on one project
#[derive(Debug, Clone, Serialize)]
pub struct ZimTimesheet {
    pub company: String,
    pub project_name: String,
    pub funding_code: Option<String>,
    pub employee_name: String,
    pub last_name: String,
    pub personnel_number: Option<String>,
    pub sheet: MonthSheet,
    /// Only present when the requester may see salary data
    pub costs: Option<PersonnelCosts>,
    pub findings: Vec<Finding>,
}

pub struct ZimInput<'a> {
    pub company: &'a Company,
    pub project: &'a Project,
    pub work_packages: &'a [WorkPackage],
    pub employee: &'a Employee,
    /// The employee's entries from January 1st up to the end of the month
    pub entries: &'a [TimeEntry],
    pub absences: &'a [Absence],
    pub year: i32,
    pub month: u32,
    pub with_costs: bool,
    pub overhead_rate: Decimal,
    pub max_daily_hours: Decimal,
}

impl ZimTimesheet {
    pub fn assemble(input: ZimInput<'_>) -> Result<Self, ReportError> {
        let ZimInput {
            company,
            project,
            work_packages,
            employee,
            entries,
            absences,
            year,
            month,
            with_costs,
            overhead_rate,
            max_daily_hours,
        } = input;

        if project.funding_program != FundingProgram::Zim {
            return Err(ReportError::WrongProgram { project: project.name.clone(), expected: "ZIM" });
        }

        let state = employee.state_or(company.federal_state);
        let sheet = MonthSheet::build(MonthInput {
            year,
            month,
            state,
            project,
            work_packages,
            employee,
            entries,
            absences,
        })?;

        let findings = validate_month(
            employee,
            state,
            year,
            month,
            std::slice::from_ref(project),
            entries,
            absences,
            max_daily_hours,
        )?;

        let costs = with_costs.then(|| {
            let before: Decimal = entries
                .iter()
                .filter(|e| {
                    e.employee_id == employee.id
                        && e.project_id == Some(project.id)
                        && e.entry_date.year() == year
                        && e.entry_date.month() < month
                })
                .map(|e| e.hours)
                .sum();
            zim::personnel_costs(employee, sheet.project_total, before, overhead_rate)
        });

        Ok(Self {
            company: company.name.clone(),
            project_name: project.name.clone(),
            funding_code: project.funding_code.clone(),
            employee_name: employee.display_name(),
            last_name: employee.last_name.clone(),
            personnel_number: employee.personnel_number.clone(),
            sheet,
            costs,
            findings,
        })
    }

    /// `ZIM_<funding-code>_<lastname>_<yyyy-mm>.<ext>`
    pub fn file_name(&self, format: ExportFormat) -> String {
        let code = self.funding_code.as_deref().unwrap_or(&self.project_name);
        format!(
            "ZIM_{}_{}_{:04}-{:02}.{}",
            file_component(code),
            file_component(&self.last_name),
            self.sheet.year,
            self.sheet.month,
            format.extension()
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FzulProjectPage {
    pub project_id: Uuid,
    pub name: String,
    pub funding_code: Option<String>,
    pub sheet: YearSheet,
}

/// Annual FZul hour record of one employee across all FZul projects
#[derive(Debug, Clone, Serialize)]
pub struct FzulReport {
    pub company: String,
    pub employee_name: String,
    pub last_name: String,
    pub personnel_number: Option<String>,
    pub weekly_hours: Decimal,
    pub year: i32,
    pub state: FederalState,
    pub pages: Vec<FzulProjectPage>,
    pub assessment: Assessment,
}

pub struct FzulInput<'a> {
    pub company: &'a Company,
    pub employee: &'a Employee,
    /// Candidate projects; non-FZul projects are ignored
    pub projects: &'a [Project],
    /// The employee's entries of the year
    pub entries: &'a [TimeEntry],
    pub year: i32,
}

impl FzulReport {
    pub fn assemble(input: FzulInput<'_>) -> Result<Self, ReportError> {
        let FzulInput { company, employee, projects, entries, year } = input;
        let state = employee.state_or(company.federal_state);

        let mut candidates: Vec<&Project> =
            projects.iter().filter(|p| p.funding_program == FundingProgram::Fzul).collect();
        candidates.sort_by(|a, b| a.funding_code_or_name().cmp(b.funding_code_or_name()));

        let mut pages = Vec::new();
        for project in candidates {
            let sheet = YearSheet::build(year, state, project.id, employee.id, entries)?;
            if sheet.total.is_zero() {
                continue;
            }
            pages.push(FzulProjectPage {
                project_id: project.id,
                name: project.name.clone(),
                funding_code: project.funding_code.clone(),
                sheet,
            });
        }
        if pages.is_empty() {
            return Err(ReportError::NothingToReport(year));
        }

        let hours: Vec<ProjectHours> = pages
            .iter()
            .map(|p| ProjectHours {
                project_id: p.project_id,
                name: p.name.clone(),
                funding_code: p.funding_code.clone(),
                hours: p.sheet.total,
            })
            .collect();
        let assessment = fzul::assess(employee, year, state, company.is_sme, &hours)?;

        Ok(Self {
            company: company.name.clone(),
            employee_name: employee.display_name(),
            last_name: employee.last_name.clone(),
            personnel_number: employee.personnel_number.clone(),
            weekly_hours: employee.weekly_hours,
            year,
            state,
            pages,
            assessment,
        })
    }

    /// `FZul_<lastname>_<yyyy>.<ext>`
    pub fn file_name(&self, format: ExportFormat) -> String {
        format!("FZul_{}_{}.{}", file_component(&self.last_name), self.year, format.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::dec;
    use crate::testing::fixtures::{self, date};

    fn zim_input<'a>(
        company: &'a Company,
        project: &'a Project,
        employee: &'a Employee,
        entries: &'a [TimeEntry],
        with_costs: bool,
    ) -> ZimInput<'a> {
        ZimInput {
            company,
            project,
            work_packages: &[],
            employee,
            entries,
            absences: &[],
            year: 2024,
            month: 3,
            with_costs,
            overhead_rate: Decimal::ONE,
            max_daily_hours: dec("10"),
        }
    }

    #[test]
    fn zim_costs_account_for_earlier_months() {
        let company = fixtures::company();
        let employee = fixtures::employee();
        let project = fixtures::project(FundingProgram::Zim);
        // a bulk booking stands in for January and February
        let mut entries = vec![fixtures::entry(&employee, Some(&project), None, date(2024, 1, 10), "1700")];
        entries.push(fixtures::entry(&employee, Some(&project), None, date(2024, 3, 4), "8"));
        entries.push(fixtures::entry(&employee, Some(&project), None, date(2024, 3, 5), "8"));

        let ts = ZimTimesheet::assemble(zim_input(&company, &project, &employee, &entries, true)).unwrap();
        assert_eq!(ts.sheet.project_total, dec("16"));
        let costs = ts.costs.expect("costs");
        assert_eq!(costs.counted_hours, dec("16"));

        let mut late = entries.clone();
        late[0].hours = dec("1710");
        let ts = ZimTimesheet::assemble(zim_input(&company, &project, &employee, &late, true)).unwrap();
        assert_eq!(ts.costs.unwrap().counted_hours, dec("10"));
    }

    #[test]
    fn zim_without_costs_for_employees() {
        let company = fixtures::company();
        let employee = fixtures::employee();
        let project = fixtures::project(FundingProgram::Zim);
        let ts = ZimTimesheet::assemble(zim_input(&company, &project, &employee, &[], false)).unwrap();
        assert!(ts.costs.is_none());
        assert_eq!(ts.employee_name, "Mustermann, Erika");
        assert_eq!(ts.file_name(ExportFormat::Pdf), "ZIM_KK5012301AB4_Mustermann_2024-03.pdf");
    }

    #[test]
    fn zim_rejects_other_programs() {
        let company = fixtures::company();
        let employee = fixtures::employee();
        let project = fixtures::project(FundingProgram::Fzul);
        let err = ZimTimesheet::assemble(zim_input(&company, &project, &employee, &[], false)).unwrap_err();
        assert!(matches!(err, ReportError::WrongProgram { .. }));
    }

    #[test]
    fn fzul_pages_follow_funding_code_order() {
        let company = fixtures::company();
        let employee = fixtures::employee();
        let mut b = fixtures::project(FundingProgram::Fzul);
        b.funding_code = Some("FZ-B".into());
        let mut a = fixtures::project(FundingProgram::Fzul);
        a.funding_code = Some("FZ-A".into());
        let idle = fixtures::project(FundingProgram::Fzul);
        let zim = fixtures::project(FundingProgram::Zim);

        let entries = vec![
            fixtures::entry(&employee, Some(&b), None, date(2024, 2, 1), "6"),
            fixtures::entry(&employee, Some(&a), None, date(2024, 2, 2), "4"),
            fixtures::entry(&employee, Some(&zim), None, date(2024, 2, 5), "8"),
        ];
        let projects = vec![b.clone(), zim, idle, a.clone()];

        let report = FzulReport::assemble(FzulInput {
            company: &company,
            employee: &employee,
            projects: &projects,
            entries: &entries,
            year: 2024,
        })
        .unwrap();

        let ids: Vec<Uuid> = report.pages.iter().map(|p| p.project_id).collect();
        assert_eq!(ids, vec![a.id, b.id]);
        assert_eq!(report.assessment.lines.len(), 2);
        assert_eq!(report.assessment.total_hours, dec("10"));
        assert_eq!(report.state, FederalState::Bayern);
        assert_eq!(report.file_name(ExportFormat::Xlsx), "FZul_Mustermann_2024.xlsx");
    }

    #[test]
    fn fzul_without_hours_is_an_error() {
        let company = fixtures::company();
        let employee = fixtures::employee();
        let project = fixtures::project(FundingProgram::Fzul);
        let err = FzulReport::assemble(FzulInput {
            company: &company,
            employee: &employee,
            projects: &[project],
            entries: &[],
            year: 2024,
        })
        .unwrap_err();
        assert!(matches!(err, ReportError::NothingToReport(2024)));
    }
}
