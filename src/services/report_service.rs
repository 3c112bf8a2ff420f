use sqlx::PgPool;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::calendar;
use crate::config;
use crate::database::models::{Absence, Company, Employee, Project, TimeEntry, WorkPackage};
use crate::database::repository::absences::AbsenceFilter;
use crate::database::repository::time_entries::EntryFilter;
use crate::database::Repository;
use crate::render::{self, ExportFormat, Rendered};
use crate::report::{FzulInput, FzulReport, ReportError, ZimInput, ZimTimesheet};
use crate::timesheet::{validate_month, Finding};

/// Loads report data from one company database and hands it to the builders
pub struct ReportService<'a> {
    pool: PgPool,
    company: &'a Company,
}

impl<'a> ReportService<'a> {
    pub fn new(pool: PgPool, company: &'a Company) -> Self {
        Self { pool, company }
    }

    async fn employee(&self, id: Uuid) -> Result<Employee, ReportError> {
        Ok(Repository::<Employee>::new(self.pool.clone()).select_404(id).await?)
    }

    async fn entries(
        &self,
        employee_id: Uuid,
        from: chrono::NaiveDate,
        to: chrono::NaiveDate,
    ) -> Result<Vec<TimeEntry>, ReportError> {
        let filter = EntryFilter { employee_id: Some(employee_id), project_id: None, from: Some(from), to: Some(to) };
        Ok(Repository::<TimeEntry>::new(self.pool.clone()).select_filtered(&filter).await?)
    }

    async fn absences(
        &self,
        employee_id: Uuid,
        from: chrono::NaiveDate,
        to: chrono::NaiveDate,
    ) -> Result<Vec<Absence>, ReportError> {
        let filter = AbsenceFilter { employee_id: Some(employee_id), from: Some(from), to: Some(to) };
        Ok(Repository::<Absence>::new(self.pool.clone()).select_filtered(&filter).await?)
    }

    pub async fn zim(
        &self,
        project_id: Uuid,
        employee_id: Uuid,
        year: i32,
        month: u32,
        with_costs: bool,
    ) -> Result<ZimTimesheet, ReportError> {
        let project = Repository::<Project>::new(self.pool.clone()).select_404(project_id).await?;
        let work_packages = Repository::<WorkPackage>::new(self.pool.clone())
            .select_for_project(project_id)
            .await?;
        let employee = self.employee(employee_id).await?;

        let month_start = calendar::first_of_month(year, month)?;
        let month_end = calendar::last_of_month(year, month)?;
        let year_start = calendar::first_of_month(year, 1)?;

        let entries = self.entries(employee_id, year_start, month_end).await?;
        let absences = self.absences(employee_id, month_start, month_end).await?;
        debug!(
            "ZIM {} {:04}-{:02}: {} entries, {} absences",
            project.name,
            year,
            month,
            entries.len(),
            absences.len()
        );

        let settings = &config::config().report;
        let timesheet = ZimTimesheet::assemble(ZimInput {
            company: self.company,
            project: &project,
            work_packages: &work_packages,
            employee: &employee,
            entries: &entries,
            absences: &absences,
            year,
            month,
            with_costs,
            overhead_rate: settings.zim_overhead_rate,
            max_daily_hours: settings.max_daily_hours,
        })?;

        if !timesheet.findings.is_empty() {
            warn!(
                "ZIM timesheet for {} {:04}-{:02} has {} findings",
                employee.id,
                year,
                month,
                timesheet.findings.len()
            );
        }
        Ok(timesheet)
    }

    pub async fn fzul(&self, employee_id: Uuid, year: i32) -> Result<FzulReport, ReportError> {
        let employee = self.employee(employee_id).await?;
        let from = calendar::first_of_month(year, 1)?;
        let to = calendar::last_of_month(year, 12)?;

        let projects = Repository::<Project>::new(self.pool.clone())
            .select_booked_by(employee_id, from, to)
            .await?;
        let entries = self.entries(employee_id, from, to).await?;

        FzulReport::assemble(FzulInput {
            company: self.company,
            employee: &employee,
            projects: &projects,
            entries: &entries,
            year,
        })
    }

    /// Plausibility findings for one employee and month across all projects
    pub async fn validation(&self, employee_id: Uuid, year: i32, month: u32) -> Result<Vec<Finding>, ReportError> {
        let employee = self.employee(employee_id).await?;
        let from = calendar::first_of_month(year, month)?;
        let to = calendar::last_of_month(year, month)?;

        let projects = Repository::<Project>::new(self.pool.clone())
            .select_booked_by(employee_id, from, to)
            .await?;
        let entries = self.entries(employee_id, from, to).await?;
        let absences = self.absences(employee_id, from, to).await?;

        Ok(validate_month(
            &employee,
            employee.state_or(self.company.federal_state),
            year,
            month,
            &projects,
            &entries,
            &absences,
            config::config().report.max_daily_hours,
        )?)
    }

    pub async fn zim_export(
        &self,
        project_id: Uuid,
        employee_id: Uuid,
        year: i32,
        month: u32,
        with_costs: bool,
        format: ExportFormat,
    ) -> Result<Rendered, ReportError> {
        let timesheet = self.zim(project_id, employee_id, year, month, with_costs).await?;
        Ok(render::zim(&timesheet, format)?)
    }

    pub async fn fzul_export(&self, employee_id: Uuid, year: i32, format: ExportFormat) -> Result<Rendered, ReportError> {
        let report = self.fzul(employee_id, year).await?;
        Ok(render::fzul(&report, format)?)
    }
}
