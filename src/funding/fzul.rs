//! Forschungszulage: eligible personnel costs and the resulting tax credit.

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use super::{annual_capacity, round_hours, round_money, round_share, Capacity, FundingError};
use crate::calendar::FederalState;
use crate::database::models::Employee;

/// Owners are capped at 40 hours per week
pub const OWNER_MAX_HOURS_PER_YEAR: u32 = 40 * 52;

/// Flat hourly rate for owners' own R&D work
pub fn owner_hourly_rate(year: i32) -> Decimal {
    if year >= 2024 {
        Decimal::from(70)
    } else {
        Decimal::from(40)
    }
}

/// 25 % base rate, 35 % for SMEs from 2024 on
pub fn credit_rate(year: i32, is_sme: bool) -> Decimal {
    if is_sme && year >= 2024 {
        Decimal::new(35, 2)
    } else {
        Decimal::new(25, 2)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectHours {
    pub project_id: Uuid,
    pub name: String,
    pub funding_code: Option<String>,
    pub hours: Decimal,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Method {
    /// Share of the salary according to the share of working time
    Salary { wage_base: Decimal },
    /// Owner's own work at a flat hourly rate
    OwnerFlatRate { hourly_rate: Decimal, max_hours: u32 },
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectLine {
    pub project_id: Uuid,
    pub name: String,
    pub funding_code: Option<String>,
    pub hours: Decimal,
    /// Hours after the caps were applied
    pub counted_hours: Decimal,
    pub share: Decimal,
    pub eligible_costs: Decimal,
    /// Credit for this project, rounded to cents; the lines add up to `Assessment::credit`
    pub credit: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct Assessment {
    pub year: i32,
    pub employee_id: Uuid,
    pub capacity: Capacity,
    pub method: Method,
    pub lines: Vec<ProjectLine>,
    pub total_hours: Decimal,
    pub total_share: Decimal,
    pub eligible_costs: Decimal,
    pub credit_rate: Decimal,
    pub credit: Decimal,
}

/// Assess one employee's year across all FZul projects. Projects are
/// processed in the given order; once 100 % of the working time (or the
/// owner hour cap) is used up, later projects are reduced.
pub fn assess(
    employee: &Employee,
    year: i32,
    state: FederalState,
    is_sme: bool,
    projects: &[ProjectHours],
) -> Result<Assessment, FundingError> {
    let capacity = annual_capacity(employee, year, state)?;

    let (method, mut lines) = if employee.is_owner {
        owner_lines(year, projects)
    } else {
        salary_lines(employee, &capacity, projects)
    };

    let total_hours = round_hours(lines.iter().map(|l| l.hours).sum());
    let total_share = round_share(lines.iter().map(|l| l.share).sum());
    let eligible_costs = round_money(lines.iter().map(|l| l.eligible_costs).sum());
    let rate = credit_rate(year, is_sme);
    for line in &mut lines {
        line.credit = round_money(line.eligible_costs * rate);
    }
    // Summed per line so each project page matches the overview total
    let credit: Decimal = lines.iter().map(|l| l.credit).sum();

    Ok(Assessment {
        year,
        employee_id: employee.id,
        capacity,
        method,
        lines,
        total_hours,
        total_share,
        eligible_costs,
        credit_rate: rate,
        credit,
    })
}

fn salary_lines(employee: &Employee, capacity: &Capacity, projects: &[ProjectHours]) -> (Method, Vec<ProjectLine>) {
    let wage_base = round_money((employee.annual_salary + employee.employer_contributions) * capacity.employed_fraction());

    let mut remaining = Decimal::ONE;
    let lines = projects
        .iter()
        .map(|p| {
            let raw_share = if capacity.hours.is_zero() {
                Decimal::ZERO
            } else {
                p.hours / capacity.hours
            };
            let share = raw_share.min(remaining);
            remaining -= share;
            let counted_hours = if capacity.hours.is_zero() {
                Decimal::ZERO
            } else if share == raw_share {
                p.hours
            } else {
                round_hours(capacity.hours * share)
            };
            ProjectLine {
                project_id: p.project_id,
                name: p.name.clone(),
                funding_code: p.funding_code.clone(),
                hours: p.hours,
                counted_hours,
                share: round_share(share),
                eligible_costs: round_money(wage_base * share),
                credit: Decimal::ZERO,
            }
        })
        .collect();

    (Method::Salary { wage_base }, lines)
}

fn owner_lines(year: i32, projects: &[ProjectHours]) -> (Method, Vec<ProjectLine>) {
    let hourly_rate = owner_hourly_rate(year);
    let max_hours = Decimal::from(OWNER_MAX_HOURS_PER_YEAR);

    let mut remaining = max_hours;
    let lines = projects
        .iter()
        .map(|p| {
            let counted_hours = p.hours.min(remaining);
            remaining -= counted_hours;
            ProjectLine {
                project_id: p.project_id,
                name: p.name.clone(),
                funding_code: p.funding_code.clone(),
                hours: p.hours,
                counted_hours,
                share: round_share(counted_hours / max_hours),
                eligible_costs: round_money(counted_hours * hourly_rate),
                credit: Decimal::ZERO,
            }
        })
        .collect();

    (Method::OwnerFlatRate { hourly_rate, max_hours: OWNER_MAX_HOURS_PER_YEAR }, lines)
}
