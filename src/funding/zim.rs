//! ZIM personnel costs for the monthly timesheet.

use rust_decimal::Decimal;
use serde::Serialize;

use super::{round_hours, round_money};
use crate::database::models::Employee;

/// Reference hours per person-year; also the maximum billable per year
pub const ANNUAL_HOURS: u32 = 1720;

#[derive(Debug, Clone, Serialize)]
pub struct PersonnelCosts {
    pub hourly_rate: Decimal,
    pub hours: Decimal,
    pub counted_hours: Decimal,
    pub personnel_costs: Decimal,
    pub overhead_rate: Decimal,
    pub overhead: Decimal,
    pub total: Decimal,
}

pub fn hourly_rate(employee: &Employee) -> Decimal {
    round_money((employee.annual_salary + employee.employer_contributions) / Decimal::from(ANNUAL_HOURS))
}

/// Costs for `month_hours`, given the hours already billed on the project earlier in the year
pub fn personnel_costs(
    employee: &Employee,
    month_hours: Decimal,
    hours_before_in_year: Decimal,
    overhead_rate: Decimal,
) -> PersonnelCosts {
    let remaining = (Decimal::from(ANNUAL_HOURS) - hours_before_in_year).max(Decimal::ZERO);
    let counted_hours = round_hours(month_hours.min(remaining));
    let rate = hourly_rate(employee);
    let personnel_costs = round_money(counted_hours * rate);
    let overhead = round_money(personnel_costs * overhead_rate);

    PersonnelCosts {
        hourly_rate: rate,
        hours: month_hours,
        counted_hours,
        personnel_costs,
        overhead_rate,
        overhead,
        total: personnel_costs + overhead,
    }
}
