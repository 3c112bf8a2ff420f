//! Proportional-eligibility math for the two funding schemes.

pub mod fzul;
pub mod zim;

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use thiserror::Error;

use crate::calendar::{self, CalendarError, FederalState};
use crate::database::models::Employee;

#[derive(Debug, Error)]
pub enum FundingError {
    #[error(transparent)]
    Calendar(#[from] CalendarError),
}

/// Contracted working time of an employee within one year
#[derive(Debug, Clone, Serialize)]
pub struct Capacity {
    pub year: i32,
    pub year_working_days: u32,
    pub employed_working_days: u32,
    pub hours: Decimal,
}

impl Capacity {
    /// Fraction of the year's working days the employee was employed
    pub fn employed_fraction(&self) -> Decimal {
        if self.year_working_days == 0 {
            return Decimal::ZERO;
        }
        Decimal::from(self.employed_working_days) / Decimal::from(self.year_working_days)
    }
}

/// Weekly hours / 5 per Monday-Friday working day inside the employment period
pub fn annual_capacity(employee: &Employee, year: i32, state: FederalState) -> Result<Capacity, FundingError> {
    let year_start = calendar::first_of_month(year, 1)?;
    let year_end = calendar::last_of_month(year, 12)?;
    let year_working_days = calendar::working_days_in_range(year_start, year_end, state)?;

    let employed_working_days = match employment_overlap(employee, year_start, year_end) {
        Some((from, to)) => calendar::working_days_in_range(from, to, state)?,
        None => 0,
    };

    let hours = round_hours(employee.weekly_hours / Decimal::from(5) * Decimal::from(employed_working_days));

    Ok(Capacity { year, year_working_days, employed_working_days, hours })
}

fn employment_overlap(employee: &Employee, from: NaiveDate, to: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    let start = employee.employment_start.max(from);
    let end = employee.employment_end.map_or(to, |end| end.min(to));
    (start <= end).then_some((start, end))
}

/// Commercial rounding to cents
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub fn round_hours(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Shares are kept with four decimals (two decimals in percent)
pub fn round_share(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::dec;
    use crate::testing::fixtures::{self, date};

    #[test]
    fn full_year_capacity() {
        let employee = fixtures::employee();
        let cap = annual_capacity(&employee, 2024, FederalState::Hamburg).unwrap();
        assert_eq!(cap.year_working_days, 252);
        assert_eq!(cap.employed_working_days, 252);
        assert_eq!(cap.hours, dec("2016"));
        assert_eq!(cap.employed_fraction(), Decimal::ONE);
    }

    #[test]
    fn part_time_on_fewer_days_is_proportional() {
        let mut employee = fixtures::employee();
        employee.weekly_hours = dec("20");
        employee.workdays_per_week = 4;
        let cap = annual_capacity(&employee, 2024, FederalState::Hamburg).unwrap();
        assert_eq!(cap.hours, dec("1008"));
    }

    #[test]
    fn partial_year_employment() {
        let mut employee = fixtures::employee();
        employee.employment_start = date(2024, 7, 1);
        let cap = annual_capacity(&employee, 2024, FederalState::Hamburg).unwrap();
        // Jul-Dec 2024: 132 weekdays minus Oct 3, Oct 31, Dec 25, Dec 26
        assert_eq!(cap.employed_working_days, 128);
        assert_eq!(cap.hours, dec("1024"));

        employee.employment_start = date(2025, 1, 1);
        let cap = annual_capacity(&employee, 2024, FederalState::Hamburg).unwrap();
        assert_eq!(cap.employed_working_days, 0);
        assert!(cap.hours.is_zero());
    }

    #[test]
    fn rounding_is_half_up() {
        assert_eq!(round_money(dec("10.005")), dec("10.01"));
        assert_eq!(round_money(dec("10.004")), dec("10.00"));
        assert_eq!(round_share(dec("0.123450")), dec("0.1235"));
    }
}
