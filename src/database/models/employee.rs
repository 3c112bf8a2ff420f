use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::calendar::FederalState;
use crate::types::Role;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Employee {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub personnel_number: Option<String>,
    pub role: Role,
    pub weekly_hours: Decimal,
    pub workdays_per_week: i16,
    /// Gross annual salary for a full year of employment
    pub annual_salary: Decimal,
    /// Employer's social security contributions per full year
    pub employer_contributions: Decimal,
    /// Owner or partner without salary; FZul counts their hours at a flat rate
    pub is_owner: bool,
    pub employment_start: NaiveDate,
    pub employment_end: Option<NaiveDate>,
    /// Overrides the company's state for the holiday calendar (place of work)
    pub federal_state: Option<FederalState>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// "Lastname, Firstname" as printed on the forms
    pub fn display_name(&self) -> String {
        format!("{}, {}", self.last_name, self.first_name)
    }

    /// Contracted hours per working day
    pub fn daily_hours(&self) -> Decimal {
        if self.workdays_per_week <= 0 {
            return Decimal::ZERO;
        }
        self.weekly_hours / Decimal::from(self.workdays_per_week)
    }

    pub fn is_employed_on(&self, date: NaiveDate) -> bool {
        date >= self.employment_start && self.employment_end.map_or(true, |end| date <= end)
    }

    pub fn state_or(&self, company_state: FederalState) -> FederalState {
        self.federal_state.unwrap_or(company_state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{dec, fixtures};

    #[test]
    fn daily_hours_from_weekly_contract() {
        let mut e = fixtures::employee();
        e.weekly_hours = dec("40");
        e.workdays_per_week = 5;
        assert_eq!(e.daily_hours(), dec("8"));
        e.weekly_hours = dec("30");
        e.workdays_per_week = 4;
        assert_eq!(e.daily_hours(), dec("7.5"));
        e.workdays_per_week = 0;
        assert_eq!(e.daily_hours(), Decimal::ZERO);
    }

    #[test]
    fn employment_period_bounds() {
        let mut e = fixtures::employee();
        e.employment_start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        e.employment_end = Some(NaiveDate::from_ymd_opt(2024, 9, 30).unwrap());
        assert!(!e.is_employed_on(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()));
        assert!(e.is_employed_on(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()));
        assert!(e.is_employed_on(NaiveDate::from_ymd_opt(2024, 9, 30).unwrap()));
        assert!(!e.is_employed_on(NaiveDate::from_ymd_opt(2024, 10, 1).unwrap()));
    }

    #[test]
    fn names_and_state_override() {
        let mut e = fixtures::employee();
        e.first_name = "Erika".into();
        e.last_name = "Mustermann".into();
        assert_eq!(e.full_name(), "Erika Mustermann");
        assert_eq!(e.display_name(), "Mustermann, Erika");
        e.federal_state = None;
        assert_eq!(e.state_or(FederalState::Hessen), FederalState::Hessen);
        e.federal_state = Some(FederalState::Bayern);
        assert_eq!(e.state_or(FederalState::Hessen), FederalState::Bayern);
    }
}
