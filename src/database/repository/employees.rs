use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;

use super::{nullable, require_text, Repository};
use crate::calendar::FederalState;
use crate::database::manager::DatabaseError;
use crate::database::models::Employee;
use crate::types::Role;

#[derive(Debug, Clone, Deserialize)]
pub struct NewEmployee {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub personnel_number: Option<String>,
    #[serde(default = "default_role")]
    pub role: Role,
    #[serde(default = "default_weekly_hours")]
    pub weekly_hours: Decimal,
    #[serde(default = "default_workdays")]
    pub workdays_per_week: i16,
    #[serde(default)]
    pub annual_salary: Decimal,
    #[serde(default)]
    pub employer_contributions: Decimal,
    #[serde(default)]
    pub is_owner: bool,
    pub employment_start: NaiveDate,
    #[serde(default)]
    pub employment_end: Option<NaiveDate>,
    #[serde(default)]
    pub federal_state: Option<FederalState>,
}

fn default_role() -> Role {
    Role::Employee
}

fn default_weekly_hours() -> Decimal {
    Decimal::from(40)
}

fn default_workdays() -> i16 {
    5
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmployeeUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub personnel_number: Option<Option<String>>,
    pub role: Option<Role>,
    pub weekly_hours: Option<Decimal>,
    pub workdays_per_week: Option<i16>,
    pub annual_salary: Option<Decimal>,
    pub employer_contributions: Option<Decimal>,
    pub is_owner: Option<bool>,
    pub employment_start: Option<NaiveDate>,
    #[serde(default, deserialize_with = "nullable")]
    pub employment_end: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "nullable")]
    pub federal_state: Option<Option<FederalState>>,
}

impl EmployeeUpdate {
    pub fn apply(self, employee: &mut Employee) {
        if let Some(v) = self.first_name {
            employee.first_name = v;
        }
        if let Some(v) = self.last_name {
            employee.last_name = v;
        }
        if let Some(v) = self.email {
            employee.email = v;
        }
        if let Some(v) = self.personnel_number {
            employee.personnel_number = v;
        }
        if let Some(v) = self.role {
            employee.role = v;
        }
        if let Some(v) = self.weekly_hours {
            employee.weekly_hours = v;
        }
        if let Some(v) = self.workdays_per_week {
            employee.workdays_per_week = v;
        }
        if let Some(v) = self.annual_salary {
            employee.annual_salary = v;
        }
        if let Some(v) = self.employer_contributions {
            employee.employer_contributions = v;
        }
        if let Some(v) = self.is_owner {
            employee.is_owner = v;
        }
        if let Some(v) = self.employment_start {
            employee.employment_start = v;
        }
        if let Some(v) = self.employment_end {
            employee.employment_end = v;
        }
        if let Some(v) = self.federal_state {
            employee.federal_state = v;
        }
    }
}

/// Contract data checks shared by create and update
#[allow(clippy::too_many_arguments)]
fn check_contract(
    first_name: &str,
    last_name: &str,
    email: &str,
    weekly_hours: Decimal,
    workdays_per_week: i16,
    annual_salary: Decimal,
    employer_contributions: Decimal,
    employment_start: NaiveDate,
    employment_end: Option<NaiveDate>,
) -> Result<(), DatabaseError> {
    require_text("first_name", first_name)?;
    require_text("last_name", last_name)?;
    if !email.contains('@') {
        return Err(DatabaseError::Invalid { field: "email", message: "must be an email address".to_string() });
    }
    if weekly_hours <= Decimal::ZERO || weekly_hours > Decimal::from(60) {
        return Err(DatabaseError::Invalid {
            field: "weekly_hours",
            message: "must be greater than 0 and at most 60".to_string(),
        });
    }
    if !(1..=7).contains(&workdays_per_week) {
        return Err(DatabaseError::Invalid {
            field: "workdays_per_week",
            message: "must be between 1 and 7".to_string(),
        });
    }
    if annual_salary < Decimal::ZERO || employer_contributions < Decimal::ZERO {
        return Err(DatabaseError::Invalid {
            field: "annual_salary",
            message: "salary and contributions must not be negative".to_string(),
        });
    }
    if employment_end.is_some_and(|end| end < employment_start) {
        return Err(DatabaseError::Invalid {
            field: "employment_end",
            message: "must not be before employment_start".to_string(),
        });
    }
    Ok(())
}

impl NewEmployee {
    pub fn validate(&self) -> Result<(), DatabaseError> {
        check_contract(
            &self.first_name,
            &self.last_name,
            &self.email,
            self.weekly_hours,
            self.workdays_per_week,
            self.annual_salary,
            self.employer_contributions,
            self.employment_start,
            self.employment_end,
        )
    }
}

pub fn validate(employee: &Employee) -> Result<(), DatabaseError> {
    check_contract(
        &employee.first_name,
        &employee.last_name,
        &employee.email,
        employee.weekly_hours,
        employee.workdays_per_week,
        employee.annual_salary,
        employee.employer_contributions,
        employee.employment_start,
        employee.employment_end,
    )
}

impl Repository<Employee> {
    pub async fn create(&self, input: &NewEmployee) -> Result<Employee, DatabaseError> {
        input.validate()?;
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            INSERT INTO employees (
                first_name, last_name, email, personnel_number, role,
                weekly_hours, workdays_per_week, annual_salary, employer_contributions,
                is_owner, employment_start, employment_end, federal_state
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(input.first_name.trim())
        .bind(input.last_name.trim())
        .bind(input.email.trim().to_lowercase())
        .bind(&input.personnel_number)
        .bind(input.role)
        .bind(input.weekly_hours)
        .bind(input.workdays_per_week)
        .bind(input.annual_salary)
        .bind(input.employer_contributions)
        .bind(input.is_owner)
        .bind(input.employment_start)
        .bind(input.employment_end)
        .bind(input.federal_state)
        .fetch_one(self.pool())
        .await?;

        info!("Created employee {} ({})", employee.id, employee.role);
        Ok(employee)
    }

    /// Writes all mutable columns of an already merged row
    pub async fn save(&self, employee: &Employee) -> Result<Employee, DatabaseError> {
        validate(employee)?;
        sqlx::query_as::<_, Employee>(
            r#"
            UPDATE employees SET
                first_name = $2, last_name = $3, email = $4, personnel_number = $5, role = $6,
                weekly_hours = $7, workdays_per_week = $8, annual_salary = $9,
                employer_contributions = $10, is_owner = $11, employment_start = $12,
                employment_end = $13, federal_state = $14, updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(employee.id)
        .bind(employee.first_name.trim())
        .bind(employee.last_name.trim())
        .bind(employee.email.trim().to_lowercase())
        .bind(&employee.personnel_number)
        .bind(employee.role)
        .bind(employee.weekly_hours)
        .bind(employee.workdays_per_week)
        .bind(employee.annual_salary)
        .bind(employee.employer_contributions)
        .bind(employee.is_owner)
        .bind(employee.employment_start)
        .bind(employee.employment_end)
        .bind(employee.federal_state)
        .fetch_optional(self.pool())
        .await?
        .ok_or_else(|| DatabaseError::NotFound("Employee".to_string()))
    }

    /// Remaining company admins besides `except`; the last one cannot be removed
    pub async fn count_admins_except(&self, except: uuid::Uuid) -> Result<i64, DatabaseError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM employees WHERE role = 'company_admin' AND id <> $1 AND deleted_at IS NULL",
        )
        .bind(except)
        .fetch_one(self.pool())
        .await?;
        Ok(count.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{dec, fixtures};

    #[test]
    fn update_merges_and_clears() {
        let mut employee = fixtures::employee();
        employee.employment_end = Some(fixtures::date(2025, 12, 31));
        let update: EmployeeUpdate =
            serde_json::from_str(r#"{"weekly_hours": "30", "employment_end": null, "role": "manager"}"#).unwrap();
        update.apply(&mut employee);
        assert_eq!(employee.weekly_hours, dec("30"));
        assert_eq!(employee.employment_end, None);
        assert_eq!(employee.role, Role::Manager);
        assert_eq!(employee.last_name, "Mustermann");
    }

    #[test]
    fn contract_checks() {
        let mut employee = fixtures::employee();
        assert!(validate(&employee).is_ok());

        employee.weekly_hours = dec("0");
        assert!(matches!(validate(&employee), Err(DatabaseError::Invalid { field: "weekly_hours", .. })));

        let mut employee = fixtures::employee();
        employee.employment_end = Some(fixtures::date(2000, 1, 1));
        assert!(matches!(validate(&employee), Err(DatabaseError::Invalid { field: "employment_end", .. })));

        let mut employee = fixtures::employee();
        employee.email = "no-address".into();
        assert!(matches!(validate(&employee), Err(DatabaseError::Invalid { field: "email", .. })));
    }

    #[test]
    fn new_employee_defaults() {
        let input: NewEmployee = serde_json::from_str(
            r#"{"first_name": "Max", "last_name": "Muster", "email": "max@example.com", "employment_start": "2024-01-01"}"#,
        )
        .unwrap();
        assert_eq!(input.role, Role::Employee);
        assert_eq!(input.weekly_hours, dec("40"));
        assert_eq!(input.workdays_per_week, 5);
        assert!(input.validate().is_ok());
    }
}
