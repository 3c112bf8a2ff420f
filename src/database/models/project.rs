use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::types::FundingProgram;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub funding_program: FundingProgram,
    /// Förderkennzeichen / reference number assigned by the funding authority
    pub funding_code: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Project {
    pub fn runs_on(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    pub fn funding_code_or_name(&self) -> &str {
        self.funding_code.as_deref().unwrap_or(&self.name)
    }
}

/// Task-breakdown unit (Arbeitspaket) of a funded project
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WorkPackage {
    pub id: Uuid,
    pub project_id: Uuid,
    pub code: String,
    pub title: String,
    pub planned_hours: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProjectMember {
    pub project_id: Uuid,
    pub employee_id: Uuid,
    pub created_at: DateTime<Utc>,
}
