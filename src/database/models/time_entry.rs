use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::types::AbsenceKind;

/// Hours worked by one employee on one day. Entries without a project count
/// as "other activities" on the timesheets.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TimeEntry {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub project_id: Option<Uuid>,
    pub work_package_id: Option<Uuid>,
    pub entry_date: NaiveDate,
    pub hours: Decimal,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Full-day absence (vacation, sickness, ...)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Absence {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub absence_date: NaiveDate,
    pub kind: AbsenceKind,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}
