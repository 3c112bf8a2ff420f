use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use super::{nullable, Repository};
use crate::database::manager::DatabaseError;
use crate::database::models::Absence;
use crate::types::AbsenceKind;

#[derive(Debug, Clone, Deserialize)]
pub struct NewAbsence {
    #[serde(default)]
    pub employee_id: Option<Uuid>,
    pub absence_date: NaiveDate,
    pub kind: AbsenceKind,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AbsenceUpdate {
    pub absence_date: Option<NaiveDate>,
    pub kind: Option<AbsenceKind>,
    #[serde(default, deserialize_with = "nullable")]
    pub note: Option<Option<String>>,
}

impl AbsenceUpdate {
    pub fn apply(self, absence: &mut Absence) {
        if let Some(v) = self.absence_date {
            absence.absence_date = v;
        }
        if let Some(v) = self.kind {
            absence.kind = v;
        }
        if let Some(v) = self.note {
            absence.note = v;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AbsenceFilter {
    pub employee_id: Option<Uuid>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl Repository<Absence> {
    pub async fn select_filtered(&self, filter: &AbsenceFilter) -> Result<Vec<Absence>, DatabaseError> {
        Ok(sqlx::query_as::<_, Absence>(
            r#"
            SELECT * FROM absences
            WHERE deleted_at IS NULL
            AND ($1::uuid IS NULL OR employee_id = $1)
            AND ($2::date IS NULL OR absence_date >= $2)
            AND ($3::date IS NULL OR absence_date <= $3)
            ORDER BY absence_date
            "#,
        )
        .bind(filter.employee_id)
        .bind(filter.from)
        .bind(filter.to)
        .fetch_all(self.pool())
        .await?)
    }

    /// One absence per employee and day (unique index); a second one is a conflict
    pub async fn create(&self, employee_id: Uuid, input: &NewAbsence) -> Result<Absence, DatabaseError> {
        Ok(sqlx::query_as::<_, Absence>(
            r#"
            INSERT INTO absences (employee_id, absence_date, kind, note)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(employee_id)
        .bind(input.absence_date)
        .bind(input.kind)
        .bind(&input.note)
        .fetch_one(self.pool())
        .await?)
    }

    pub async fn save(&self, absence: &Absence) -> Result<Absence, DatabaseError> {
        sqlx::query_as::<_, Absence>(
            r#"
            UPDATE absences SET absence_date = $2, kind = $3, note = $4, updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(absence.id)
        .bind(absence.absence_date)
        .bind(absence.kind)
        .bind(&absence.note)
        .fetch_optional(self.pool())
        .await?
        .ok_or_else(|| DatabaseError::NotFound("Absence".to_string()))
    }
}
