use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use super::{nullable, Repository};
use crate::database::manager::DatabaseError;
use crate::database::models::TimeEntry;

#[derive(Debug, Clone, Deserialize)]
pub struct NewTimeEntry {
    /// Defaults to the requesting employee
    #[serde(default)]
    pub employee_id: Option<Uuid>,
    #[serde(default)]
    pub project_id: Option<Uuid>,
    #[serde(default)]
    pub work_package_id: Option<Uuid>,
    pub entry_date: NaiveDate,
    pub hours: Decimal,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimeEntryUpdate {
    #[serde(default, deserialize_with = "nullable")]
    pub project_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "nullable")]
    pub work_package_id: Option<Option<Uuid>>,
    pub entry_date: Option<NaiveDate>,
    pub hours: Option<Decimal>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
}

impl TimeEntryUpdate {
    pub fn apply(self, entry: &mut TimeEntry) {
        if let Some(v) = self.project_id {
            entry.project_id = v;
            // a work package never outlives a project change
            if self.work_package_id.is_none() {
                entry.work_package_id = None;
            }
        }
        if let Some(v) = self.work_package_id {
            entry.work_package_id = v;
        }
        if let Some(v) = self.entry_date {
            entry.entry_date = v;
        }
        if let Some(v) = self.hours {
            entry.hours = v;
        }
        if let Some(v) = self.description {
            entry.description = v;
        }
    }
}

/// Query string of `GET /api/time-entries`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntryFilter {
    pub employee_id: Option<Uuid>,
    pub project_id: Option<Uuid>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl Repository<TimeEntry> {
    pub async fn select_filtered(&self, filter: &EntryFilter) -> Result<Vec<TimeEntry>, DatabaseError> {
        if let (Some(from), Some(to)) = (filter.from, filter.to) {
            if from > to {
                return Err(DatabaseError::Invalid { field: "from", message: "must not be after 'to'".to_string() });
            }
        }
        Ok(sqlx::query_as::<_, TimeEntry>(
            r#"
            SELECT * FROM time_entries
            WHERE deleted_at IS NULL
            AND ($1::uuid IS NULL OR employee_id = $1)
            AND ($2::uuid IS NULL OR project_id = $2)
            AND ($3::date IS NULL OR entry_date >= $3)
            AND ($4::date IS NULL OR entry_date <= $4)
            ORDER BY entry_date, created_at
            "#,
        )
        .bind(filter.employee_id)
        .bind(filter.project_id)
        .bind(filter.from)
        .bind(filter.to)
        .fetch_all(self.pool())
        .await?)
    }

    pub async fn create(&self, employee_id: Uuid, input: &NewTimeEntry) -> Result<TimeEntry, DatabaseError> {
        Ok(sqlx::query_as::<_, TimeEntry>(
            r#"
            INSERT INTO time_entries (employee_id, project_id, work_package_id, entry_date, hours, description)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(employee_id)
        .bind(input.project_id)
        .bind(input.work_package_id)
        .bind(input.entry_date)
        .bind(input.hours)
        .bind(&input.description)
        .fetch_one(self.pool())
        .await?)
    }

    pub async fn save(&self, entry: &TimeEntry) -> Result<TimeEntry, DatabaseError> {
        sqlx::query_as::<_, TimeEntry>(
            r#"
            UPDATE time_entries SET
                project_id = $2, work_package_id = $3, entry_date = $4, hours = $5,
                description = $6, updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(entry.id)
        .bind(entry.project_id)
        .bind(entry.work_package_id)
        .bind(entry.entry_date)
        .bind(entry.hours)
        .bind(&entry.description)
        .fetch_optional(self.pool())
        .await?
        .ok_or_else(|| DatabaseError::NotFound("Time entry".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{dec, fixtures};
    use crate::types::FundingProgram;

    #[test]
    fn changing_project_drops_work_package() {
        let employee = fixtures::employee();
        let project = fixtures::project(FundingProgram::Zim);
        let wp = fixtures::work_package(&project, "AP1");
        let mut entry = fixtures::entry(&employee, Some(&project), Some(&wp), fixtures::date(2024, 3, 4), "8");

        let other = Uuid::new_v4();
        let update: TimeEntryUpdate = serde_json::from_value(serde_json::json!({ "project_id": other })).unwrap();
        update.apply(&mut entry);
        assert_eq!(entry.project_id, Some(other));
        assert_eq!(entry.work_package_id, None);
    }

    #[test]
    fn hours_only_update_keeps_assignment() {
        let employee = fixtures::employee();
        let project = fixtures::project(FundingProgram::Zim);
        let wp = fixtures::work_package(&project, "AP1");
        let mut entry = fixtures::entry(&employee, Some(&project), Some(&wp), fixtures::date(2024, 3, 4), "8");

        let update: TimeEntryUpdate = serde_json::from_str(r#"{"hours": 6.5}"#).unwrap();
        update.apply(&mut entry);
        assert_eq!(entry.hours, dec("6.5"));
        assert_eq!(entry.work_package_id, Some(wp.id));
    }
}
