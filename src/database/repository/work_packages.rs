use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use super::{nullable, require_text, Repository};
use crate::database::manager::DatabaseError;
use crate::database::models::WorkPackage;

#[derive(Debug, Clone, Deserialize)]
pub struct NewWorkPackage {
    pub code: String,
    pub title: String,
    #[serde(default)]
    pub planned_hours: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkPackageUpdate {
    pub code: Option<String>,
    pub title: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub planned_hours: Option<Option<Decimal>>,
}

impl WorkPackageUpdate {
    pub fn apply(self, wp: &mut WorkPackage) {
        if let Some(v) = self.code {
            wp.code = v;
        }
        if let Some(v) = self.title {
            wp.title = v;
        }
        if let Some(v) = self.planned_hours {
            wp.planned_hours = v;
        }
    }
}

fn check(code: &str, title: &str, planned_hours: Option<Decimal>) -> Result<(), DatabaseError> {
    require_text("code", code)?;
    require_text("title", title)?;
    if planned_hours.is_some_and(|h| h < Decimal::ZERO) {
        return Err(DatabaseError::Invalid { field: "planned_hours", message: "must not be negative".to_string() });
    }
    Ok(())
}

impl Repository<WorkPackage> {
    pub async fn select_for_project(&self, project_id: Uuid) -> Result<Vec<WorkPackage>, DatabaseError> {
        Ok(sqlx::query_as::<_, WorkPackage>(
            "SELECT * FROM work_packages WHERE project_id = $1 AND deleted_at IS NULL ORDER BY code",
        )
        .bind(project_id)
        .fetch_all(self.pool())
        .await?)
    }

    /// Work package by id, only if it belongs to `project_id`
    pub async fn select_in_project(&self, project_id: Uuid, id: Uuid) -> Result<WorkPackage, DatabaseError> {
        match self.select_one(id).await? {
            Some(wp) if wp.project_id == project_id => Ok(wp),
            _ => Err(DatabaseError::NotFound("Work package".to_string())),
        }
    }

    pub async fn create(&self, project_id: Uuid, input: &NewWorkPackage) -> Result<WorkPackage, DatabaseError> {
        check(&input.code, &input.title, input.planned_hours)?;
        Ok(sqlx::query_as::<_, WorkPackage>(
            r#"
            INSERT INTO work_packages (project_id, code, title, planned_hours)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(project_id)
        .bind(input.code.trim())
        .bind(input.title.trim())
        .bind(input.planned_hours)
        .fetch_one(self.pool())
        .await?)
    }

    pub async fn save(&self, wp: &WorkPackage) -> Result<WorkPackage, DatabaseError> {
        check(&wp.code, &wp.title, wp.planned_hours)?;
        sqlx::query_as::<_, WorkPackage>(
            r#"
            UPDATE work_packages SET code = $2, title = $3, planned_hours = $4, updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(wp.id)
        .bind(wp.code.trim())
        .bind(wp.title.trim())
        .bind(wp.planned_hours)
        .fetch_optional(self.pool())
        .await?
        .ok_or_else(|| DatabaseError::NotFound("Work package".to_string()))
    }
}
