use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;

use super::{nullable, require_text, Repository};
use crate::database::manager::DatabaseError;
use crate::database::models::Project;
use crate::types::FundingProgram;

#[derive(Debug, Clone, Deserialize)]
pub struct NewProject {
    pub name: String,
    pub funding_program: FundingProgram,
    #[serde(default)]
    pub funding_code: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectUpdate {
    pub name: Option<String>,
    pub funding_program: Option<FundingProgram>,
    #[serde(default, deserialize_with = "nullable")]
    pub funding_code: Option<Option<String>>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
}

impl ProjectUpdate {
    pub fn apply(self, project: &mut Project) {
        if let Some(v) = self.name {
            project.name = v;
        }
        if let Some(v) = self.funding_program {
            project.funding_program = v;
        }
        if let Some(v) = self.funding_code {
            project.funding_code = v;
        }
        if let Some(v) = self.start_date {
            project.start_date = v;
        }
        if let Some(v) = self.end_date {
            project.end_date = v;
        }
        if let Some(v) = self.description {
            project.description = v;
        }
    }
}

fn check(name: &str, start: NaiveDate, end: NaiveDate) -> Result<(), DatabaseError> {
    require_text("name", name)?;
    if end < start {
        return Err(DatabaseError::Invalid { field: "end_date", message: "must not be before start_date".to_string() });
    }
    Ok(())
}

impl Repository<Project> {
    pub async fn create(&self, input: &NewProject) -> Result<Project, DatabaseError> {
        check(&input.name, input.start_date, input.end_date)?;
        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (name, funding_program, funding_code, start_date, end_date, description)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(input.name.trim())
        .bind(input.funding_program)
        .bind(input.funding_code.as_deref().map(str::trim))
        .bind(input.start_date)
        .bind(input.end_date)
        .bind(&input.description)
        .fetch_one(self.pool())
        .await?;

        info!("Created project {} ({})", project.name, project.funding_program.label());
        Ok(project)
    }

    pub async fn save(&self, project: &Project) -> Result<Project, DatabaseError> {
        check(&project.name, project.start_date, project.end_date)?;
        sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects SET
                name = $2, funding_program = $3, funding_code = $4,
                start_date = $5, end_date = $6, description = $7, updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(project.id)
        .bind(project.name.trim())
        .bind(project.funding_program)
        .bind(project.funding_code.as_deref().map(str::trim))
        .bind(project.start_date)
        .bind(project.end_date)
        .bind(&project.description)
        .fetch_optional(self.pool())
        .await?
        .ok_or_else(|| DatabaseError::NotFound("Project".to_string()))
    }

    /// Projects with at least one of the employee's entries in `[from, to]`
    pub async fn select_booked_by(
        &self,
        employee_id: uuid::Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Project>, DatabaseError> {
        Ok(sqlx::query_as::<_, Project>(
            r#"
            SELECT p.* FROM projects p
            WHERE p.deleted_at IS NULL
            AND EXISTS (
                SELECT 1 FROM time_entries t
                WHERE t.project_id = p.id AND t.employee_id = $1
                AND t.entry_date BETWEEN $2 AND $3 AND t.deleted_at IS NULL
            )
            ORDER BY p.funding_code NULLS LAST, p.name
            "#,
        )
        .bind(employee_id)
        .bind(from)
        .bind(to)
        .fetch_all(self.pool())
        .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[test]
    fn update_can_clear_funding_code() {
        let mut project = fixtures::project(FundingProgram::Zim);
        let update: ProjectUpdate = serde_json::from_str(r#"{"funding_code": null, "name": "Neu"}"#).unwrap();
        update.apply(&mut project);
        assert_eq!(project.funding_code, None);
        assert_eq!(project.name, "Neu");
        assert_eq!(project.funding_program, FundingProgram::Zim);
    }

    #[test]
    fn period_must_be_ordered() {
        let start = fixtures::date(2024, 1, 1);
        assert!(check("P", start, start).is_ok());
        assert!(matches!(
            check("P", start, fixtures::date(2023, 12, 31)),
            Err(DatabaseError::Invalid { field: "end_date", .. })
        ));
        assert!(matches!(check(" ", start, start), Err(DatabaseError::Invalid { field: "name", .. })));
    }
}
