use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Employee, ProjectMember};

/// Employees assigned to a project. Plain join table, no soft delete.
pub struct MemberRepository {
    pool: PgPool,
}

impl MemberRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn select_employees(&self, project_id: Uuid) -> Result<Vec<Employee>, DatabaseError> {
        Ok(sqlx::query_as::<_, Employee>(
            r#"
            SELECT e.* FROM employees e
            JOIN project_members m ON m.employee_id = e.id
            WHERE m.project_id = $1 AND e.deleted_at IS NULL
            ORDER BY e.last_name, e.first_name
            "#,
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?)
    }

    pub async fn is_member(&self, project_id: Uuid, employee_id: Uuid) -> Result<bool, DatabaseError> {
        let row: Option<(i32,)> =
            sqlx::query_as("SELECT 1 FROM project_members WHERE project_id = $1 AND employee_id = $2")
                .bind(project_id)
                .bind(employee_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.is_some())
    }

    /// Idempotent: adding an existing member returns the existing row
    pub async fn add(&self, project_id: Uuid, employee_id: Uuid) -> Result<ProjectMember, DatabaseError> {
        Ok(sqlx::query_as::<_, ProjectMember>(
            r#"
            INSERT INTO project_members (project_id, employee_id)
            VALUES ($1, $2)
            ON CONFLICT (project_id, employee_id) DO UPDATE SET project_id = EXCLUDED.project_id
            RETURNING *
            "#,
        )
        .bind(project_id)
        .bind(employee_id)
        .fetch_one(&self.pool)
        .await?)
    }

    pub async fn remove(&self, project_id: Uuid, employee_id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM project_members WHERE project_id = $1 AND employee_id = $2")
            .bind(project_id)
            .bind(employee_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Project member".to_string()));
        }
        Ok(())
    }
}
