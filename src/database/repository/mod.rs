//! Typed per-table access to a company database.
//!
//! `Repository<T>` carries the operations every soft-deletable table shares;
//! the submodules add inserts, updates and filtered listings per table.

pub mod absences;
pub mod employees;
pub mod members;
pub mod projects;
pub mod time_entries;
pub mod work_packages;

use serde::{Deserialize, Deserializer};
use sqlx::{postgres::PgRow, FromRow, PgPool};
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Absence, Employee, Project, TimeEntry, WorkPackage};

/// A soft-deletable table with a `uuid` primary key
pub trait Table {
    const TABLE: &'static str;
    /// Human-readable name for not-found messages
    const LABEL: &'static str;
    const ORDER_BY: &'static str;
}

impl Table for Employee {
    const TABLE: &'static str = "employees";
    const LABEL: &'static str = "Employee";
    const ORDER_BY: &'static str = "last_name, first_name";
}

impl Table for Project {
    const TABLE: &'static str = "projects";
    const LABEL: &'static str = "Project";
    const ORDER_BY: &'static str = "start_date, name";
}

impl Table for WorkPackage {
    const TABLE: &'static str = "work_packages";
    const LABEL: &'static str = "Work package";
    const ORDER_BY: &'static str = "code";
}

impl Table for TimeEntry {
    const TABLE: &'static str = "time_entries";
    const LABEL: &'static str = "Time entry";
    const ORDER_BY: &'static str = "entry_date, created_at";
}

impl Table for Absence {
    const TABLE: &'static str = "absences";
    const LABEL: &'static str = "Absence";
    const ORDER_BY: &'static str = "absence_date";
}

pub struct Repository<T> {
    pool: PgPool,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Repository<T>
where
    T: Table + for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _phantom: std::marker::PhantomData,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn select_all(&self) -> Result<Vec<T>, DatabaseError> {
        let sql = format!(
            "SELECT * FROM {} WHERE deleted_at IS NULL ORDER BY {}",
            T::TABLE,
            T::ORDER_BY
        );
        Ok(sqlx::query_as::<_, T>(&sql).fetch_all(&self.pool).await?)
    }

    pub async fn select_one(&self, id: Uuid) -> Result<Option<T>, DatabaseError> {
        let sql = format!("SELECT * FROM {} WHERE id = $1 AND deleted_at IS NULL", T::TABLE);
        Ok(sqlx::query_as::<_, T>(&sql).bind(id).fetch_optional(&self.pool).await?)
    }

    pub async fn select_404(&self, id: Uuid) -> Result<T, DatabaseError> {
        self.select_one(id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(T::LABEL.to_string()))
    }

    /// Marks the row deleted; reports keep ignoring it from then on
    pub async fn soft_delete(&self, id: Uuid) -> Result<T, DatabaseError> {
        let sql = format!(
            "UPDATE {} SET deleted_at = now(), updated_at = now() \
             WHERE id = $1 AND deleted_at IS NULL RETURNING *",
            T::TABLE
        );
        sqlx::query_as::<_, T>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(T::LABEL.to_string()))
    }
}

/// For update payloads: a missing field is `None`, an explicit `null` is `Some(None)`
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), DatabaseError> {
    if value.trim().is_empty() {
        return Err(DatabaseError::Invalid { field, message: "must not be empty".to_string() });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "nullable")]
        note: Option<Option<String>>,
    }

    #[test]
    fn nullable_distinguishes_missing_from_null() {
        let missing: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(missing.note, None);
        let cleared: Patch = serde_json::from_str(r#"{"note": null}"#).unwrap();
        assert_eq!(cleared.note, Some(None));
        let set: Patch = serde_json::from_str(r#"{"note": "x"}"#).unwrap();
        assert_eq!(set.note, Some(Some("x".to_string())));
    }

    #[test]
    fn blank_text_is_invalid() {
        assert!(require_text("name", "  ").is_err());
        assert!(require_text("name", "Projekt").is_ok());
    }
}
