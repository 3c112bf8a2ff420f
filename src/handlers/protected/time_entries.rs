use axum::{
    extract::{Path, Query},
    Extension, Json,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{Employee, Project, TimeEntry, WorkPackage};
use crate::database::repository::members::MemberRepository;
use crate::database::repository::time_entries::{EntryFilter, NewTimeEntry, TimeEntryUpdate};
use crate::database::Repository;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, TenantPool, ValidatedEmployee};
use crate::timesheet::validate_entry;
use crate::types::Role;

/// Checks an entry against the employee's contract, the project period,
/// project membership and the work package's project
async fn check_entry(
    pool: &PgPool,
    employee_id: Uuid,
    project_id: Option<Uuid>,
    work_package_id: Option<Uuid>,
    entry_date: chrono::NaiveDate,
    hours: rust_decimal::Decimal,
) -> Result<(), ApiError> {
    let employee = Repository::<Employee>::new(pool.clone()).select_404(employee_id).await?;

    let project = match project_id {
        Some(id) => Some(Repository::<Project>::new(pool.clone()).select_404(id).await?),
        None => None,
    };
    let work_package = match work_package_id {
        Some(id) => Some(Repository::<WorkPackage>::new(pool.clone()).select_404(id).await?),
        None => None,
    };

    validate_entry(&employee, project.as_ref(), work_package.as_ref(), entry_date, hours)?;

    if let Some(project) = &project {
        if !MemberRepository::new(pool.clone()).is_member(project.id, employee_id).await? {
            return Err(ApiError::field(
                "project_id",
                format!("{} is not a member of project '{}'", employee.full_name(), project.name),
            ));
        }
    }
    Ok(())
}

/// GET /api/time-entries?employee_id&project_id&from&to
///
/// Employees only ever see their own entries.
pub async fn list(
    Query(mut filter): Query<EntryFilter>,
    Extension(TenantPool(pool)): Extension<TenantPool>,
    Extension(me): Extension<ValidatedEmployee>,
) -> ApiResult<Vec<TimeEntry>> {
    match filter.employee_id {
        Some(id) => me.require_access(id)?,
        None if !me.role().at_least(Role::Manager) => filter.employee_id = Some(me.id()),
        None => {}
    }
    let entries = Repository::<TimeEntry>::new(pool).select_filtered(&filter).await?;
    Ok(ApiResponse::success(entries))
}

/// GET /api/time-entries/:id
pub async fn get(
    Path(id): Path<Uuid>,
    Extension(TenantPool(pool)): Extension<TenantPool>,
    Extension(me): Extension<ValidatedEmployee>,
) -> ApiResult<TimeEntry> {
    let entry = Repository::<TimeEntry>::new(pool).select_404(id).await?;
    me.require_access(entry.employee_id)?;
    Ok(ApiResponse::success(entry))
}

/// POST /api/time-entries
pub async fn create(
    Extension(TenantPool(pool)): Extension<TenantPool>,
    Extension(me): Extension<ValidatedEmployee>,
    Json(input): Json<NewTimeEntry>,
) -> ApiResult<TimeEntry> {
    let employee_id = input.employee_id.unwrap_or(me.id());
    me.require_access(employee_id)?;

    check_entry(
        &pool,
        employee_id,
        input.project_id,
        input.work_package_id,
        input.entry_date,
        input.hours,
    )
    .await?;

    let entry = Repository::<TimeEntry>::new(pool).create(employee_id, &input).await?;
    tracing::debug!("Booked {} h on {} for {}", entry.hours, entry.entry_date, entry.employee_id);
    Ok(ApiResponse::created(entry))
}

/// PATCH /api/time-entries/:id
pub async fn update(
    Path(id): Path<Uuid>,
    Extension(TenantPool(pool)): Extension<TenantPool>,
    Extension(me): Extension<ValidatedEmployee>,
    Json(update): Json<TimeEntryUpdate>,
) -> ApiResult<TimeEntry> {
    let repo = Repository::<TimeEntry>::new(pool.clone());
    let mut entry = repo.select_404(id).await?;
    me.require_access(entry.employee_id)?;

    update.apply(&mut entry);
    check_entry(
        &pool,
        entry.employee_id,
        entry.project_id,
        entry.work_package_id,
        entry.entry_date,
        entry.hours,
    )
    .await?;

    Ok(ApiResponse::success(repo.save(&entry).await?))
}

/// DELETE /api/time-entries/:id
pub async fn delete(
    Path(id): Path<Uuid>,
    Extension(TenantPool(pool)): Extension<TenantPool>,
    Extension(me): Extension<ValidatedEmployee>,
) -> ApiResult<TimeEntry> {
    let repo = Repository::<TimeEntry>::new(pool);
    let entry = repo.select_404(id).await?;
    me.require_access(entry.employee_id)?;
    Ok(ApiResponse::success(repo.soft_delete(id).await?))
}
