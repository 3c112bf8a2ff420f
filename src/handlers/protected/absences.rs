use axum::{
    extract::{Path, Query},
    Extension, Json,
};
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{Absence, Employee};
use crate::database::repository::absences::{AbsenceFilter, AbsenceUpdate, NewAbsence};
use crate::database::Repository;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, TenantPool, ValidatedEmployee};
use crate::types::Role;

async fn check_employed(pool: &PgPool, employee_id: Uuid, date: NaiveDate) -> Result<(), ApiError> {
    let employee = Repository::<Employee>::new(pool.clone()).select_404(employee_id).await?;
    if !employee.is_employed_on(date) {
        return Err(ApiError::field(
            "absence_date",
            format!("{} is outside the employment of {}", date, employee.full_name()),
        ));
    }
    Ok(())
}

/// GET /api/absences?employee_id&from&to
pub async fn list(
    Query(mut filter): Query<AbsenceFilter>,
    Extension(TenantPool(pool)): Extension<TenantPool>,
    Extension(me): Extension<ValidatedEmployee>,
) -> ApiResult<Vec<Absence>> {
    match filter.employee_id {
        Some(id) => me.require_access(id)?,
        None if !me.role().at_least(Role::Manager) => filter.employee_id = Some(me.id()),
        None => {}
    }
    let absences = Repository::<Absence>::new(pool).select_filtered(&filter).await?;
    Ok(ApiResponse::success(absences))
}

/// GET /api/absences/:id
pub async fn get(
    Path(id): Path<Uuid>,
    Extension(TenantPool(pool)): Extension<TenantPool>,
    Extension(me): Extension<ValidatedEmployee>,
) -> ApiResult<Absence> {
    let absence = Repository::<Absence>::new(pool).select_404(id).await?;
    me.require_access(absence.employee_id)?;
    Ok(ApiResponse::success(absence))
}

/// POST /api/absences
pub async fn create(
    Extension(TenantPool(pool)): Extension<TenantPool>,
    Extension(me): Extension<ValidatedEmployee>,
    Json(input): Json<NewAbsence>,
) -> ApiResult<Absence> {
    let employee_id = input.employee_id.unwrap_or(me.id());
    me.require_access(employee_id)?;
    check_employed(&pool, employee_id, input.absence_date).await?;

    let absence = Repository::<Absence>::new(pool).create(employee_id, &input).await?;
    Ok(ApiResponse::created(absence))
}

/// PATCH /api/absences/:id
pub async fn update(
    Path(id): Path<Uuid>,
    Extension(TenantPool(pool)): Extension<TenantPool>,
    Extension(me): Extension<ValidatedEmployee>,
    Json(update): Json<AbsenceUpdate>,
) -> ApiResult<Absence> {
    let repo = Repository::<Absence>::new(pool.clone());
    let mut absence = repo.select_404(id).await?;
    me.require_access(absence.employee_id)?;

    update.apply(&mut absence);
    check_employed(&pool, absence.employee_id, absence.absence_date).await?;
    Ok(ApiResponse::success(repo.save(&absence).await?))
}

/// DELETE /api/absences/:id
pub async fn delete(
    Path(id): Path<Uuid>,
    Extension(TenantPool(pool)): Extension<TenantPool>,
    Extension(me): Extension<ValidatedEmployee>,
) -> ApiResult<Absence> {
    let repo = Repository::<Absence>::new(pool);
    let absence = repo.select_404(id).await?;
    me.require_access(absence.employee_id)?;
    Ok(ApiResponse::success(repo.soft_delete(id).await?))
}
