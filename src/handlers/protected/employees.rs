use axum::{extract::Path, Extension, Json};
use uuid::Uuid;

use crate::database::models::Employee;
use crate::database::repository::employees::{EmployeeUpdate, NewEmployee};
use crate::database::Repository;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, TenantPool, ValidatedEmployee};
use crate::types::Role;

/// GET /api/employees - manager+
pub async fn list(
    Extension(TenantPool(pool)): Extension<TenantPool>,
    Extension(me): Extension<ValidatedEmployee>,
) -> ApiResult<Vec<Employee>> {
    me.require(Role::Manager)?;
    Ok(ApiResponse::success(Repository::<Employee>::new(pool).select_all().await?))
}

/// GET /api/employees/:id - manager+, or the employee themself
pub async fn get(
    Path(id): Path<Uuid>,
    Extension(TenantPool(pool)): Extension<TenantPool>,
    Extension(me): Extension<ValidatedEmployee>,
) -> ApiResult<Employee> {
    me.require_access(id)?;
    Ok(ApiResponse::success(Repository::<Employee>::new(pool).select_404(id).await?))
}

/// POST /api/employees - company_admin
pub async fn create(
    Extension(TenantPool(pool)): Extension<TenantPool>,
    Extension(me): Extension<ValidatedEmployee>,
    Json(input): Json<NewEmployee>,
) -> ApiResult<Employee> {
    me.require(Role::CompanyAdmin)?;
    let employee = Repository::<Employee>::new(pool).create(&input).await?;
    Ok(ApiResponse::created(employee))
}

/// PATCH /api/employees/:id - company_admin
pub async fn update(
    Path(id): Path<Uuid>,
    Extension(TenantPool(pool)): Extension<TenantPool>,
    Extension(me): Extension<ValidatedEmployee>,
    Json(update): Json<EmployeeUpdate>,
) -> ApiResult<Employee> {
    me.require(Role::CompanyAdmin)?;
    let repo = Repository::<Employee>::new(pool);
    let mut employee = repo.select_404(id).await?;

    let demotes_admin = employee.role == Role::CompanyAdmin && update.role.is_some_and(|r| r != Role::CompanyAdmin);
    if demotes_admin && repo.count_admins_except(id).await? == 0 {
        return Err(ApiError::conflict("The last company_admin cannot be demoted"));
    }

    update.apply(&mut employee);
    Ok(ApiResponse::success(repo.save(&employee).await?))
}

/// DELETE /api/employees/:id - company_admin; entries stay for past reports
pub async fn delete(
    Path(id): Path<Uuid>,
    Extension(TenantPool(pool)): Extension<TenantPool>,
    Extension(me): Extension<ValidatedEmployee>,
) -> ApiResult<Employee> {
    me.require(Role::CompanyAdmin)?;
    if id == me.id() {
        return Err(ApiError::conflict("Employees cannot delete themselves"));
    }
    let repo = Repository::<Employee>::new(pool);
    let employee = repo.select_404(id).await?;
    if employee.role == Role::CompanyAdmin && repo.count_admins_except(id).await? == 0 {
        return Err(ApiError::conflict("The last company_admin cannot be deleted"));
    }
    Ok(ApiResponse::success(repo.soft_delete(id).await?))
}
