use axum::{extract::Path, Extension};
use uuid::Uuid;

use crate::database::models::{Employee, Project, ProjectMember};
use crate::database::repository::members::MemberRepository;
use crate::database::Repository;
use crate::middleware::{ApiResponse, ApiResult, TenantPool, ValidatedEmployee};
use crate::types::Role;

/// GET /api/projects/:id/members
pub async fn list(
    Path(project_id): Path<Uuid>,
    Extension(TenantPool(pool)): Extension<TenantPool>,
) -> ApiResult<Vec<Employee>> {
    Repository::<Project>::new(pool.clone()).select_404(project_id).await?;
    Ok(ApiResponse::success(MemberRepository::new(pool).select_employees(project_id).await?))
}

/// PUT /api/projects/:id/members/:employee_id - manager+
pub async fn add(
    Path((project_id, employee_id)): Path<(Uuid, Uuid)>,
    Extension(TenantPool(pool)): Extension<TenantPool>,
    Extension(me): Extension<ValidatedEmployee>,
) -> ApiResult<ProjectMember> {
    me.require(Role::Manager)?;
    Repository::<Project>::new(pool.clone()).select_404(project_id).await?;
    Repository::<Employee>::new(pool.clone()).select_404(employee_id).await?;
    let member = MemberRepository::new(pool).add(project_id, employee_id).await?;
    Ok(ApiResponse::success(member))
}

/// DELETE /api/projects/:id/members/:employee_id - manager+
pub async fn remove(
    Path((project_id, employee_id)): Path<(Uuid, Uuid)>,
    Extension(TenantPool(pool)): Extension<TenantPool>,
    Extension(me): Extension<ValidatedEmployee>,
) -> ApiResult<()> {
    me.require(Role::Manager)?;
    MemberRepository::new(pool).remove(project_id, employee_id).await?;
    Ok(ApiResponse::success(()))
}
