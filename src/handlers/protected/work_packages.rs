use axum::{extract::Path, Extension, Json};
use uuid::Uuid;

use crate::database::models::{Project, WorkPackage};
use crate::database::repository::work_packages::{NewWorkPackage, WorkPackageUpdate};
use crate::database::Repository;
use crate::middleware::{ApiResponse, ApiResult, TenantPool, ValidatedEmployee};
use crate::types::Role;

/// GET /api/projects/:id/work-packages
pub async fn list(
    Path(project_id): Path<Uuid>,
    Extension(TenantPool(pool)): Extension<TenantPool>,
) -> ApiResult<Vec<WorkPackage>> {
    Repository::<Project>::new(pool.clone()).select_404(project_id).await?;
    let packages = Repository::<WorkPackage>::new(pool).select_for_project(project_id).await?;
    Ok(ApiResponse::success(packages))
}

/// GET /api/projects/:id/work-packages/:wp_id
pub async fn get(
    Path((project_id, id)): Path<(Uuid, Uuid)>,
    Extension(TenantPool(pool)): Extension<TenantPool>,
) -> ApiResult<WorkPackage> {
    let wp = Repository::<WorkPackage>::new(pool).select_in_project(project_id, id).await?;
    Ok(ApiResponse::success(wp))
}

/// POST /api/projects/:id/work-packages - manager+
pub async fn create(
    Path(project_id): Path<Uuid>,
    Extension(TenantPool(pool)): Extension<TenantPool>,
    Extension(me): Extension<ValidatedEmployee>,
    Json(input): Json<NewWorkPackage>,
) -> ApiResult<WorkPackage> {
    me.require(Role::Manager)?;
    Repository::<Project>::new(pool.clone()).select_404(project_id).await?;
    let wp = Repository::<WorkPackage>::new(pool).create(project_id, &input).await?;
    Ok(ApiResponse::created(wp))
}

/// PATCH /api/projects/:id/work-packages/:wp_id - manager+
pub async fn update(
    Path((project_id, id)): Path<(Uuid, Uuid)>,
    Extension(TenantPool(pool)): Extension<TenantPool>,
    Extension(me): Extension<ValidatedEmployee>,
    Json(update): Json<WorkPackageUpdate>,
) -> ApiResult<WorkPackage> {
    me.require(Role::Manager)?;
    let repo = Repository::<WorkPackage>::new(pool);
    let mut wp = repo.select_in_project(project_id, id).await?;
    update.apply(&mut wp);
    Ok(ApiResponse::success(repo.save(&wp).await?))
}

/// DELETE /api/projects/:id/work-packages/:wp_id - manager+
pub async fn delete(
    Path((project_id, id)): Path<(Uuid, Uuid)>,
    Extension(TenantPool(pool)): Extension<TenantPool>,
    Extension(me): Extension<ValidatedEmployee>,
) -> ApiResult<WorkPackage> {
    me.require(Role::Manager)?;
    let repo = Repository::<WorkPackage>::new(pool);
    repo.select_in_project(project_id, id).await?;
    Ok(ApiResponse::success(repo.soft_delete(id).await?))
}
