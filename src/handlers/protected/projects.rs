use axum::{extract::Path, Extension, Json};
use uuid::Uuid;

use crate::database::models::Project;
use crate::database::repository::projects::{NewProject, ProjectUpdate};
use crate::database::Repository;
use crate::middleware::{ApiResponse, ApiResult, TenantPool, ValidatedEmployee};
use crate::types::Role;

/// GET /api/projects
pub async fn list(Extension(TenantPool(pool)): Extension<TenantPool>) -> ApiResult<Vec<Project>> {
    Ok(ApiResponse::success(Repository::<Project>::new(pool).select_all().await?))
}

/// GET /api/projects/:id
pub async fn get(Path(id): Path<Uuid>, Extension(TenantPool(pool)): Extension<TenantPool>) -> ApiResult<Project> {
    Ok(ApiResponse::success(Repository::<Project>::new(pool).select_404(id).await?))
}

/// POST /api/projects - manager+
pub async fn create(
    Extension(TenantPool(pool)): Extension<TenantPool>,
    Extension(me): Extension<ValidatedEmployee>,
    Json(input): Json<NewProject>,
) -> ApiResult<Project> {
    me.require(Role::Manager)?;
    Ok(ApiResponse::created(Repository::<Project>::new(pool).create(&input).await?))
}

/// PATCH /api/projects/:id - manager+
pub async fn update(
    Path(id): Path<Uuid>,
    Extension(TenantPool(pool)): Extension<TenantPool>,
    Extension(me): Extension<ValidatedEmployee>,
    Json(update): Json<ProjectUpdate>,
) -> ApiResult<Project> {
    me.require(Role::Manager)?;
    let repo = Repository::<Project>::new(pool);
    let mut project = repo.select_404(id).await?;
    update.apply(&mut project);
    Ok(ApiResponse::success(repo.save(&project).await?))
}

/// DELETE /api/projects/:id - manager+
pub async fn delete(
    Path(id): Path<Uuid>,
    Extension(TenantPool(pool)): Extension<TenantPool>,
    Extension(me): Extension<ValidatedEmployee>,
) -> ApiResult<Project> {
    me.require(Role::Manager)?;
    Ok(ApiResponse::success(Repository::<Project>::new(pool).soft_delete(id).await?))
}
