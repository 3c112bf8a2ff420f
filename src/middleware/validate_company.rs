use axum::{extract::Request, middleware::Next, response::Response};
use sqlx::PgPool;

use super::auth::AuthUser;
use crate::database::manager::DatabaseManager;
use crate::database::models::Company;
use crate::error::ApiError;
use crate::services::CompanyService;

/// Company database pool, injected by middleware
#[derive(Clone)]
pub struct TenantPool(pub PgPool);

/// Active company from the registry matching the JWT claims
#[derive(Clone, Debug)]
pub struct ValidatedCompany(pub Company);

/// Ensures the company named in the token exists, is active and owns the
/// claimed database
pub async fn validate_company_middleware(mut request: Request, next: Next) -> Result<Response, ApiError> {
    let auth_user = request
        .extensions()
        .get::<AuthUser>()
        .cloned()
        .ok_or_else(|| ApiError::unauthorized("JWT authentication required before company validation"))?;

    let company = CompanyService::new()
        .await?
        .get_active_by_database(&auth_user.database)
        .await?
        .filter(|company| company.slug == auth_user.company)
        .ok_or_else(|| {
            tracing::warn!("Company validation failed: '{}' not found or inactive", auth_user.company);
            ApiError::forbidden(format!("Company '{}' is not active or does not exist", auth_user.company))
        })?;

    let tenant_pool = DatabaseManager::tenant_pool(&company.database).await.map_err(|e| {
        tracing::error!("Failed to get database pool for company '{}': {}", company.slug, e);
        ApiError::from(e)
    })?;

    tracing::debug!("Company validation successful: {} ({})", company.name, company.database);

    request.extensions_mut().insert(ValidatedCompany(company));
    request.extensions_mut().insert(TenantPool(tenant_pool));

    Ok(next.run(request).await)
}
