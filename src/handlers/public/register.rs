use axum::Json;
use serde::Serialize;

use crate::auth::{generate_jwt, Claims};
use crate::database::models::{Company, Employee};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::company_service::{CompanyService, NewCompany, Registration};

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub company: Company,
    pub admin: Employee,
    /// Bearer token for the new company_admin
    pub token: String,
}

/// POST /auth/register - create a company with its first company_admin
pub async fn register_post(Json(input): Json<NewCompany>) -> ApiResult<RegisterResponse> {
    let service = CompanyService::new().await?;
    let Registration { company, admin } = service.register(input).await?;

    let claims = Claims::new(admin.id, company.slug.clone(), company.database.clone(), admin.role);
    let token = generate_jwt(&claims)?;

    Ok(ApiResponse::created(RegisterResponse { company, admin, token }))
}
