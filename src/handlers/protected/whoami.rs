use axum::Extension;
use serde::Serialize;

use crate::database::models::{Company, Employee};
use crate::middleware::{ApiResponse, ApiResult, ValidatedCompany, ValidatedEmployee};

#[derive(Debug, Serialize)]
pub struct WhoAmI {
    pub employee: Employee,
    pub company: Company,
}

/// GET /api/auth/whoami
pub async fn whoami_get(
    Extension(ValidatedCompany(company)): Extension<ValidatedCompany>,
    Extension(ValidatedEmployee(employee)): Extension<ValidatedEmployee>,
) -> ApiResult<WhoAmI> {
    Ok(ApiResponse::success(WhoAmI { employee, company }))
}
