use axum::{
    extract::{Path, Query},
    Extension,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, TenantPool, ValidatedCompany, ValidatedEmployee};
use crate::render::{ExportFormat, Rendered};
use crate::services::ReportService;
use crate::timesheet::Finding;
use crate::types::Role;

#[derive(Debug, Default, Deserialize)]
pub struct FormatQuery {
    pub format: Option<String>,
}

impl FormatQuery {
    fn parse(&self) -> Result<ExportFormat, ApiError> {
        match &self.format {
            Some(s) => s.parse().map_err(|e: String| ApiError::field("format", e)),
            None => Ok(ExportFormat::default()),
        }
    }
}

/// Salary data is only shown to managers and admins
fn shows_costs(role: Role) -> bool {
    role.at_least(Role::Manager)
}

/// GET /api/reports/zim/:project_id/:employee_id/:year/:month?format=pdf|xlsx|json
///
/// The personnel cost line is only printed for managers and admins.
pub async fn zim(
    Path((project_id, employee_id, year, month)): Path<(Uuid, Uuid, i32, u32)>,
    Query(query): Query<FormatQuery>,
    Extension(TenantPool(pool)): Extension<TenantPool>,
    Extension(ValidatedCompany(company)): Extension<ValidatedCompany>,
    Extension(me): Extension<ValidatedEmployee>,
) -> Result<Rendered, ApiError> {
    me.require_access(employee_id)?;
    let format = query.parse()?;
    let with_costs = shows_costs(me.role());

    let rendered = ReportService::new(pool, &company)
        .zim_export(project_id, employee_id, year, month, with_costs, format)
        .await?;
    tracing::info!("ZIM export {} ({} bytes) for {}", rendered.file_name, rendered.bytes.len(), me.id());
    Ok(rendered)
}

/// GET /api/reports/fzul/:employee_id/:year?format=pdf|xlsx|json - manager+
pub async fn fzul(
    Path((employee_id, year)): Path<(Uuid, i32)>,
    Query(query): Query<FormatQuery>,
    Extension(TenantPool(pool)): Extension<TenantPool>,
    Extension(ValidatedCompany(company)): Extension<ValidatedCompany>,
    Extension(me): Extension<ValidatedEmployee>,
) -> Result<Rendered, ApiError> {
    me.require(Role::Manager)?;
    let format = query.parse()?;

    let rendered = ReportService::new(pool, &company).fzul_export(employee_id, year, format).await?;
    tracing::info!("FZul export {} ({} bytes) for {}", rendered.file_name, rendered.bytes.len(), me.id());
    Ok(rendered)
}

/// GET /api/reports/validation/:employee_id/:year/:month
pub async fn validation(
    Path((employee_id, year, month)): Path<(Uuid, i32, u32)>,
    Extension(TenantPool(pool)): Extension<TenantPool>,
    Extension(ValidatedCompany(company)): Extension<ValidatedCompany>,
    Extension(me): Extension<ValidatedEmployee>,
) -> ApiResult<Vec<Finding>> {
    me.require_access(employee_id)?;
    let findings = ReportService::new(pool, &company).validation(employee_id, year, month).await?;
    Ok(ApiResponse::success(findings))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_defaults_to_pdf() {
        assert_eq!(FormatQuery::default().parse().unwrap(), ExportFormat::Pdf);
    }

    #[test]
    fn format_is_case_insensitive() {
        let query = FormatQuery { format: Some("XLSX".to_string()) };
        assert_eq!(query.parse().unwrap(), ExportFormat::Xlsx);
    }

    #[test]
    fn unknown_format_is_a_field_error() {
        let query = FormatQuery { format: Some("docx".to_string()) };
        let err = query.parse().unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert!(err.to_json()["field_errors"]["format"].is_string());
    }

    #[test]
    fn cost_line_is_hidden_from_employees() {
        assert!(!shows_costs(Role::Employee));
        assert!(shows_costs(Role::Manager));
        assert!(shows_costs(Role::CompanyAdmin));
    }
}
