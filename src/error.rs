// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::auth::JwtError;
use crate::calendar::CalendarError;
use crate::database::DatabaseError;
use crate::funding::FundingError;
use crate::render::RenderError;
use crate::report::ReportError;
use crate::services::company_service::CompanyError;
use crate::timesheet::TimesheetError;

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    ValidationError {
        message: String,
        field_errors: Option<HashMap<String, String>>,
    },

    // 401 Unauthorized
    Unauthorized(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict
    Conflict(String),

    // 422 Unprocessable Entity (well-formed but violates a business rule)
    UnprocessableEntity {
        message: String,
        field_errors: HashMap<String, String>,
    },

    // 500 Internal Server Error
    InternalServerError(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::ValidationError { .. } => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::Forbidden(_) => 403,
            ApiError::NotFound(_) => 404,
            ApiError::Conflict(_) => 409,
            ApiError::UnprocessableEntity { .. } => 422,
            ApiError::InternalServerError(_) => 500,
            ApiError::ServiceUnavailable(_) => 503,
        }
    }

    /// Client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::ValidationError { message, .. } => message,
            ApiError::Unauthorized(msg) => msg,
            ApiError::Forbidden(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::Conflict(msg) => msg,
            ApiError::UnprocessableEntity { message, .. } => message,
            ApiError::InternalServerError(msg) => msg,
            ApiError::ServiceUnavailable(msg) => msg,
        }
    }

    pub fn to_json(&self) -> Value {
        let mut response = json!({
            "success": false,
            "error": self.message(),
            "code": self.error_code()
        });

        match self {
            ApiError::ValidationError { field_errors: Some(field_errors), .. }
            | ApiError::UnprocessableEntity { field_errors, .. } => {
                response["field_errors"] = json!(field_errors);
            }
            _ => {}
        }

        response
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::ValidationError { .. } => "VALIDATION_ERROR",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::UnprocessableEntity { .. } => "UNPROCESSABLE_ENTITY",
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
            ApiError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn validation_error(message: impl Into<String>, field_errors: Option<HashMap<String, String>>) -> Self {
        ApiError::ValidationError {
            message: message.into(),
            field_errors,
        }
    }

    /// Validation error for a single field
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        let mut field_errors = HashMap::new();
        field_errors.insert(field.to_string(), message.clone());
        ApiError::validation_error(message, Some(field_errors))
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn unprocessable_entity(message: impl Into<String>, field_errors: HashMap<String, String>) -> Self {
        ApiError::UnprocessableEntity {
            message: message.into(),
            field_errors,
        }
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

// Convert other error types to ApiError
impl From<CalendarError> for ApiError {
    fn from(err: CalendarError) -> Self {
        match err {
            CalendarError::YearOutOfRange(_) => ApiError::field("year", err.to_string()),
            CalendarError::InvalidMonth(_) => ApiError::field("month", err.to_string()),
            CalendarError::UnknownState(_) => ApiError::field("state", err.to_string()),
            CalendarError::InvalidRange { .. } => ApiError::bad_request(err.to_string()),
        }
    }
}

impl From<TimesheetError> for ApiError {
    fn from(err: TimesheetError) -> Self {
        let field = match &err {
            TimesheetError::Calendar(e) => return e.clone().into(),
            TimesheetError::InvalidHours(_) | TimesheetError::TooPrecise(_) => "hours",
            TimesheetError::OutsideProjectPeriod { .. } | TimesheetError::OutsideEmployment(_) => "entry_date",
            TimesheetError::WorkPackageMismatch { .. } | TimesheetError::WorkPackageWithoutProject => {
                "work_package_id"
            }
        };
        let mut field_errors = HashMap::new();
        field_errors.insert(field.to_string(), err.to_string());
        ApiError::unprocessable_entity(err.to_string(), field_errors)
    }
}

impl From<FundingError> for ApiError {
    fn from(err: FundingError) -> Self {
        match err {
            FundingError::Calendar(e) => e.into(),
        }
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound(what) => ApiError::not_found(format!("{} not found", what)),
            DatabaseError::Conflict(msg) => ApiError::conflict(msg),
            DatabaseError::Invalid { field, message } => ApiError::field(field, message),
            DatabaseError::InvalidDatabaseName(name) => {
                tracing::error!("Refused database name: {}", name);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
            DatabaseError::ConfigMissing(_) | DatabaseError::InvalidDatabaseUrl => {
                tracing::error!("Database configuration error: {}", err);
                ApiError::service_unavailable("Database temporarily unavailable")
            }
            DatabaseError::Sqlx(sqlx_err) => match sqlx_err {
                sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) | sqlx::Error::PoolClosed => {
                    tracing::error!("Database connection error: {}", sqlx_err);
                    ApiError::service_unavailable("Database temporarily unavailable")
                }
                other => {
                    // Log the real error but return generic message
                    tracing::error!("SQLx error: {}", other);
                    ApiError::internal_server_error("Database error occurred")
                }
            },
        }
    }
}

impl From<CompanyError> for ApiError {
    fn from(err: CompanyError) -> Self {
        match err {
            CompanyError::InvalidName(msg) => ApiError::field("name", msg),
            CompanyError::InvalidSlug(msg) => ApiError::field("slug", msg),
            CompanyError::AlreadyExists(slug) => ApiError::conflict(format!("Company '{}' already exists", slug)),
            CompanyError::NotFound(slug) => ApiError::not_found(format!("Company '{}' not found", slug)),
            CompanyError::TemplateMissing(template) => {
                tracing::error!("Template database {} is missing", template);
                ApiError::service_unavailable("Company registration is not available")
            }
            CompanyError::Database(e) => e.into(),
        }
    }
}

impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::Calendar(e) => e.into(),
            ReportError::Timesheet(e) => e.into(),
            ReportError::Funding(e) => e.into(),
            ReportError::Database(e) => e.into(),
            ReportError::Render(e) => e.into(),
            ReportError::WrongProgram { .. } => ApiError::bad_request(err.to_string()),
            ReportError::NotFound(_) => ApiError::not_found(err.to_string()),
            ReportError::NothingToReport(_) => ApiError::not_found(err.to_string()),
        }
    }
}

impl From<RenderError> for ApiError {
    fn from(err: RenderError) -> Self {
        tracing::error!("Report rendering failed: {}", err);
        ApiError::internal_server_error("Failed to render report")
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::MissingSecret => {
                tracing::error!("JWT secret is not configured");
                ApiError::internal_server_error("Token service unavailable")
            }
            JwtError::Encode(e) => {
                tracing::error!("JWT generation failed: {}", e);
                ApiError::internal_server_error("Token service unavailable")
            }
            JwtError::Invalid(e) => ApiError::unauthorized(format!("Invalid JWT token: {}", e)),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_client_error() {
            tracing::warn!("{} {}", self.error_code(), self.message());
        }
        (status, Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    #[test]
    fn json_envelope_carries_code_and_fields() {
        let err = ApiError::field("hours", "Hours must be positive");
        assert_eq!(err.status_code(), 400);
        let body = err.to_json();
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["field_errors"]["hours"], "Hours must be positive");

        let body = ApiError::not_found("Employee not found").to_json();
        assert_eq!(body["error"], "Employee not found");
        assert!(body.get("field_errors").is_none());
    }

    #[test]
    fn timesheet_errors_map_to_fields() {
        let err: ApiError = TimesheetError::InvalidHours(Decimal::from(25)).into();
        assert_eq!(err.status_code(), 422);
        assert!(err.to_json()["field_errors"]["hours"].is_string());

        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let err: ApiError = TimesheetError::OutsideEmployment(date).into();
        assert!(err.to_json()["field_errors"]["entry_date"].is_string());
    }

    #[test]
    fn internal_details_are_hidden() {
        let err: ApiError = DatabaseError::Sqlx(sqlx::Error::RowNotFound).into();
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.message(), "Database error occurred");

        let err: ApiError = DatabaseError::NotFound("Project".into()).into();
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.message(), "Project not found");
    }

    #[test]
    fn calendar_errors_are_client_errors() {
        let err: ApiError = CalendarError::UnknownState("XX".into()).into();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.to_json()["field_errors"]["state"], "Unknown federal state: XX");
    }
}
