// handlers/public/mod.rs - Public handlers (no authentication required)

pub mod calendar;
pub mod register;

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::database::DatabaseManager;
use crate::middleware::ApiResponse;

pub use calendar::{holidays_get, workdays_get};
pub use register::register_post;

/// GET / - service description
pub async fn root() -> ApiResponse<serde_json::Value> {
    ApiResponse::success(json!({
        "name": "foerderzeit",
        "version": env!("CARGO_PKG_VERSION"),
        "description": env!("CARGO_PKG_DESCRIPTION"),
        "endpoints": {
            "health": "/health (public)",
            "holidays": "/holidays/:year?state=XX, /holidays/:year/:month/workdays?state=XX (public)",
            "register": "/auth/register (public - company registration)",
            "auth": "/api/auth/whoami (protected)",
            "employees": "/api/employees[/:id] (protected)",
            "projects": "/api/projects[/:id[/work-packages|/members]] (protected)",
            "time_entries": "/api/time-entries[/:id] (protected)",
            "absences": "/api/absences[/:id] (protected)",
            "reports": "/api/reports/zim|fzul|validation/... (protected)",
        }
    }))
}

/// GET /health - database connectivity
pub async fn health() -> impl IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": { "status": "ok", "timestamp": now, "database": "ok" }
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "code": "SERVICE_UNAVAILABLE",
                    "data": { "status": "degraded", "timestamp": now }
                })),
            )
        }
    }
}
