//! HTTP routing: public calendar and registration endpoints plus the
//! authenticated `/api` tree.

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    middleware::from_fn,
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config;
use crate::handlers::{protected, public};
use crate::middleware::{jwt_auth_middleware, validate_company_middleware, validate_employee_middleware};

pub fn app() -> Router {
    let settings = config::config();

    let mut router = Router::new()
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .route("/holidays/:year", get(public::holidays_get))
        .route("/holidays/:year/:month/workdays", get(public::workdays_get))
        .route("/auth/register", post(public::register_post))
        .nest("/api", api_routes())
        .layer(DefaultBodyLimit::max(settings.api.max_request_size_bytes))
        .layer(TraceLayer::new_for_http());

    if settings.security.enable_cors {
        router = router.layer(cors_layer(&settings.security.cors_origins));
    }
    router
}

/// Everything under /api requires a token for an active company and employee.
/// Layers run outermost first: jwt -> company -> employee.
fn api_routes() -> Router {
    use protected::{absences, employees, members, projects, reports, time_entries, whoami, work_packages};

    Router::new()
        .route("/auth/whoami", get(whoami::whoami_get))
        // Employees
        .route("/employees", get(employees::list).post(employees::create))
        .route(
            "/employees/:id",
            get(employees::get).patch(employees::update).delete(employees::delete),
        )
        // Projects, work packages and members
        .route("/projects", get(projects::list).post(projects::create))
        .route(
            "/projects/:id",
            get(projects::get).patch(projects::update).delete(projects::delete),
        )
        .route(
            "/projects/:id/work-packages",
            get(work_packages::list).post(work_packages::create),
        )
        .route(
            "/projects/:id/work-packages/:wp_id",
            get(work_packages::get)
                .patch(work_packages::update)
                .delete(work_packages::delete),
        )
        .route("/projects/:id/members", get(members::list))
        .route(
            "/projects/:id/members/:employee_id",
            put(members::add).delete(members::remove),
        )
        // Bookings
        .route("/time-entries", get(time_entries::list).post(time_entries::create))
        .route(
            "/time-entries/:id",
            get(time_entries::get)
                .patch(time_entries::update)
                .delete(time_entries::delete),
        )
        .route("/absences", get(absences::list).post(absences::create))
        .route(
            "/absences/:id",
            get(absences::get).patch(absences::update).delete(absences::delete),
        )
        // Reports
        .route(
            "/reports/zim/:project_id/:employee_id/:year/:month",
            get(reports::zim),
        )
        .route("/reports/fzul/:employee_id/:year", get(reports::fzul))
        .route(
            "/reports/validation/:employee_id/:year/:month",
            get(reports::validation),
        )
        .route_layer(from_fn(validate_employee_middleware))
        .route_layer(from_fn(validate_company_middleware))
        .route_layer(from_fn(jwt_auth_middleware))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE])
        .allow_headers(Any);

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(allowed))
}
