use axum::{extract::Request, middleware::Next, response::Response};
use chrono::Utc;
use uuid::Uuid;

use super::auth::AuthUser;
use super::validate_company::TenantPool;
use crate::database::models::Employee;
use crate::database::Repository;
use crate::error::ApiError;
use crate::types::Role;

/// The requesting employee, loaded from the company database
#[derive(Clone, Debug)]
pub struct ValidatedEmployee(pub Employee);

impl ValidatedEmployee {
    pub fn id(&self) -> Uuid {
        self.0.id
    }

    pub fn role(&self) -> Role {
        self.0.role
    }

    pub fn require(&self, required: Role) -> Result<(), ApiError> {
        if self.0.role.at_least(required) {
            Ok(())
        } else {
            Err(ApiError::forbidden(format!("Requires role {} or higher", required)))
        }
    }

    /// Employees see their own rows; managers and admins see everyone's
    pub fn may_access(&self, employee_id: Uuid) -> bool {
        self.0.id == employee_id || self.0.role.at_least(Role::Manager)
    }

    pub fn require_access(&self, employee_id: Uuid) -> Result<(), ApiError> {
        if self.may_access(employee_id) {
            Ok(())
        } else {
            Err(ApiError::forbidden("Employees may only access their own records"))
        }
    }
}

/// Ensures the employee from the token still exists, is employed and holds
/// the role the token was issued for
pub async fn validate_employee_middleware(mut request: Request, next: Next) -> Result<Response, ApiError> {
    let auth_user = request
        .extensions()
        .get::<AuthUser>()
        .cloned()
        .ok_or_else(|| ApiError::unauthorized("JWT authentication required before employee validation"))?;

    let TenantPool(pool) = request
        .extensions()
        .get::<TenantPool>()
        .cloned()
        .ok_or_else(|| ApiError::internal_server_error("Company database required before employee validation"))?;

    let employee = Repository::<Employee>::new(pool)
        .select_one(auth_user.employee_id)
        .await?
        .ok_or_else(|| {
            tracing::warn!(
                "Employee validation failed: {} not found in '{}'",
                auth_user.employee_id,
                auth_user.company
            );
            ApiError::forbidden("Employee is not active in this company")
        })?;

    if employee.role != auth_user.role {
        tracing::warn!(
            "Employee validation failed: token role '{}' but database role '{}'",
            auth_user.role,
            employee.role
        );
        return Err(ApiError::forbidden("Role has changed, request a new token"));
    }

    let today = Utc::now().date_naive();
    if employee.employment_end.is_some_and(|end| end < today) {
        tracing::warn!("Employee validation failed: {} left the company", employee.id);
        return Err(ApiError::forbidden("Employment has ended"));
    }

    tracing::debug!("Employee validation successful: {} ({})", employee.full_name(), employee.role);

    request.extensions_mut().insert(ValidatedEmployee(employee));

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[test]
    fn role_checks() {
        let mut employee = fixtures::employee();
        let other = Uuid::new_v4();

        let me = ValidatedEmployee(employee.clone());
        assert!(me.may_access(employee.id));
        assert!(!me.may_access(other));
        assert_eq!(me.require(Role::Manager).unwrap_err().status_code(), 403);

        employee.role = Role::Manager;
        let manager = ValidatedEmployee(employee.clone());
        assert!(manager.may_access(other));
        assert!(manager.require(Role::Manager).is_ok());
        assert!(manager.require(Role::CompanyAdmin).is_err());

        employee.role = Role::CompanyAdmin;
        assert!(ValidatedEmployee(employee).require(Role::Manager).is_ok());
    }
}
