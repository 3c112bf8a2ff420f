use axum::{extract::Request, http::HeaderMap, middleware::Next, response::Response};
use uuid::Uuid;

use crate::auth::{validate_jwt, Claims};
use crate::error::ApiError;
use crate::types::Role;

/// Identity asserted by the JWT, not yet checked against the databases
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub employee_id: Uuid,
    pub company: String,
    pub database: String,
    pub role: Role,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            employee_id: claims.sub,
            company: claims.company,
            database: claims.database,
            role: claims.role,
        }
    }
}

/// JWT authentication middleware that validates tokens and extracts user context
pub async fn jwt_auth_middleware(headers: HeaderMap, mut request: Request, next: Next) -> Result<Response, ApiError> {
    let token = extract_jwt_from_headers(&headers).map_err(ApiError::unauthorized)?;
    let claims = validate_jwt(token)?;

    let auth_user = AuthUser::from(claims);
    tracing::debug!("JWT accepted for {} in {}", auth_user.employee_id, auth_user.company);
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<&str, &'static str> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or("Missing Authorization header")?;

    let auth_str = auth_header.to_str().map_err(|_| "Invalid Authorization header format")?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        Some(_) => Err("Empty JWT token"),
        None => Err("Authorization header must use Bearer token format"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(axum::http::header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_bearer_tokens() {
        assert_eq!(extract_jwt_from_headers(&headers("Bearer abc.def")), Ok("abc.def"));
        assert_eq!(extract_jwt_from_headers(&headers("Bearer  ")), Err("Empty JWT token"));
        assert!(extract_jwt_from_headers(&headers("Basic Zm9v")).is_err());
        assert_eq!(extract_jwt_from_headers(&HeaderMap::new()), Err("Missing Authorization header"));
    }
}
