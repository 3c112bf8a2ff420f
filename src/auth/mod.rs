use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config;
use crate::types::Role;

/// Token payload. There is no login flow: tokens are issued at company
/// registration and by `fz token issue`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Employee id
    pub sub: Uuid,
    /// Company slug
    pub company: String,
    /// Company database, checked against the registry on every request
    pub database: String,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(employee_id: Uuid, company: String, database: String, role: Role) -> Self {
        let now = Utc::now();
        let expiry_hours = config::config().security.jwt_expiry_hours;
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            sub: employee_id,
            company,
            database,
            role,
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT secret not configured")]
    MissingSecret,

    #[error("JWT generation error: {0}")]
    Encode(jsonwebtoken::errors::Error),

    #[error("{0}")]
    Invalid(jsonwebtoken::errors::Error),
}

fn secret() -> Result<&'static [u8], JwtError> {
    let secret = &config::config().security.jwt_secret;
    if secret.is_empty() {
        return Err(JwtError::MissingSecret);
    }
    Ok(secret.as_bytes())
}

pub fn generate_jwt(claims: &Claims) -> Result<String, JwtError> {
    let encoding_key = EncodingKey::from_secret(secret()?);
    encode(&Header::default(), claims, &encoding_key).map_err(JwtError::Encode)
}

pub fn validate_jwt(token: &str) -> Result<Claims, JwtError> {
    let decoding_key = DecodingKey::from_secret(secret()?);
    let token_data =
        decode::<Claims>(token, &decoding_key, &Validation::default()).map_err(JwtError::Invalid)?;
    Ok(token_data.claims)
}
