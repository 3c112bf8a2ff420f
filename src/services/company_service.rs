use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use tracing::{info, warn};

use crate::calendar::FederalState;
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{Company, Employee};
use crate::database::repository::employees::NewEmployee;
use crate::database::Repository;
use crate::types::Role;

#[derive(Debug, thiserror::Error)]
pub enum CompanyError {
    #[error("Invalid company name: {0}")]
    InvalidName(String),
    #[error("Invalid company slug: {0}")]
    InvalidSlug(String),
    #[error("Company already exists: {0}")]
    AlreadyExists(String),
    #[error("Company not found: {0}")]
    NotFound(String),
    #[error("Template database missing: {0}")]
    TemplateMissing(String),
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<sqlx::Error> for CompanyError {
    fn from(err: sqlx::Error) -> Self {
        CompanyError::Database(err.into())
    }
}

/// Payload of `POST /auth/register` and `fz company create`
#[derive(Debug, Clone, Deserialize)]
pub struct NewCompany {
    pub name: String,
    /// Derived from the name when omitted
    #[serde(default)]
    pub slug: Option<String>,
    pub federal_state: FederalState,
    #[serde(default = "default_sme")]
    pub is_sme: bool,
    /// First company_admin; the role given here is ignored
    pub admin: NewEmployee,
}

fn default_sme() -> bool {
    true
}

#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub company: Company,
    pub admin: Employee,
}

pub struct CompanyService {
    main_pool: PgPool,
}

impl CompanyService {
    pub async fn new() -> Result<Self, CompanyError> {
        let main_pool = DatabaseManager::main_pool().await?;
        Ok(Self { main_pool })
    }

    /// Register a company: clone the template database, record it in the
    /// registry and create its first company_admin
    pub async fn register(&self, input: NewCompany) -> Result<Registration, CompanyError> {
        let name = input.name.trim().to_string();
        validate_name(&name)?;
        let slug = match input.slug.as_deref() {
            Some(slug) => slug.trim().to_string(),
            None => slugify(&name),
        };
        validate_slug(&slug)?;
        input.admin.validate()?;

        let database = database_name(&slug);

        if self.get_by_slug(&slug).await?.is_some() {
            return Err(CompanyError::AlreadyExists(slug));
        }
        if !DatabaseManager::database_exists(DatabaseManager::TEMPLATE_DB_NAME).await? {
            return Err(CompanyError::TemplateMissing(DatabaseManager::TEMPLATE_DB_NAME.to_string()));
        }

        DatabaseManager::clone_database(DatabaseManager::TEMPLATE_DB_NAME, &database).await?;

        let company = sqlx::query_as::<_, Company>(
            r#"
            INSERT INTO companies (name, slug, database, federal_state, is_sme)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&name)
        .bind(&slug)
        .bind(&database)
        .bind(input.federal_state)
        .bind(input.is_sme)
        .fetch_one(&self.main_pool)
        .await?;

        let pool = DatabaseManager::tenant_pool(&database).await?;
        let admin_input = NewEmployee { role: Role::CompanyAdmin, ..input.admin };
        let admin = match Repository::<Employee>::new(pool).create(&admin_input).await {
            Ok(admin) => admin,
            Err(e) => {
                warn!("Company {} registered without admin: {}", slug, e);
                return Err(e.into());
            }
        };

        info!("Registered company {} ({}) in {}", company.name, company.slug, company.database);
        Ok(Registration { company, admin })
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Company>, CompanyError> {
        Ok(sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE slug = $1 AND deleted_at IS NULL")
            .bind(slug)
            .fetch_optional(&self.main_pool)
            .await?)
    }

    pub async fn require(&self, slug: &str) -> Result<Company, CompanyError> {
        self.get_by_slug(slug)
            .await?
            .ok_or_else(|| CompanyError::NotFound(slug.to_string()))
    }

    /// Active company owning `database`; used to validate JWT claims
    pub async fn get_active_by_database(&self, database: &str) -> Result<Option<Company>, CompanyError> {
        Ok(sqlx::query_as::<_, Company>(
            "SELECT * FROM companies WHERE database = $1 AND is_active = true AND deleted_at IS NULL",
        )
        .bind(database)
        .fetch_optional(&self.main_pool)
        .await?)
    }

    pub async fn list(&self) -> Result<Vec<Company>, CompanyError> {
        Ok(sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE deleted_at IS NULL ORDER BY created_at DESC")
            .fetch_all(&self.main_pool)
            .await?)
    }

    /// Tokens of a deactivated company are rejected from then on
    pub async fn deactivate(&self, slug: &str) -> Result<Company, CompanyError> {
        let company = sqlx::query_as::<_, Company>(
            r#"
            UPDATE companies SET is_active = false, updated_at = now()
            WHERE slug = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.main_pool)
        .await?
        .ok_or_else(|| CompanyError::NotFound(slug.to_string()))?;

        info!("Deactivated company {}", company.slug);
        Ok(company)
    }
}

/// `tenant_` + first 16 hex digits of the slug's SHA-256
pub fn database_name(slug: &str) -> String {
    let hash = Sha256::digest(slug.as_bytes());
    let hex = format!("{:x}", hash);
    format!("tenant_{}", &hex[..16])
}

/// Lowercase ASCII slug: umlauts transliterated, runs of other characters become `-`
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.trim().to_lowercase().chars() {
        match c {
            'ä' => slug.push_str("ae"),
            'ö' => slug.push_str("oe"),
            'ü' => slug.push_str("ue"),
            'ß' => slug.push_str("ss"),
            c if c.is_ascii_alphanumeric() => slug.push(c),
            _ => {
                if !slug.is_empty() && !slug.ends_with('-') {
                    slug.push('-');
                }
            }
        }
    }
    slug.trim_end_matches('-').to_string()
}

fn validate_name(name: &str) -> Result<(), CompanyError> {
    let len = name.chars().count();
    if len < 2 {
        return Err(CompanyError::InvalidName("must be at least 2 characters".to_string()));
    }
    if len > 200 {
        return Err(CompanyError::InvalidName("must be at most 200 characters".to_string()));
    }
    Ok(())
}

fn validate_slug(slug: &str) -> Result<(), CompanyError> {
    if slug.len() < 2 || slug.len() > 63 {
        return Err(CompanyError::InvalidSlug("must be 2 to 63 characters".to_string()));
    }
    if !slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-') {
        return Err(CompanyError::InvalidSlug(
            "can only contain lowercase letters, digits and hyphens".to_string(),
        ));
    }
    if slug.starts_with('-') || slug.ends_with('-') {
        return Err(CompanyError::InvalidSlug("must not start or end with a hyphen".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_from_names() {
        assert_eq!(slugify("Müller & Söhne GmbH"), "mueller-soehne-gmbh");
        assert_eq!(slugify("  Straße 42 "), "strasse-42");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn database_names_are_stable_and_valid() {
        let a = database_name("muster-labs");
        assert_eq!(a, database_name("muster-labs"));
        assert_ne!(a, database_name("muster-labs-2"));
        assert!(a.starts_with("tenant_"));
        assert_eq!(a.len(), "tenant_".len() + 16);
        assert!(a["tenant_".len()..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn slug_rules() {
        assert!(validate_slug("muster-labs").is_ok());
        assert!(validate_slug("m").is_err());
        assert!(validate_slug("Muster").is_err());
        assert!(validate_slug("-muster").is_err());
        assert!(validate_name("A").is_err());
        assert!(validate_name("AB").is_ok());
    }

    #[test]
    fn registration_payload_defaults() {
        let input: NewCompany = serde_json::from_value(serde_json::json!({
            "name": "Muster Labs GmbH",
            "federal_state": "BY",
            "admin": {
                "first_name": "Erika",
                "last_name": "Mustermann",
                "email": "erika@muster-labs.example",
                "employment_start": "2020-01-01"
            }
        }))
        .unwrap();
        assert!(input.is_sme);
        assert_eq!(input.slug, None);
        assert_eq!(input.federal_state, FederalState::Bayern);
    }
}
