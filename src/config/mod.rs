use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::env;

use crate::calendar::FederalState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    /// Seconds to wait for a pooled connection
    pub connection_timeout: u64,
    pub enable_query_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
    pub enable_request_logging: bool,
    pub max_request_size_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Daily maximum under the Arbeitszeitgesetz; more is flagged
    pub max_daily_hours: Decimal,
    /// Holiday calendar used when a request names no state
    pub default_state: FederalState,
    /// ZIM overhead flat rate on personnel costs (1 = 100 %)
    pub zim_overhead_rate: Decimal,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Database overrides
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }
        if let Ok(v) = env::var("DATABASE_ENABLE_QUERY_LOGGING") {
            self.database.enable_query_logging = v.parse().unwrap_or(self.database.enable_query_logging);
        }

        // API overrides
        if let Ok(v) = env::var("API_PORT") {
            self.api.port = v.parse().unwrap_or(self.api.port);
        }
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }
        if let Ok(v) = env::var("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = v.parse().unwrap_or(self.api.max_request_size_bytes);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Ok(v) = env::var("SECURITY_JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("SECURITY_JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }

        // Report overrides
        if let Ok(v) = env::var("REPORT_MAX_DAILY_HOURS") {
            self.report.max_daily_hours = v.parse().unwrap_or(self.report.max_daily_hours);
        }
        if let Ok(v) = env::var("REPORT_DEFAULT_STATE") {
            self.report.default_state = v.parse().unwrap_or(self.report.default_state);
        }
        if let Ok(v) = env::var("REPORT_ZIM_OVERHEAD_RATE") {
            self.report.zim_overhead_rate = v.parse().unwrap_or(self.report.zim_overhead_rate);
        }

        self
    }

    fn report_defaults() -> ReportConfig {
        ReportConfig {
            max_daily_hours: Decimal::from(10),
            default_state: FederalState::NordrheinWestfalen,
            zim_overhead_rate: Decimal::ONE,
        }
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                max_connections: 10,
                connection_timeout: 30,
                enable_query_logging: true,
            },
            api: ApiConfig {
                port: 3000,
                enable_request_logging: true,
                max_request_size_bytes: 10 * 1024 * 1024, // 10MB
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
                jwt_secret: "foerderzeit-development-secret".to_string(),
                jwt_expiry_hours: 24 * 7, // 1 week
            },
            report: Self::report_defaults(),
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                max_connections: 20,
                connection_timeout: 10,
                enable_query_logging: true,
            },
            api: ApiConfig {
                port: 3000,
                enable_request_logging: true,
                max_request_size_bytes: 5 * 1024 * 1024, // 5MB
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://staging.foerderzeit.de".to_string()],
                jwt_secret: String::new(),
                jwt_expiry_hours: 24,
            },
            report: Self::report_defaults(),
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                max_connections: 50,
                connection_timeout: 5,
                enable_query_logging: false,
            },
            api: ApiConfig {
                port: 3000,
                enable_request_logging: false,
                max_request_size_bytes: 2 * 1024 * 1024, // 2MB
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://app.foerderzeit.de".to_string()],
                // must come from SECURITY_JWT_SECRET
                jwt_secret: String::new(),
                jwt_expiry_hours: 8,
            },
            report: Self::report_defaults(),
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_production {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Production)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn development_has_a_usable_secret() {
        let config = AppConfig::development();
        assert!(!config.security.jwt_secret.is_empty());
        assert_eq!(config.api.port, 3000);
        assert_eq!(config.report.max_daily_hours, Decimal::from(10));
        assert_eq!(config.report.zim_overhead_rate, Decimal::ONE);
    }

    #[test]
    fn production_requires_explicit_secret() {
        let config = AppConfig::production();
        assert!(config.security.jwt_secret.is_empty());
        assert!(!config.api.enable_request_logging);
        assert!(config.database.max_connections > AppConfig::staging().database.max_connections);
    }

    #[test]
    fn secret_is_not_serialized() {
        let value = serde_json::to_value(AppConfig::development()).unwrap();
        assert!(value["security"].get("jwt_secret").is_none());
        assert_eq!(value["report"]["default_state"], "NW");
    }
}
