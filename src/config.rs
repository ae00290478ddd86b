//! Configuration loading for the library rental server

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

use crate::application::account::MAX_TOKEN_LIFETIME_HOURS;
use crate::domain::LibrarySettings;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Which adapter set backs the service ports.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_expiration_hours: u64,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

/// Fallback values used when the settings store has no row (or a zero) for a key.
#[derive(Debug, Deserialize, Clone)]
pub struct LibraryConfig {
    pub loan_period: u32,
    pub max_articles_per_user: u32,
}

impl LibraryConfig {
    pub fn fallback_settings(&self) -> LibrarySettings {
        LibrarySettings::with_fallbacks(Some(self.loan_period), Some(self.max_articles_per_user))
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub library: LibraryConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // LIBRARY_SERVER__PORT=8081 etc.
            .add_source(
                Environment::with_prefix("LIBRARY")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("database.url", env::var("DATABASE_URL").ok())?
            .set_override_option("auth.jwt_secret", env::var("JWT_SECRET").ok())?
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that deserialize but cannot be used
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_TOKEN_LIFETIME_HOURS).contains(&self.auth.jwt_expiration_hours) {
            return Err(ConfigError::Message(format!(
                "auth.jwt_expiration_hours must be between 1 and {}, got {}",
                MAX_TOKEN_LIFETIME_HOURS, self.auth.jwt_expiration_hours
            )));
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Postgres,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/library".to_string(),
            max_connections: 5,
            min_connections: 1,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "change-this-secret-in-production".to_string(),
            jwt_expiration_hours: 24,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "library_rental=debug,tower_http=debug".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl Default for LibraryConfig {
    fn default() -> Self {
        let defaults = LibrarySettings::default();
        Self {
            loan_period: defaults.loan_period,
            max_articles_per_user: defaults.max_articles_per_user,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_fallbacks_replace_zero() {
        let library = LibraryConfig {
            loan_period: 0,
            max_articles_per_user: 5,
        };
        let settings = library.fallback_settings();
        assert_eq!(settings.loan_period, 14);
        assert_eq!(settings.max_articles_per_user, 5);
    }

    fn config_with_expiration(hours: u64) -> AppConfig {
        AppConfig {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            database: DatabaseConfig::default(),
            auth: AuthConfig {
                jwt_expiration_hours: hours,
                ..AuthConfig::default()
            },
            logging: LoggingConfig::default(),
            library: LibraryConfig::default(),
        }
    }

    #[test]
    fn test_validate_rejects_unusable_token_lifetime() {
        for hours in [0, MAX_TOKEN_LIFETIME_HOURS + 1, u64::MAX] {
            assert!(matches!(
                config_with_expiration(hours).validate(),
                Err(ConfigError::Message(_))
            ));
        }
        assert!(config_with_expiration(24).validate().is_ok());
    }

    #[test]
    fn test_backend_deserializes_lowercase() {
        let storage: StorageConfig = serde_json::from_str(r#"{"backend":"memory"}"#).unwrap();
        assert_eq!(storage.backend, StorageBackend::Memory);
    }
}
