use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::database::models::Role;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub identity: IdentityConfig,
    #[serde(rename = "filmValidations")]
    pub film: FilmConfig,
    pub pagination: PaginationConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// HMAC key for issuing and verifying tokens.
    pub secret: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    /// Seconds to wait for a pooled connection.
    pub connection_timeout: u64,
    pub run_migrations: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityConfig {
    pub min_login_len: i64,
    pub max_login_len: i64,
    pub min_password_len: i64,
    pub max_password_len: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilmConfig {
    pub min_name_len: i64,
    pub max_name_len: i64,
    pub min_description_len: i64,
    pub max_description_len: i64,
    pub min_rating: i64,
    pub max_rating: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationConfig {
    pub default_size: i64,
    /// Upper bound applied to client page sizes; `None` leaves them unbounded.
    pub max_size: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityConfig {
    /// Role required by the admin route group.
    pub admin_role: Role,
    pub jwt_expiry_hours: u64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(None, |key| env::var(key).ok())
    }

    /// Preset chosen by `APP_ENV`, then the optional YAML file merged over it,
    /// then individual variables from `lookup`.
    pub fn load<F>(file: Option<&Path>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        let preset = match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        };

        let config = match file {
            Some(path) => {
                let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                preset.merge_yaml(&raw)?
            }
            None => preset,
        };

        let config = config.with_overrides(&lookup)?;
        config.validate()?;
        Ok(config)
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    fn merge_yaml(self, raw: &str) -> Result<Self, ConfigError> {
        let mut base = serde_yaml::to_value(&self)?;
        let overlay: serde_yaml::Value = serde_yaml::from_str(raw)?;
        merge_values(&mut base, overlay);
        Ok(serde_yaml::from_value(base)?)
    }

    fn with_overrides<F>(mut self, lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server overrides
        if let Some(v) = lookup("SERVER_HOST") {
            self.server.host = v;
        }
        override_parsed(lookup, "SERVER_PORT", &mut self.server.port)?;
        if let Some(v) = lookup("SERVER_SECRET") {
            self.server.secret = v;
        }

        // Database overrides
        if let Some(v) = lookup("DATABASE_URL") {
            self.database.url = v;
        }
        override_parsed(lookup, "DATABASE_MAX_CONNECTIONS", &mut self.database.max_connections)?;
        override_parsed(lookup, "DATABASE_CONNECTION_TIMEOUT", &mut self.database.connection_timeout)?;
        override_parsed(lookup, "DATABASE_RUN_MIGRATIONS", &mut self.database.run_migrations)?;

        // Identity overrides
        override_parsed(lookup, "IDENTITY_MIN_LOGIN_LEN", &mut self.identity.min_login_len)?;
        override_parsed(lookup, "IDENTITY_MAX_LOGIN_LEN", &mut self.identity.max_login_len)?;
        override_parsed(lookup, "IDENTITY_MIN_PASSWORD_LEN", &mut self.identity.min_password_len)?;
        override_parsed(lookup, "IDENTITY_MAX_PASSWORD_LEN", &mut self.identity.max_password_len)?;

        // Film overrides
        override_parsed(lookup, "FILM_MIN_NAME_LEN", &mut self.film.min_name_len)?;
        override_parsed(lookup, "FILM_MAX_NAME_LEN", &mut self.film.max_name_len)?;
        override_parsed(lookup, "FILM_MIN_DESCRIPTION_LEN", &mut self.film.min_description_len)?;
        override_parsed(lookup, "FILM_MAX_DESCRIPTION_LEN", &mut self.film.max_description_len)?;
        override_parsed(lookup, "FILM_MIN_RATING", &mut self.film.min_rating)?;
        override_parsed(lookup, "FILM_MAX_RATING", &mut self.film.max_rating)?;

        // Pagination overrides
        override_parsed(lookup, "PAGINATION_DEFAULT_SIZE", &mut self.pagination.default_size)?;
        if let Some(v) = lookup("PAGINATION_MAX_SIZE") {
            self.pagination.max_size = match v.trim() {
                "" | "none" => None,
                n => Some(n.parse().map_err(|_| ConfigError::Invalid {
                    key: "PAGINATION_MAX_SIZE",
                    value: v.clone(),
                })?),
            };
        }

        // Security overrides
        override_parsed(lookup, "SECURITY_ADMIN_ROLE", &mut self.security.admin_role)?;
        override_parsed(lookup, "SECURITY_JWT_EXPIRY_HOURS", &mut self.security.jwt_expiry_hours)?;

        Ok(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.secret.is_empty() {
            return Err(ConfigError::Missing("SERVER_SECRET"));
        }
        if self.database.url.is_empty() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }
        if self.pagination.default_size <= 0 {
            return Err(ConfigError::Invalid {
                key: "PAGINATION_DEFAULT_SIZE",
                value: self.pagination.default_size.to_string(),
            });
        }
        Ok(())
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                secret: String::new(),
            },
            database: DatabaseConfig {
                url: String::new(),
                max_connections: 10,
                connection_timeout: 30,
                run_migrations: true,
            },
            identity: IdentityConfig::default(),
            film: FilmConfig::default(),
            pagination: PaginationConfig {
                default_size: 10,
                max_size: None,
            },
            security: SecurityConfig {
                admin_role: Role::Admin,
                jwt_expiry_hours: 24 * 7, // 1 week
            },
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                url: String::new(),
                max_connections: 20,
                connection_timeout: 10,
                run_migrations: true,
            },
            pagination: PaginationConfig {
                default_size: 10,
                max_size: Some(500),
            },
            security: SecurityConfig {
                admin_role: Role::Admin,
                jwt_expiry_hours: 24,
            },
            ..Self::development()
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                url: String::new(),
                max_connections: 50,
                connection_timeout: 5,
                run_migrations: false,
            },
            pagination: PaginationConfig {
                default_size: 10,
                max_size: Some(100),
            },
            security: SecurityConfig {
                admin_role: Role::Admin,
                jwt_expiry_hours: 4,
            },
            ..Self::development()
        }
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            min_login_len: 3,
            max_login_len: 50,
            min_password_len: 6,
            max_password_len: 72,
        }
    }
}

impl Default for FilmConfig {
    fn default() -> Self {
        Self {
            min_name_len: 1,
            max_name_len: 150,
            min_description_len: 0,
            max_description_len: 1000,
            min_rating: 0,
            max_rating: 10,
        }
    }
}

fn override_parsed<F, T>(lookup: &F, key: &'static str, target: &mut T) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    if let Some(v) = lookup(key) {
        *target = v.trim().parse().map_err(|_| ConfigError::Invalid { key, value: v.clone() })?;
    }
    Ok(())
}

/// Recursively overlays mappings; any other value in `overlay` replaces `base`.
fn merge_values(base: &mut serde_yaml::Value, overlay: serde_yaml::Value) {
    match (base, overlay) {
        (serde_yaml::Value::Mapping(base_map), serde_yaml::Value::Mapping(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}
