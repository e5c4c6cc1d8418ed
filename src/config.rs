//! Application configuration
//!
//! Loaded from a TOML file (default `~/.config/texnouz-iam/config.toml`),
//! with every section optional and falling back to defaults. Field names of
//! the user entity, the default role list, the super-admin role and the
//! password-validation switches all live here; [`AppConfig::validate`] runs
//! before any command so that a bad deployment fails at startup, not
//! mid-workflow.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::roles::is_valid_role_format;
use crate::infrastructure::database::DatabaseConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub user_entity: UserEntityConfig,
    /// Roles assigned to every newly created user, verbatim.
    pub default_roles: Vec<String>,
    /// The role granted/revoked by the `--super` shortcut.
    pub super_admin_role: String,
    pub password_validation: PasswordValidationConfig,
    pub logging: LoggingConfig,
}

/// Field names on the stored user entity.
///
/// Deployments reusing an existing users table can point the commands at
/// their own column names; a field name that does not resolve is treated
/// as absent on the entity (and the identifier must always resolve).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UserEntityConfig {
    /// The username/identifier field used to look up and uniquely key users.
    pub identifier: String,
    /// The email address field.
    pub email: String,
    /// The password hash field.
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordValidationConfig {
    /// Reject passwords found in a known-breach corpus.
    pub not_compromised: bool,
    /// Reject passwords below the minimum strength score.
    pub password_strength: bool,
    /// Minimum strength score, 1 (weakest) to 4 (strongest).
    pub password_strength_min_score: u8,
    /// Base URL of the haveibeenpwned-compatible range API.
    pub breach_api_endpoint: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    pub level: String,
    /// Log format: "plain" or "json".
    pub format: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            user_entity: UserEntityConfig::default(),
            default_roles: vec!["ROLE_USER".to_string()],
            super_admin_role: "ROLE_SUPER_ADMIN".to_string(),
            password_validation: PasswordValidationConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for UserEntityConfig {
    fn default() -> Self {
        Self {
            identifier: "username".to_string(),
            email: "email".to_string(),
            password: "password_hash".to_string(),
        }
    }
}

impl Default for PasswordValidationConfig {
    fn default() -> Self {
        Self {
            not_compromised: false,
            password_strength: false,
            password_strength_min_score: 2,
            breach_api_endpoint: "https://api.pwnedpasswords.com".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "plain".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file and validate it.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate invariants that must hold before any command is allowed to
    /// run. These are deployment faults, not per-invocation user errors.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.user_entity.identifier.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "user_entity.identifier must not be empty".to_string(),
            ));
        }

        for role in &self.default_roles {
            if !is_valid_role_format(role) {
                return Err(ConfigError::Invalid(format!(
                    "Default role \"{}\" does not pass the validation test",
                    role
                )));
            }
        }

        if self.super_admin_role.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "super_admin_role must not be empty".to_string(),
            ));
        }

        let score = self.password_validation.password_strength_min_score;
        if !(1..=4).contains(&score) {
            return Err(ConfigError::Invalid(format!(
                "Strength level \"{}\" is not valid. Please pick a number between 1 (weakest) and 4 (strongest)",
                score
            )));
        }

        Ok(())
    }
}

/// Default configuration file location: `~/.config/texnouz-iam/config.toml`
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("texnouz-iam")
        .join("config.toml")
}
