//! # Texnouz IAM
//!
//! User administration toolkit for Texnouz deployments: account creation,
//! password changes and role grants, driven by the `iam-admin` CLI.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Core business entities, types and traits
//! - **application**: Admin workflows and password policy
//! - **infrastructure**: External concerns (database, hashing, breach lookups)
//! - **support**: Error types shared across layers

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod logging;
pub mod support;

pub use config::{default_config_path, AppConfig, ConfigError};
pub use logging::init_tracing;

// Re-export database types for easy access
pub use infrastructure::database::{init_database, DatabaseConfig};

// Re-export the admin service for embedding hosts
pub use application::identity::UserAdminService;
