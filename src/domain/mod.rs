pub mod roles;
pub mod user;

// Re-export commonly used types
pub use user::{CreateUserDto, CreateUserReport, User, UserField, UserRepositoryInterface};

// Re-export DomainError/DomainResult from support for convenience
pub use crate::support::errors::{DomainError, DomainResult};
