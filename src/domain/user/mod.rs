//! User aggregate
//!
//! Contains the User entity, DTOs, and repository interface.

pub mod model;
pub mod repository;

mod dto_create;

// Re-export model types
pub use model::User;

// Re-export DTOs
pub use dto_create::{CreateUserDto, CreateUserReport};

// Re-export repository trait
pub use repository::{UserField, UserRepositoryInterface};
