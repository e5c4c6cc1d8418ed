//! Password hashing via bcrypt

use bcrypt::{hash, DEFAULT_COST};

use crate::application::passwords::PasswordHasher;
use crate::domain::User;
use crate::support::errors::{DomainError, DomainResult};

/// Bcrypt-backed implementation of the hashing collaborator.
///
/// Bcrypt embeds its own salt, so the user record is not consulted.
#[derive(Debug, Default)]
pub struct BcryptPasswordHasher;

impl PasswordHasher for BcryptPasswordHasher {
    fn hash(&self, _user: &User, plaintext: &str) -> DomainResult<String> {
        hash(plaintext, DEFAULT_COST)
            .map_err(|e| DomainError::Crypto(format!("Failed to hash password: {}", e)))
    }
}
