use crate::domain::User;
use crate::support::errors::DomainResult;

/// Hashing collaborator. Receives the user record so implementations may
/// derive per-user parameters; the bcrypt implementation ignores it.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, user: &User, plaintext: &str) -> DomainResult<String>;
}
