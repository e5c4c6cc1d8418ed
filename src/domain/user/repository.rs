use async_trait::async_trait;

use super::User;
use crate::support::errors::DomainResult;

/// Logical fields of the user entity addressable by the workflows.
///
/// The concrete repository maps each one to the column name configured
/// under `[user_entity]`; a field whose configured name does not resolve
/// is reported as not writable by the capability probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserField {
    Identifier,
    Email,
    Password,
}

#[async_trait]
pub trait UserRepositoryInterface: Send + Sync {
    /// Look up a single user by field value. `Ok(None)` when absent —
    /// callers translate that into a reported error, never a panic.
    async fn find_one_by(&self, field: UserField, value: &str) -> DomainResult<Option<User>>;

    /// All users; used by shell completion only. Empty vec when none.
    async fn find_all(&self) -> DomainResult<Vec<User>>;

    /// Number of users whose field equals the value (uniqueness checks).
    async fn count_by(&self, field: UserField, value: &str) -> DomainResult<u64>;

    /// Persist a new user record.
    async fn create_user(&self, user: &User) -> DomainResult<()>;

    /// Flush in-memory changes of an existing record.
    async fn update_user(&self, user: &User) -> DomainResult<()>;

    /// Capability probe: whether the field can be set on the configured
    /// user entity.
    fn is_writable(&self, field: UserField) -> bool;
}
