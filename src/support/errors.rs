use thiserror::Error;

/// Errors raised by the admin workflows.
///
/// Two tiers share this enum: `Validation` and `Conflict` are expected
/// business failures that a command reports and exits with `FAILURE`;
/// every other variant aborts the command through the fatal error path.
/// Messages are always safe to show an operator: no plaintext passwords,
/// no hashes.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("The supplied role name is not valid: {0}")]
    InvalidRole(String),

    #[error("Password rejected: {0}")]
    PasswordPolicy(String),

    #[error("Invalid usage: {0}")]
    Usage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Input error: {0}")]
    Io(String),

    #[error("Crypto error: {0}")]
    Crypto(String),
}

impl DomainError {
    /// Whether this error is an expected business failure (reported with
    /// the plain `FAILURE` exit status) rather than a fatal condition.
    pub fn is_business_failure(&self) -> bool {
        matches!(self, DomainError::Validation(_) | DomainError::Conflict(_))
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
