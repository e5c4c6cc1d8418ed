//! Role name handling
//!
//! A role is an uppercase string tag carrying the `ROLE_` prefix
//! (`"admin"` normalizes to `"ROLE_ADMIN"`). Roles supplied as command
//! arguments are validated at the boundary and rejected when malformed;
//! configured default roles must already carry the prefix.

/// Prefix every stored role carries.
pub const ROLE_PREFIX: &str = "ROLE_";

/// Canonicalize a role name: uppercase, `ROLE_`-prefixed.
///
/// Idempotent — normalizing an already-normalized role is a no-op.
pub fn normalize_role(role: &str) -> String {
    let upper = role.to_uppercase();
    if upper.starts_with(ROLE_PREFIX) {
        upper
    } else {
        format!("{}{}", ROLE_PREFIX, upper)
    }
}

/// Whether a role name is acceptable as-is (modulo case).
///
/// Checks format only: `"role_test"` passes because the comparison
/// uppercases first, even though normalization was never applied to it.
pub fn is_valid_role_format(role: &str) -> bool {
    role.to_uppercase().starts_with(ROLE_PREFIX)
}
