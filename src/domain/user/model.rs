use chrono::{DateTime, Utc};

/// User model
///
/// `email` and `password_hash` are optional because the configured user
/// entity may not expose those fields; the workflows probe writability
/// before setting either one.
#[derive(Clone, Debug)]
pub struct User {
    pub id: String,
    /// Value of the configured identifier field (commonly a username).
    pub identifier: String,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    /// Role tags. Membership is order-independent; order is preserved for
    /// display.
    pub roles: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Construct a blank record with a fresh id and current timestamps.
    pub fn new(id: String, identifier: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            identifier,
            email: None,
            password_hash: None,
            roles: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the user holds the given role.
    ///
    /// The input is uppercased before comparison; stored roles are already
    /// uppercase, so the check is effectively case-insensitive.
    pub fn has_role(&self, role: &str) -> bool {
        let role = role.to_uppercase();
        self.roles.iter().any(|held| *held == role)
    }

    /// Whether the user holds any of the given roles.
    pub fn has_any_role<I, S>(&self, roles: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        roles.into_iter().any(|role| self.has_role(role.as_ref()))
    }

    /// Grant a role. The input is uppercased (the `ROLE_` prefix is NOT
    /// added here — argument-level validation happens at the command
    /// boundary) and appended unless already held.
    pub fn add_role(&mut self, role: &str) -> &mut Self {
        let role = role.to_uppercase();
        if !self.roles.contains(&role) {
            self.roles.push(role);
        }
        self
    }

    /// Revoke a role: remove the first exact match of the uppercased
    /// input, preserving the relative order of the remaining roles.
    /// No-op when the role is not held.
    pub fn remove_role(&mut self, role: &str) -> &mut Self {
        let role = role.to_uppercase();
        if let Some(index) = self.roles.iter().position(|held| *held == role) {
            self.roles.remove(index);
        }
        self
    }

    /// Replace the whole role sequence verbatim. Normalization is the
    /// caller's responsibility when the roles come from untrusted input.
    pub fn set_roles(&mut self, roles: Vec<String>) -> &mut Self {
        self.roles = roles;
        self
    }
}
