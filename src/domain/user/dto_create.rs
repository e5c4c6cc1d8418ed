/// Input for the create-user workflow.
#[derive(Debug, Clone)]
pub struct CreateUserDto {
    pub identifier: String,
    pub email: String,
    /// Plaintext password; `None` triggers auto-generation.
    pub password: Option<String>,
    /// Skip the password argument entirely and auto-generate one.
    pub generate_password: bool,
}

/// Outcome of a successful create-user workflow.
#[derive(Debug, Clone)]
pub struct CreateUserReport {
    pub identifier: String,
    pub email: String,
    /// The plaintext password that was set. Display it only when
    /// `generated` is true; an operator-supplied password is masked.
    pub password: String,
    pub generated: bool,
}
