//! Interactive prompts for missing command arguments.
//!
//! Each prompt loops on invalid input via dialoguer's validators; the
//! workflows re-validate everything authoritatively afterwards.

use dialoguer::{Input, Password};

use texnouz_iam::support::errors::{DomainError, DomainResult};

fn prompt_err(e: dialoguer::Error) -> DomainError {
    DomainError::Io(format!("Prompt failed: {}", e))
}

/// Ask for an email address; re-asks while the answer is blank.
pub fn email() -> DomainResult<String> {
    Input::new()
        .with_prompt("Please enter an email address")
        .validate_with(|input: &String| {
            if input.trim().is_empty() {
                Err("Email address cannot be empty")
            } else {
                Ok(())
            }
        })
        .interact_text()
        .map_err(prompt_err)
}

/// Ask for a new password, hidden. A blank answer means "generate one for
/// me" and is returned as `None`.
pub fn optional_password() -> DomainResult<Option<String>> {
    let password = Password::new()
        .with_prompt("Please enter the new password (or leave blank to have one generated for you)")
        .allow_empty_password(true)
        .interact()
        .map_err(prompt_err)?;

    Ok(if password.is_empty() {
        None
    } else {
        Some(password)
    })
}

/// Ask for a new password, hidden; re-asks while the answer is blank.
pub fn required_password() -> DomainResult<String> {
    Password::new()
        .with_prompt("Please enter the new password")
        .validate_with(|input: &String| {
            if input.trim().is_empty() {
                Err("Password cannot be empty")
            } else {
                Ok(())
            }
        })
        .interact()
        .map_err(prompt_err)
}
