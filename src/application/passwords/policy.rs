//! Password validation policy
//!
//! The composite of the blank check, the known-breach check and the
//! strength check applied to every new plaintext password. The breach and
//! strength checks are delegated to collaborator traits so the policy can
//! be exercised without network access.

use async_trait::async_trait;

use crate::config::PasswordValidationConfig;
use crate::support::errors::{DomainError, DomainResult};

/// Black-box breach lookup: does the password appear in a known-breach
/// corpus?
#[async_trait]
pub trait CompromisedPasswordChecker: Send + Sync {
    async fn is_compromised(&self, plaintext: &str) -> DomainResult<bool>;
}

/// Black-box strength estimation, scored 0 (unusable) to 4 (strongest).
pub trait PasswordStrengthEstimator: Send + Sync {
    fn score(&self, plaintext: &str) -> u8;
}

#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    not_compromised: bool,
    password_strength: bool,
    min_score: u8,
}

impl PasswordPolicy {
    pub fn new(config: &PasswordValidationConfig) -> DomainResult<Self> {
        if !(1..=4).contains(&config.password_strength_min_score) {
            return Err(DomainError::Config(format!(
                "Strength level \"{}\" is not valid. Please pick a number between 1 (weakest) and 4 (strongest)",
                config.password_strength_min_score
            )));
        }

        Ok(Self {
            not_compromised: config.not_compromised,
            password_strength: config.password_strength,
            min_score: config.password_strength_min_score,
        })
    }

    /// Validate a plaintext password against every enabled rule.
    ///
    /// All violations are aggregated into a single error. The error message
    /// names the violated rules but never echoes the password itself.
    pub async fn validate(
        &self,
        plaintext: &str,
        breach_checker: &dyn CompromisedPasswordChecker,
        strength_estimator: &dyn PasswordStrengthEstimator,
    ) -> DomainResult<()> {
        let mut violations: Vec<String> = Vec::new();

        let blank = plaintext.trim().is_empty();
        if blank {
            violations.push("the password must not be blank".to_string());
        }

        if self.not_compromised && !blank && breach_checker.is_compromised(plaintext).await? {
            violations.push(
                "the password appears in a known data breach and must not be used".to_string(),
            );
        }

        if self.password_strength {
            let score = strength_estimator.score(plaintext);
            if score < self.min_score {
                violations.push(format!(
                    "the password strength score {} is below the required minimum of {}",
                    score, self.min_score
                ));
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(DomainError::PasswordPolicy(violations.join("; ")))
        }
    }
}
