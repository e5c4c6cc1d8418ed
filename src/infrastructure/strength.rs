//! Password strength estimation via zxcvbn

use crate::application::passwords::PasswordStrengthEstimator;

/// zxcvbn-backed strength estimator. Scores run 0 (unusable) to 4
/// (strongest); an unevaluable password scores 0.
#[derive(Debug, Default)]
pub struct ZxcvbnStrengthEstimator;

impl PasswordStrengthEstimator for ZxcvbnStrengthEstimator {
    fn score(&self, plaintext: &str) -> u8 {
        match zxcvbn::zxcvbn(plaintext, &[]) {
            Ok(entropy) => entropy.score() as u8,
            Err(_) => 0,
        }
    }
}
