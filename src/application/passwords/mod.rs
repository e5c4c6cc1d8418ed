//! Password concerns shared by the admin workflows: the validation policy,
//! the generator behind `--generate-password`, and the hashing seam.

pub mod generator;
pub mod hasher;
pub mod policy;

pub use generator::generate_password;
pub use hasher::PasswordHasher;
pub use policy::{CompromisedPasswordChecker, PasswordPolicy, PasswordStrengthEstimator};
