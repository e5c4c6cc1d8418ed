//! User administration use-cases

mod service;

pub use service::{RoleCommandOutcome, UserAdminService};
