//! Texnouz IAM — admin CLI
//!
//! Administrative user operations against the IAM user store.
//!
//! ```sh
//! # Create a user (prompts for email and password when omitted)
//! iam-admin user create john
//!
//! # Create a user with an auto-generated password
//! iam-admin user create john john@example.com --generate-password
//!
//! # Change a password
//! iam-admin user change-password john
//!
//! # Grant / revoke roles
//! iam-admin user promote john ROLE_STAFF
//! iam-admin user promote john --super
//! iam-admin user demote john ROLE_STAFF
//! ```
//!
//! Exit status: 0 on success (including role no-ops), 1 on expected
//! business failures (duplicate identifier/email, invalid email), 2 on
//! fatal errors (unknown user, malformed role, password policy,
//! configuration faults).

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::{error, info};

use texnouz_iam::application::identity::{RoleCommandOutcome, UserAdminService};
use texnouz_iam::application::passwords::PasswordPolicy;
use texnouz_iam::config::AppConfig;
use texnouz_iam::domain::{CreateUserDto, CreateUserReport, DomainError};
use texnouz_iam::infrastructure::breach::HibpPasswordChecker;
use texnouz_iam::infrastructure::crypto::BcryptPasswordHasher;
use texnouz_iam::infrastructure::database::{
    init_database, run_migrations, UserRepository,
};
use texnouz_iam::infrastructure::strength::ZxcvbnStrengthEstimator;

mod prompt;

/// Texnouz IAM — administrative user operations.
#[derive(Parser, Debug)]
#[command(
    name = "iam-admin",
    version,
    about = "User administration for the Texnouz IAM store",
    long_about = "Texnouz IAM — create users, change passwords and manage \
                  roles from the command line.\n\n\
                  Default config: ~/.config/texnouz-iam/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "IAM_CONFIG")]
    config: Option<PathBuf>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// User account administration.
    #[command(subcommand)]
    User(UserCommands),
}

#[derive(Subcommand, Debug)]
enum UserCommands {
    /// Create a user.
    Create {
        /// User identifier
        identifier: String,
        /// Email address (prompted when omitted)
        email: Option<String>,
        /// User password (prompted when omitted; a blank answer generates one)
        password: Option<String>,
        /// Bypass the password prompt and auto-generate a password
        #[arg(long)]
        generate_password: bool,
    },
    /// Change the password of a user.
    ChangePassword {
        /// The user identifier
        identifier: String,
        /// The new password (prompted when omitted)
        password: Option<String>,
    },
    /// Promote a user by adding a role.
    Promote {
        /// The user identifier
        identifier: String,
        /// The role
        role: Option<String>,
        /// Instead of specifying a role, quickly add the super administrator role
        #[arg(long = "super")]
        super_admin: bool,
    },
    /// Demote a user by removing a role.
    Demote {
        /// The user identifier
        identifier: String,
        /// The role
        role: Option<String>,
        /// Instead of specifying a role, quickly remove the super administrator role
        #[arg(long = "super")]
        super_admin: bool,
    },
    /// Print completion candidates, one per line (consumed by shell
    /// completion scripts).
    #[command(hide = true)]
    Completions {
        #[arg(value_enum)]
        target: CompletionTarget,
        /// Target user for demote-roles
        identifier: Option<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CompletionTarget {
    Identifiers,
    PromoteRoles,
    DemoteRoles,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // ── Load configuration ──────────────────────────────────────
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(texnouz_iam::default_config_path);

    let mut config = if config_path.exists() {
        match AppConfig::load(&config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                // Fallback tracing init so the failure is visible
                tracing_subscriber::fmt()
                    .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                    .init();
                error!("Failed to load config from {}: {}", config_path.display(), e);
                return ExitCode::from(2);
            }
        }
    } else {
        AppConfig::default()
    };

    // ── Apply CLI overrides ─────────────────────────────────────
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }

    texnouz_iam::init_tracing(&config.logging);
    if config_path.exists() {
        info!("Configuration loaded from {}", config_path.display());
    }

    // ── Run the requested command ───────────────────────────────
    match run(cli.command, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            if e.is_business_failure() {
                ExitCode::from(1)
            } else {
                ExitCode::from(2)
            }
        }
    }
}

async fn run(command: Commands, config: AppConfig) -> Result<(), DomainError> {
    let db = init_database(&config.database)
        .await
        .map_err(|e| DomainError::Storage(format!("Database error: {}", e)))?;
    run_migrations(&db)
        .await
        .map_err(|e| DomainError::Storage(format!("Migration error: {}", e)))?;

    let repo = Arc::new(UserRepository::new(db, &config.user_entity)?);
    let service = UserAdminService::new(
        repo,
        Arc::new(BcryptPasswordHasher),
        Arc::new(HibpPasswordChecker::new(
            config.password_validation.breach_api_endpoint.clone(),
        )),
        Arc::new(ZxcvbnStrengthEstimator),
        PasswordPolicy::new(&config.password_validation)?,
        config.default_roles.clone(),
        config.super_admin_role.clone(),
    )?;

    let Commands::User(command) = command;
    run_user_command(command, &service).await
}

async fn run_user_command(
    command: UserCommands,
    service: &UserAdminService<UserRepository>,
) -> Result<(), DomainError> {
    match command {
        UserCommands::Create {
            identifier,
            email,
            password,
            generate_password,
        } => {
            let email = match email {
                Some(email) => email,
                None => prompt::email()?,
            };
            let password = if generate_password || password.is_some() {
                password
            } else {
                prompt::optional_password()?
            };

            let report = service
                .create_user(CreateUserDto {
                    identifier,
                    email,
                    password,
                    generate_password,
                })
                .await?;
            print_create_report(&report);
            Ok(())
        }

        UserCommands::ChangePassword {
            identifier,
            password,
        } => {
            let password = match password {
                Some(password) => password,
                None => prompt::required_password()?,
            };

            service.change_password(&identifier, &password).await?;
            println!("Changed password for user \"{}\"", identifier);
            Ok(())
        }

        UserCommands::Promote {
            identifier,
            role,
            super_admin,
        } => {
            let outcome = service
                .promote(&identifier, role.as_deref(), super_admin)
                .await?;
            let role = role.map(|role| role.to_uppercase()).unwrap_or_default();
            match (outcome, super_admin) {
                (RoleCommandOutcome::Applied, true) => println!(
                    "User \"{}\" has been promoted as a super administrator. {}",
                    identifier, NEXT_LOGIN_CAVEAT
                ),
                (RoleCommandOutcome::Noop, true) => {
                    println!("User \"{}\" is already a super administrator.", identifier)
                }
                (RoleCommandOutcome::Applied, false) => println!(
                    "Role \"{}\" has been added to user \"{}\". {}",
                    role, identifier, NEXT_LOGIN_CAVEAT
                ),
                (RoleCommandOutcome::Noop, false) => println!(
                    "User \"{}\" did already have \"{}\" role.",
                    identifier, role
                ),
            }
            Ok(())
        }

        UserCommands::Demote {
            identifier,
            role,
            super_admin,
        } => {
            let outcome = service
                .demote(&identifier, role.as_deref(), super_admin)
                .await?;
            let role = role.map(|role| role.to_uppercase()).unwrap_or_default();
            match (outcome, super_admin) {
                (RoleCommandOutcome::Applied, true) => println!(
                    "User \"{}\" has been demoted as a simple user. {}",
                    identifier, NEXT_LOGIN_CAVEAT
                ),
                (RoleCommandOutcome::Noop, true) => {
                    println!("User \"{}\" is not a super administrator.", identifier)
                }
                (RoleCommandOutcome::Applied, false) => println!(
                    "Role \"{}\" has been removed from user \"{}\". {}",
                    role, identifier, NEXT_LOGIN_CAVEAT
                ),
                (RoleCommandOutcome::Noop, false) => println!(
                    "User \"{}\" did not have \"{}\" role.",
                    identifier, role
                ),
            }
            Ok(())
        }

        UserCommands::Completions { target, identifier } => {
            let candidates = match target {
                CompletionTarget::Identifiers => service.suggest_identifiers().await?,
                CompletionTarget::PromoteRoles => service.suggest_promote_roles().await?,
                CompletionTarget::DemoteRoles => {
                    service
                        .suggest_demote_roles(identifier.as_deref().unwrap_or_default())
                        .await?
                }
            };
            for candidate in candidates {
                println!("{}", candidate);
            }
            Ok(())
        }
    }
}

/// Session role caches upstream only refresh at login; persisted changes
/// are not live until then.
const NEXT_LOGIN_CAVEAT: &str =
    "This change will not apply until the user logs out and back in again.";

fn print_create_report(report: &CreateUserReport) {
    let password = if report.generated {
        report.password.as_str()
    } else {
        "*****"
    };
    println!(" {:<20} {:<30} {}", "User Identifier", "Email", "Generated Password");
    println!(" {:<20} {:<30} {}", report.identifier, report.email, password);
}
