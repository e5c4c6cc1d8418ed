//! User administration service — application-layer orchestration
//!
//! All admin business logic lives here. The CLI verbs are thin wrappers
//! that delegate to this service and translate its results into exit
//! codes and operator messages.

use std::sync::Arc;

use tracing::info;
use validator::ValidateEmail;

use crate::application::passwords::{
    generate_password, CompromisedPasswordChecker, PasswordHasher, PasswordPolicy,
    PasswordStrengthEstimator,
};
use crate::domain::roles::is_valid_role_format;
use crate::domain::{
    CreateUserDto, CreateUserReport, DomainError, DomainResult, User, UserField,
    UserRepositoryInterface,
};

/// Result of a promote/demote invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleCommandOutcome {
    /// The role set changed and was persisted.
    Applied,
    /// The user already was (promote) or was not (demote) in the requested
    /// state; nothing was persisted.
    Noop,
}

type InitializeUserHook = Box<dyn Fn(&mut User) + Send + Sync>;

/// User administration service — orchestrates the create, change-password
/// and promote/demote workflows.
///
/// Generic over `R: UserRepositoryInterface` so it stays decoupled from
/// the concrete persistence layer; the hashing, breach-check and strength
/// collaborators are injected as trait objects.
pub struct UserAdminService<R: UserRepositoryInterface> {
    repo: Arc<R>,
    hasher: Arc<dyn PasswordHasher>,
    breach_checker: Arc<dyn CompromisedPasswordChecker>,
    strength_estimator: Arc<dyn PasswordStrengthEstimator>,
    policy: PasswordPolicy,
    default_roles: Vec<String>,
    super_admin_role: String,
    initialize_user: Option<InitializeUserHook>,
}

impl<R: UserRepositoryInterface> UserAdminService<R> {
    /// Build the service, failing fast on deployment faults: a default
    /// role without the `ROLE_` format or a user entity whose identifier
    /// field is not settable.
    pub fn new(
        repo: Arc<R>,
        hasher: Arc<dyn PasswordHasher>,
        breach_checker: Arc<dyn CompromisedPasswordChecker>,
        strength_estimator: Arc<dyn PasswordStrengthEstimator>,
        policy: PasswordPolicy,
        default_roles: Vec<String>,
        super_admin_role: String,
    ) -> DomainResult<Self> {
        for role in &default_roles {
            if !is_valid_role_format(role) {
                return Err(DomainError::Config(format!(
                    "Default role \"{}\" does not pass the validation test",
                    role
                )));
            }
        }

        if !repo.is_writable(UserField::Identifier) {
            return Err(DomainError::Config(
                "The configured user entity does not have a settable identifier field".to_string(),
            ));
        }

        Ok(Self {
            repo,
            hasher,
            breach_checker,
            strength_estimator,
            policy,
            default_roles,
            super_admin_role,
            initialize_user: None,
        })
    }

    /// Install a customization hook that may further mutate a new user
    /// record right before persistence. Default is the identity.
    pub fn with_initialize_user(
        mut self,
        hook: impl Fn(&mut User) + Send + Sync + 'static,
    ) -> Self {
        self.initialize_user = Some(Box::new(hook));
        self
    }

    // ── Account creation ────────────────────────────────────────

    /// Create a new user with the configured default roles.
    ///
    /// Duplicate identifier/email and a malformed email address are
    /// expected business failures (`Conflict` / `Validation`); a password
    /// policy violation is fatal.
    pub async fn create_user(&self, dto: CreateUserDto) -> DomainResult<CreateUserReport> {
        let CreateUserDto {
            identifier,
            email,
            password,
            generate_password: generate,
        } = dto;

        // An absent or blank password falls back to auto-generation, the
        // same as answering the interactive prompt with an empty line.
        let (plaintext, generated) = match password {
            _ if generate => (generate_password(), true),
            Some(password) if !password.is_empty() => (password, false),
            _ => (generate_password(), true),
        };

        if identifier.trim().is_empty() {
            return Err(DomainError::Validation(
                "User identifier cannot be empty".to_string(),
            ));
        }
        if self.repo.count_by(UserField::Identifier, &identifier).await? != 0 {
            return Err(DomainError::Conflict(
                "User identifier is already in use".to_string(),
            ));
        }

        if !email_is_valid(&email) {
            return Err(DomainError::Validation(format!(
                "\"{}\" is not a valid email address",
                email
            )));
        }
        if self.repo.is_writable(UserField::Email)
            && self.repo.count_by(UserField::Email, &email).await? != 0
        {
            return Err(DomainError::Conflict(
                "Email address is already in use".to_string(),
            ));
        }

        self.policy
            .validate(
                &plaintext,
                self.breach_checker.as_ref(),
                self.strength_estimator.as_ref(),
            )
            .await?;

        let mut user = User::new(uuid::Uuid::new_v4().to_string(), identifier);
        if self.repo.is_writable(UserField::Email) {
            user.email = Some(email.clone());
        }
        if self.repo.is_writable(UserField::Password) {
            let hash = self.hasher.hash(&user, &plaintext)?;
            user.password_hash = Some(hash);
        }
        user.set_roles(self.default_roles.clone());

        if let Some(hook) = &self.initialize_user {
            hook(&mut user);
        }

        self.repo.create_user(&user).await?;

        info!(identifier = %user.identifier, "User created");

        Ok(CreateUserReport {
            identifier: user.identifier,
            email,
            password: plaintext,
            generated,
        })
    }

    // ── Password change ─────────────────────────────────────────

    /// Replace a user's password hash after validating the new plaintext
    /// against the policy. Surrounding whitespace is trimmed first.
    pub async fn change_password(&self, identifier: &str, password: &str) -> DomainResult<()> {
        let mut user = self.find_required(identifier).await?;

        let plaintext = password.trim();
        self.policy
            .validate(
                plaintext,
                self.breach_checker.as_ref(),
                self.strength_estimator.as_ref(),
            )
            .await?;

        if !self.repo.is_writable(UserField::Password) {
            return Err(DomainError::Config(
                "The configured user entity does not have a settable password field".to_string(),
            ));
        }

        let hash = self.hasher.hash(&user, plaintext)?;
        user.password_hash = Some(hash);
        self.repo.update_user(&user).await?;

        info!(identifier = %user.identifier, "Password changed");
        Ok(())
    }

    // ── Role mutation ───────────────────────────────────────────

    /// Grant a role (or the super-admin role via `super_admin`). Granting
    /// a role the user already holds succeeds without persisting.
    pub async fn promote(
        &self,
        identifier: &str,
        role: Option<&str>,
        super_admin: bool,
    ) -> DomainResult<RoleCommandOutcome> {
        let role = self.resolve_role_argument(role, super_admin)?;
        let mut user = self.find_required(identifier).await?;

        if user.has_role(&role) {
            return Ok(RoleCommandOutcome::Noop);
        }

        user.add_role(&role);
        self.repo.update_user(&user).await?;

        info!(identifier = %user.identifier, role = %role, "Role granted");
        Ok(RoleCommandOutcome::Applied)
    }

    /// Revoke a role (or the super-admin role via `super_admin`). Revoking
    /// a role the user does not hold succeeds without persisting.
    pub async fn demote(
        &self,
        identifier: &str,
        role: Option<&str>,
        super_admin: bool,
    ) -> DomainResult<RoleCommandOutcome> {
        let role = self.resolve_role_argument(role, super_admin)?;
        let mut user = self.find_required(identifier).await?;

        if !user.has_role(&role) {
            return Ok(RoleCommandOutcome::Noop);
        }

        user.remove_role(&role);
        self.repo.update_user(&user).await?;

        info!(identifier = %user.identifier, role = %role, "Role revoked");
        Ok(RoleCommandOutcome::Applied)
    }

    // ── Shell-completion candidates ─────────────────────────────

    /// Identifier values of every known user.
    pub async fn suggest_identifiers(&self) -> DomainResult<Vec<String>> {
        let users = self.repo.find_all().await?;
        Ok(users.into_iter().map(|user| user.identifier).collect())
    }

    /// Candidate roles for `promote`: the union of roles currently held by
    /// any user plus the super-admin role, first-seen order.
    pub async fn suggest_promote_roles(&self) -> DomainResult<Vec<String>> {
        let mut roles: Vec<String> = Vec::new();
        for user in self.repo.find_all().await? {
            for role in user.roles {
                if !roles.contains(&role) {
                    roles.push(role);
                }
            }
        }
        if !roles.contains(&self.super_admin_role) {
            roles.push(self.super_admin_role.clone());
        }
        Ok(roles)
    }

    /// Candidate roles for `demote`: the target user's current roles.
    /// Empty when the identifier is unknown.
    pub async fn suggest_demote_roles(&self, identifier: &str) -> DomainResult<Vec<String>> {
        let user = self
            .repo
            .find_one_by(UserField::Identifier, identifier)
            .await?;
        Ok(user.map(|user| user.roles).unwrap_or_default())
    }

    // ── Helpers ─────────────────────────────────────────────────

    /// Validate the role/`--super` argument pair before any lookup runs.
    fn resolve_role_argument(
        &self,
        role: Option<&str>,
        super_admin: bool,
    ) -> DomainResult<String> {
        match (role, super_admin) {
            (Some(_), true) => Err(DomainError::Usage(
                "You can pass either the role or the --super option (but not both simultaneously)"
                    .to_string(),
            )),
            (None, false) => Err(DomainError::Usage("Not enough arguments".to_string())),
            (None, true) => Ok(self.super_admin_role.clone()),
            (Some(role), false) => {
                let role = role.to_uppercase();
                if !is_valid_role_format(&role) {
                    return Err(DomainError::InvalidRole(role));
                }
                Ok(role)
            }
        }
    }

    async fn find_required(&self, identifier: &str) -> DomainResult<User> {
        self.repo
            .find_one_by(UserField::Identifier, identifier)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "User",
                field: "identifier",
                value: identifier.to_string(),
            })
    }
}

/// Email shape check: the `validator` crate's HTML5 rules plus a dotted
/// domain, so `john@fake` is rejected the way operators expect.
fn email_is_valid(email: &str) -> bool {
    email.validate_email()
        && email
            .rsplit_once('@')
            .is_some_and(|(_, domain)| domain.contains('.'))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::application::passwords::generator::GENERATED_PASSWORD_LENGTH;
    use crate::config::PasswordValidationConfig;

    // ── Test doubles ────────────────────────────────────────────

    #[derive(Default)]
    struct InMemoryRepo {
        users: Mutex<Vec<User>>,
        email_writable: bool,
        password_writable: bool,
        identifier_writable: bool,
        finds: AtomicUsize,
        creates: AtomicUsize,
        updates: AtomicUsize,
    }

    impl InMemoryRepo {
        fn new() -> Self {
            Self {
                email_writable: true,
                password_writable: true,
                identifier_writable: true,
                ..Self::default()
            }
        }

        fn with_users(users: Vec<User>) -> Self {
            let repo = Self::new();
            *repo.users.lock().unwrap() = users;
            repo
        }

        fn stored(&self, identifier: &str) -> Option<User> {
            self.users
                .lock()
                .unwrap()
                .iter()
                .find(|user| user.identifier == identifier)
                .cloned()
        }

        fn field_value(user: &User, field: UserField) -> Option<String> {
            match field {
                UserField::Identifier => Some(user.identifier.clone()),
                UserField::Email => user.email.clone(),
                UserField::Password => user.password_hash.clone(),
            }
        }
    }

    #[async_trait]
    impl UserRepositoryInterface for InMemoryRepo {
        async fn find_one_by(&self, field: UserField, value: &str) -> DomainResult<Option<User>> {
            self.finds.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|user| Self::field_value(user, field).as_deref() == Some(value))
                .cloned())
        }

        async fn find_all(&self) -> DomainResult<Vec<User>> {
            Ok(self.users.lock().unwrap().clone())
        }

        async fn count_by(&self, field: UserField, value: &str) -> DomainResult<u64> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .filter(|user| Self::field_value(user, field).as_deref() == Some(value))
                .count() as u64)
        }

        async fn create_user(&self, user: &User) -> DomainResult<()> {
            self.creates.fetch_add(1, Ordering::SeqCst);
            self.users.lock().unwrap().push(user.clone());
            Ok(())
        }

        async fn update_user(&self, user: &User) -> DomainResult<()> {
            self.updates.fetch_add(1, Ordering::SeqCst);
            let mut users = self.users.lock().unwrap();
            if let Some(slot) = users.iter_mut().find(|stored| stored.id == user.id) {
                *slot = user.clone();
            }
            Ok(())
        }

        fn is_writable(&self, field: UserField) -> bool {
            match field {
                UserField::Identifier => self.identifier_writable,
                UserField::Email => self.email_writable,
                UserField::Password => self.password_writable,
            }
        }
    }

    #[derive(Default)]
    struct RecordingHasher {
        inputs: Mutex<Vec<String>>,
    }

    impl PasswordHasher for RecordingHasher {
        fn hash(&self, _user: &User, plaintext: &str) -> DomainResult<String> {
            self.inputs.lock().unwrap().push(plaintext.to_string());
            Ok(format!("hashed:{}", plaintext))
        }
    }

    #[derive(Default)]
    struct StubBreachChecker {
        compromised: Vec<&'static str>,
    }

    #[async_trait]
    impl CompromisedPasswordChecker for StubBreachChecker {
        async fn is_compromised(&self, plaintext: &str) -> DomainResult<bool> {
            Ok(self.compromised.contains(&plaintext))
        }
    }

    struct StubStrengthEstimator;

    impl PasswordStrengthEstimator for StubStrengthEstimator {
        fn score(&self, plaintext: &str) -> u8 {
            if plaintext.chars().count() >= 12 {
                4
            } else {
                1
            }
        }
    }

    struct Harness {
        repo: Arc<InMemoryRepo>,
        hasher: Arc<RecordingHasher>,
        service: UserAdminService<InMemoryRepo>,
    }

    fn harness(repo: InMemoryRepo) -> Harness {
        harness_with(repo, PasswordValidationConfig::default())
    }

    fn harness_with(repo: InMemoryRepo, validation: PasswordValidationConfig) -> Harness {
        let repo = Arc::new(repo);
        let hasher = Arc::new(RecordingHasher::default());
        let service = UserAdminService::new(
            repo.clone(),
            hasher.clone(),
            Arc::new(StubBreachChecker {
                compromised: vec!["abc123"],
            }),
            Arc::new(StubStrengthEstimator),
            PasswordPolicy::new(&validation).unwrap(),
            vec!["ROLE_USER".to_string()],
            "ROLE_SUPER_ADMIN".to_string(),
        )
        .unwrap();
        Harness {
            repo,
            hasher,
            service,
        }
    }

    fn existing_user(identifier: &str, email: &str, roles: &[&str]) -> User {
        let mut user = User::new(format!("id-{}", identifier), identifier.to_string());
        user.email = Some(email.to_string());
        user.set_roles(roles.iter().map(|role| role.to_string()).collect());
        user
    }

    fn create_dto(identifier: &str, email: &str) -> CreateUserDto {
        CreateUserDto {
            identifier: identifier.to_string(),
            email: email.to_string(),
            password: Some("a sufficiently long password".to_string()),
            generate_password: false,
        }
    }

    // ── Construction ────────────────────────────────────────────

    #[test]
    fn construction_rejects_unprefixed_default_role() {
        let result = UserAdminService::new(
            Arc::new(InMemoryRepo::new()),
            Arc::new(RecordingHasher::default()),
            Arc::new(StubBreachChecker::default()),
            Arc::new(StubStrengthEstimator),
            PasswordPolicy::new(&PasswordValidationConfig::default()).unwrap(),
            vec!["admin".to_string()],
            "ROLE_SUPER_ADMIN".to_string(),
        );
        assert!(matches!(result, Err(DomainError::Config(_))));
    }

    #[test]
    fn construction_rejects_unwritable_identifier_field() {
        let repo = InMemoryRepo {
            identifier_writable: false,
            ..InMemoryRepo::new()
        };
        let result = UserAdminService::new(
            Arc::new(repo),
            Arc::new(RecordingHasher::default()),
            Arc::new(StubBreachChecker::default()),
            Arc::new(StubStrengthEstimator),
            PasswordPolicy::new(&PasswordValidationConfig::default()).unwrap(),
            vec!["ROLE_USER".to_string()],
            "ROLE_SUPER_ADMIN".to_string(),
        );
        assert!(matches!(result, Err(DomainError::Config(_))));
    }

    // ── Create ──────────────────────────────────────────────────

    #[tokio::test]
    async fn create_rejects_duplicate_identifier_without_persisting() {
        let harness = harness(InMemoryRepo::with_users(vec![existing_user(
            "john",
            "john@example.com",
            &[],
        )]));

        let result = harness
            .service
            .create_user(create_dto("john", "other@example.com"))
            .await;

        assert!(matches!(result, Err(DomainError::Conflict(_))));
        assert_eq!(harness.repo.creates.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn create_rejects_duplicate_email() {
        let harness = harness(InMemoryRepo::with_users(vec![existing_user(
            "john",
            "john@example.com",
            &[],
        )]));

        let result = harness
            .service
            .create_user(create_dto("jane", "john@example.com"))
            .await;

        assert!(matches!(result, Err(DomainError::Conflict(_))));
        assert_eq!(harness.repo.creates.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn create_rejects_malformed_email() {
        let harness = harness(InMemoryRepo::new());

        let result = harness
            .service
            .create_user(create_dto("john", "john@fake"))
            .await;

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn create_rejects_blank_identifier() {
        let harness = harness(InMemoryRepo::new());

        let result = harness
            .service
            .create_user(create_dto("  ", "john@example.com"))
            .await;

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn create_with_generated_password_hashes_it_once() {
        let harness = harness(InMemoryRepo::new());

        let report = harness
            .service
            .create_user(CreateUserDto {
                identifier: "john".to_string(),
                email: "john@example.com".to_string(),
                password: None,
                generate_password: true,
            })
            .await
            .unwrap();

        assert!(report.generated);
        assert_eq!(report.password.chars().count(), GENERATED_PASSWORD_LENGTH);

        let inputs = harness.hasher.inputs.lock().unwrap();
        assert_eq!(inputs.as_slice(), &[report.password.clone()]);
    }

    #[tokio::test]
    async fn create_falls_back_to_generation_when_password_missing() {
        let harness = harness(InMemoryRepo::new());

        let report = harness
            .service
            .create_user(CreateUserDto {
                identifier: "john".to_string(),
                email: "john@example.com".to_string(),
                password: None,
                generate_password: false,
            })
            .await
            .unwrap();

        assert!(report.generated);
    }

    #[tokio::test]
    async fn create_assigns_default_roles_and_persists() {
        let harness = harness(InMemoryRepo::new());

        let report = harness
            .service
            .create_user(create_dto("john", "john@example.com"))
            .await
            .unwrap();
        assert!(!report.generated);

        let stored = harness.repo.stored("john").unwrap();
        assert_eq!(stored.roles, vec!["ROLE_USER"]);
        assert_eq!(stored.email.as_deref(), Some("john@example.com"));
        assert_eq!(
            stored.password_hash.as_deref(),
            Some("hashed:a sufficiently long password")
        );
        assert_eq!(harness.repo.creates.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn create_skips_unwritable_email_field() {
        let repo = InMemoryRepo {
            email_writable: false,
            ..InMemoryRepo::new()
        };
        let harness = harness(repo);

        harness
            .service
            .create_user(create_dto("john", "john@example.com"))
            .await
            .unwrap();

        let stored = harness.repo.stored("john").unwrap();
        assert_eq!(stored.email, None);
        assert!(stored.password_hash.is_some());
    }

    #[tokio::test]
    async fn create_runs_initialize_hook_before_persisting() {
        let repo = Arc::new(InMemoryRepo::new());
        let service = UserAdminService::new(
            repo.clone(),
            Arc::new(RecordingHasher::default()),
            Arc::new(StubBreachChecker::default()),
            Arc::new(StubStrengthEstimator),
            PasswordPolicy::new(&PasswordValidationConfig::default()).unwrap(),
            vec!["ROLE_USER".to_string()],
            "ROLE_SUPER_ADMIN".to_string(),
        )
        .unwrap()
        .with_initialize_user(|user| {
            user.add_role("ROLE_ONBOARDING");
        });

        service
            .create_user(create_dto("john", "john@example.com"))
            .await
            .unwrap();

        let stored = repo.stored("john").unwrap();
        assert_eq!(stored.roles, vec!["ROLE_USER", "ROLE_ONBOARDING"]);
    }

    // ── Change password ─────────────────────────────────────────

    #[tokio::test]
    async fn change_password_fails_for_unknown_identifier() {
        let harness = harness(InMemoryRepo::new());

        let result = harness
            .service
            .change_password("ghost", "a sufficiently long password")
            .await;

        assert!(matches!(result, Err(DomainError::NotFound { .. })));
        assert!(harness.hasher.inputs.lock().unwrap().is_empty());
        assert_eq!(harness.repo.updates.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn change_password_rejects_whitespace_only_password() {
        let harness = harness(InMemoryRepo::with_users(vec![existing_user(
            "john",
            "john@example.com",
            &[],
        )]));

        let result = harness.service.change_password("john", "   ").await;

        assert!(matches!(result, Err(DomainError::PasswordPolicy(_))));
        assert_eq!(harness.repo.updates.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn change_password_enforces_breach_policy() {
        let users = vec![existing_user("john", "john@example.com", &[])];
        let harness = harness_with(
            InMemoryRepo::with_users(users),
            PasswordValidationConfig {
                not_compromised: true,
                ..PasswordValidationConfig::default()
            },
        );

        let result = harness.service.change_password("john", "abc123").await;
        assert!(matches!(result, Err(DomainError::PasswordPolicy(_))));

        harness
            .service
            .change_password("john", "kTm29~vWq!x4PzH7")
            .await
            .unwrap();
        let stored = harness.repo.stored("john").unwrap();
        assert_eq!(stored.password_hash.as_deref(), Some("hashed:kTm29~vWq!x4PzH7"));
    }

    #[tokio::test]
    async fn change_password_trims_before_hashing() {
        let harness = harness(InMemoryRepo::with_users(vec![existing_user(
            "john",
            "john@example.com",
            &[],
        )]));

        harness
            .service
            .change_password("john", "  spaced out password  ")
            .await
            .unwrap();

        let inputs = harness.hasher.inputs.lock().unwrap();
        assert_eq!(inputs.as_slice(), &["spaced out password".to_string()]);
    }

    // ── Promote / demote ────────────────────────────────────────

    #[tokio::test]
    async fn promote_adds_role_and_persists() {
        let harness = harness(InMemoryRepo::with_users(vec![existing_user(
            "john",
            "john@example.com",
            &["ROLE_USER"],
        )]));

        let outcome = harness
            .service
            .promote("john", Some("role_test"), false)
            .await
            .unwrap();

        assert_eq!(outcome, RoleCommandOutcome::Applied);
        assert_eq!(harness.repo.updates.load(Ordering::SeqCst), 1);
        assert!(harness.repo.stored("john").unwrap().has_role("ROLE_TEST"));
    }

    #[tokio::test]
    async fn promote_is_idempotent_without_flushing() {
        let harness = harness(InMemoryRepo::with_users(vec![existing_user(
            "john",
            "john@example.com",
            &["ROLE_TEST"],
        )]));

        let outcome = harness
            .service
            .promote("john", Some("ROLE_TEST"), false)
            .await
            .unwrap();

        assert_eq!(outcome, RoleCommandOutcome::Noop);
        assert_eq!(harness.repo.updates.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn promote_then_demote_super_round_trips() {
        let harness = harness(InMemoryRepo::with_users(vec![existing_user(
            "john",
            "john@example.com",
            &[],
        )]));

        harness.service.promote("john", None, true).await.unwrap();
        assert!(harness
            .repo
            .stored("john")
            .unwrap()
            .has_role("ROLE_SUPER_ADMIN"));

        harness.service.demote("john", None, true).await.unwrap();
        assert!(!harness
            .repo
            .stored("john")
            .unwrap()
            .has_role("ROLE_SUPER_ADMIN"));
    }

    #[tokio::test]
    async fn promote_rejects_role_and_super_together_before_lookup() {
        let harness = harness(InMemoryRepo::with_users(vec![existing_user(
            "john",
            "john@example.com",
            &[],
        )]));

        let result = harness.service.promote("john", Some("ROLE_X"), true).await;

        assert!(matches!(result, Err(DomainError::Usage(_))));
        assert_eq!(harness.repo.finds.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn promote_requires_role_or_super() {
        let harness = harness(InMemoryRepo::new());

        let result = harness.service.promote("john", None, false).await;

        assert!(matches!(result, Err(DomainError::Usage(_))));
    }

    #[tokio::test]
    async fn promote_rejects_malformed_role() {
        let harness = harness(InMemoryRepo::with_users(vec![existing_user(
            "john",
            "john@example.com",
            &[],
        )]));

        let result = harness.service.promote("john", Some("test"), false).await;

        assert!(matches!(result, Err(DomainError::InvalidRole(_))));
    }

    #[tokio::test]
    async fn promote_fails_for_unknown_identifier() {
        let harness = harness(InMemoryRepo::new());

        let result = harness.service.promote("ghost", Some("ROLE_X"), false).await;

        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn demote_missing_role_is_noop() {
        let harness = harness(InMemoryRepo::with_users(vec![existing_user(
            "john",
            "john@example.com",
            &["ROLE_USER"],
        )]));

        let outcome = harness
            .service
            .demote("john", Some("ROLE_TEST"), false)
            .await
            .unwrap();

        assert_eq!(outcome, RoleCommandOutcome::Noop);
        assert_eq!(harness.repo.updates.load(Ordering::SeqCst), 0);
    }

    // ── Completion ──────────────────────────────────────────────

    #[tokio::test]
    async fn suggests_identifiers_of_all_users() {
        let harness = harness(InMemoryRepo::with_users(vec![
            existing_user("john", "john@example.com", &[]),
            existing_user("jane", "jane@example.com", &[]),
        ]));

        let identifiers = harness.service.suggest_identifiers().await.unwrap();
        assert_eq!(identifiers, vec!["john", "jane"]);
    }

    #[tokio::test]
    async fn suggests_promote_roles_union_with_super_admin() {
        let harness = harness(InMemoryRepo::with_users(vec![
            existing_user("john", "john@example.com", &["ROLE_USER", "ROLE_TEST"]),
            existing_user("jane", "jane@example.com", &["ROLE_USER"]),
        ]));

        let roles = harness.service.suggest_promote_roles().await.unwrap();
        assert_eq!(roles, vec!["ROLE_USER", "ROLE_TEST", "ROLE_SUPER_ADMIN"]);
    }

    #[tokio::test]
    async fn suggests_demote_roles_of_target_user_only() {
        let harness = harness(InMemoryRepo::with_users(vec![existing_user(
            "john",
            "john@example.com",
            &["ROLE_USER", "ROLE_TEST"],
        )]));

        let roles = harness.service.suggest_demote_roles("john").await.unwrap();
        assert_eq!(roles, vec!["ROLE_USER", "ROLE_TEST"]);

        let none = harness.service.suggest_demote_roles("ghost").await.unwrap();
        assert!(none.is_empty());
    }

    // ── Email helper ────────────────────────────────────────────

    #[test]
    fn email_validation_requires_dotted_domain() {
        assert!(email_is_valid("john@example.com"));
        assert!(!email_is_valid("john@fake"));
        assert!(!email_is_valid(""));
        assert!(!email_is_valid("not-an-email"));
    }
}
