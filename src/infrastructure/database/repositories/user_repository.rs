use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};

use crate::config::UserEntityConfig;
use crate::domain::{DomainError, DomainResult, User, UserField, UserRepositoryInterface};
use crate::infrastructure::database::entities::user;

/// SeaORM-backed user repository.
///
/// The configured field names are resolved to entity columns once, at
/// construction: an unresolvable identifier is a deployment fault, while
/// unresolvable email/password columns simply mark those fields as not
/// writable (the capability probe the workflows consult).
pub struct UserRepository {
    db: DatabaseConnection,
    identifier_column: user::Column,
    email_column: Option<user::Column>,
    password_column: Option<user::Column>,
}

impl UserRepository {
    pub fn new(db: DatabaseConnection, entity: &UserEntityConfig) -> DomainResult<Self> {
        let identifier_column = resolve_column(&entity.identifier).ok_or_else(|| {
            DomainError::Config(format!(
                "Identifier field \"{}\" does not exist on the users table",
                entity.identifier
            ))
        })?;

        Ok(Self {
            db,
            identifier_column,
            email_column: resolve_column(&entity.email),
            password_column: resolve_column(&entity.password),
        })
    }

    fn column_for(&self, field: UserField) -> DomainResult<user::Column> {
        let column = match field {
            UserField::Identifier => Some(self.identifier_column),
            UserField::Email => self.email_column,
            UserField::Password => self.password_column,
        };
        column.ok_or_else(|| {
            DomainError::Storage(format!(
                "Field {:?} is not addressable on the users table",
                field
            ))
        })
    }

    fn to_active_model(&self, user: &User) -> DomainResult<user::ActiveModel> {
        let mut active = user::ActiveModel {
            id: Set(user.id.clone()),
            roles: Set(encode_roles(&user.roles)?),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
            ..Default::default()
        };

        active.set(self.identifier_column, user.identifier.clone().into());
        if let (Some(column), Some(email)) = (self.email_column, user.email.as_ref()) {
            active.set(column, email.clone().into());
        }
        if let (Some(column), Some(hash)) = (self.password_column, user.password_hash.as_ref()) {
            active.set(column, hash.clone().into());
        }

        Ok(active)
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn resolve_column(name: &str) -> Option<user::Column> {
    match name {
        "username" => Some(user::Column::Username),
        "email" => Some(user::Column::Email),
        "password" | "password_hash" => Some(user::Column::PasswordHash),
        _ => None,
    }
}

fn encode_roles(roles: &[String]) -> DomainResult<String> {
    serde_json::to_string(roles)
        .map_err(|e| DomainError::Storage(format!("Failed to encode roles: {}", e)))
}

fn decode_roles(raw: &str) -> DomainResult<Vec<String>> {
    serde_json::from_str(raw)
        .map_err(|e| DomainError::Storage(format!("Invalid roles payload: {}", e)))
}

fn model_to_domain(identifier_column: user::Column, model: user::Model) -> DomainResult<User> {
    let identifier = match identifier_column {
        user::Column::Username => model.username.clone(),
        user::Column::Email => model.email.clone().unwrap_or_default(),
        _ => model.username.clone(),
    };

    Ok(User {
        id: model.id,
        identifier,
        email: model.email,
        password_hash: model.password_hash,
        roles: decode_roles(&model.roles)?,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(format!("Database error: {}", e))
}

fn is_unique_violation(e: &sea_orm::DbErr) -> bool {
    let message = e.to_string();
    message.contains("UNIQUE") || message.contains("duplicate")
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl UserRepositoryInterface for UserRepository {
    async fn find_one_by(&self, field: UserField, value: &str) -> DomainResult<Option<User>> {
        let column = self.column_for(field)?;
        let model = user::Entity::find()
            .filter(column.eq(value))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        model
            .map(|model| model_to_domain(self.identifier_column, model))
            .transpose()
    }

    async fn find_all(&self) -> DomainResult<Vec<User>> {
        let models = user::Entity::find().all(&self.db).await.map_err(db_err)?;

        models
            .into_iter()
            .map(|model| model_to_domain(self.identifier_column, model))
            .collect()
    }

    async fn count_by(&self, field: UserField, value: &str) -> DomainResult<u64> {
        let column = self.column_for(field)?;
        user::Entity::find()
            .filter(column.eq(value))
            .count(&self.db)
            .await
            .map_err(db_err)
    }

    async fn create_user(&self, user: &User) -> DomainResult<()> {
        let active = self.to_active_model(user)?;

        active.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::Conflict("Username or email already exists".to_string())
            } else {
                db_err(e)
            }
        })?;

        Ok(())
    }

    async fn update_user(&self, user: &User) -> DomainResult<()> {
        let mut active = self.to_active_model(user)?;
        active.updated_at = Set(Utc::now());
        active.update(&self.db).await.map_err(db_err)?;

        Ok(())
    }

    fn is_writable(&self, field: UserField) -> bool {
        match field {
            UserField::Identifier => true,
            UserField::Email => self.email_column.is_some(),
            UserField::Password => self.password_column.is_some(),
        }
    }
}
