use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder,
};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::{user, AuthService, RbacService},
    db::DbPool,
    errors::ServiceError,
    events::{Event, EventSender},
};

/// Create request after handler-level validation
#[derive(Debug, Clone)]
pub struct CreateUserCommand {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub role: String,
    pub permissions: Vec<String>,
}

/// Update request; absent fields stay untouched
#[derive(Debug, Clone, Default)]
pub struct UpdateUserCommand {
    pub email: Option<String>,
    pub password: Option<String>,
    pub full_name: Option<String>,
    pub role: Option<String>,
    pub permissions: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

/// Service for user account management
#[derive(Clone)]
pub struct UserService {
    db: Arc<DbPool>,
    auth_service: Arc<AuthService>,
    event_sender: EventSender,
    rbac: RbacService,
}

impl UserService {
    pub fn new(db: Arc<DbPool>, auth_service: Arc<AuthService>, event_sender: EventSender) -> Self {
        Self {
            db,
            auth_service,
            event_sender,
            rbac: RbacService::new(),
        }
    }

    /// Create a user with an argon2-hashed password. Usernames and emails
    /// are unique among active users.
    #[instrument(skip(self, command))]
    pub async fn create_user(
        &self,
        command: CreateUserCommand,
    ) -> Result<user::Model, ServiceError> {
        if !self.rbac.is_valid_role(&command.role) {
            return Err(ServiceError::ValidationError(format!(
                "Unknown role '{}'",
                command.role
            )));
        }
        if command.password.len() < 8 {
            return Err(ServiceError::ValidationError(
                "Password must be at least 8 characters".to_string(),
            ));
        }

        let db = self.db.as_ref();
        let duplicate = user::Entity::find()
            .filter(user::Column::IsActive.eq(true))
            .filter(
                Condition::any()
                    .add(user::Column::Username.eq(command.username.clone()))
                    .add(user::Column::Email.eq(command.email.clone())),
            )
            .one(db)
            .await
            .map_err(ServiceError::db_error)?;
        if duplicate.is_some() {
            return Err(ServiceError::Conflict(
                "An active user with that username or email already exists".to_string(),
            ));
        }

        let password_hash = self
            .auth_service
            .hash_password(&command.password)
            .map_err(|e| ServiceError::HashError(e.to_string()))?;

        let row = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(command.username.clone()),
            email: Set(command.email),
            password_hash: Set(password_hash),
            full_name: Set(command.full_name),
            role: Set(command.role),
            permissions: Set(serde_json::json!(command.permissions)),
            is_active: Set(true),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        };

        let created = row.insert(db).await.map_err(ServiceError::db_error)?;

        info!(user_id = %created.id, username = %created.username, "user created");
        self.event_sender
            .send_or_log(Event::UserCreated(created.id))
            .await;

        Ok(created)
    }

    /// Get a user by ID
    pub async fn get_user(&self, id: Uuid) -> Result<Option<user::Model>, ServiceError> {
        user::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(ServiceError::db_error)
    }

    /// List users with pagination
    pub async fn list_users(
        &self,
        include_inactive: bool,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<user::Model>, u64), ServiceError> {
        let mut query = user::Entity::find();
        if !include_inactive {
            query = query.filter(user::Column::IsActive.eq(true));
        }

        let paginator = query
            .order_by_asc(user::Column::Username)
            .paginate(self.db.as_ref(), limit.max(1));
        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let rows = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::db_error)?;

        Ok((rows, total))
    }

    /// Update a user. `acting_user_id` guards against self-deactivation.
    #[instrument(skip(self, command))]
    pub async fn update_user(
        &self,
        id: Uuid,
        command: UpdateUserCommand,
        acting_user_id: Option<Uuid>,
    ) -> Result<user::Model, ServiceError> {
        let db = self.db.as_ref();

        let existing = user::Entity::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("User {} not found", id)))?;

        if let Some(role) = &command.role {
            if !self.rbac.is_valid_role(role) {
                return Err(ServiceError::ValidationError(format!(
                    "Unknown role '{}'",
                    role
                )));
            }
        }

        if command.is_active == Some(false) && acting_user_id == Some(id) {
            return Err(ServiceError::ValidationError(
                "Users cannot deactivate their own account".to_string(),
            ));
        }

        if let Some(email) = &command.email {
            if *email != existing.email {
                let duplicate = user::Entity::find()
                    .filter(user::Column::Email.eq(email.clone()))
                    .filter(user::Column::IsActive.eq(true))
                    .filter(user::Column::Id.ne(id))
                    .one(db)
                    .await
                    .map_err(ServiceError::db_error)?;
                if duplicate.is_some() {
                    return Err(ServiceError::Conflict(
                        "An active user with that email already exists".to_string(),
                    ));
                }
            }
        }

        let was_active = existing.is_active;
        let mut active: user::ActiveModel = existing.into();
        if let Some(email) = command.email {
            active.email = Set(email);
        }
        if let Some(password) = command.password {
            if password.len() < 8 {
                return Err(ServiceError::ValidationError(
                    "Password must be at least 8 characters".to_string(),
                ));
            }
            let hash = self
                .auth_service
                .hash_password(&password)
                .map_err(|e| ServiceError::HashError(e.to_string()))?;
            active.password_hash = Set(hash);
        }
        if let Some(full_name) = command.full_name {
            active.full_name = Set(full_name);
        }
        if let Some(role) = command.role {
            active.role = Set(role);
        }
        if let Some(permissions) = command.permissions {
            active.permissions = Set(serde_json::json!(permissions));
        }
        if let Some(is_active) = command.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Some(Utc::now()));

        let updated = active.update(db).await.map_err(ServiceError::db_error)?;

        if was_active && !updated.is_active {
            self.event_sender
                .send_or_log(Event::UserDeactivated(updated.id))
                .await;
        } else {
            self.event_sender
                .send_or_log(Event::UserUpdated(updated.id))
                .await;
        }

        Ok(updated)
    }
}
