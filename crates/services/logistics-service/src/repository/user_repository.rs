//! User repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use common::{AppError, AppResult, OptionExt};
use domain::{User, UserInput, UserRole};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find user by username
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Find user by email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Create a new user from validated input
    async fn create(&self, input: UserInput) -> AppResult<User>;

    /// List all users
    async fn list(&self) -> AppResult<Vec<User>>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        TxUserRepository::new(&self.db).find_by_id(id).await
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn create(&self, input: UserInput) -> AppResult<User> {
        let now = Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(input.username.trim().to_string()),
            full_name: Set(input.full_name),
            email: Set(input.email.trim().to_lowercase()),
            contact: Set(input.contact),
            address: Set(input.address),
            tax_id: Set(input.tax_id),
            role: Set(input.role.unwrap_or(UserRole::Client).to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(User::from(model))
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let models = UserEntity::find()
            .order_by_asc(user::Column::Username)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(User::from).collect())
    }
}

/// User access inside a unit of work.
///
/// Generic over the connection so the same queries run on a plain
/// connection or inside a transaction.
pub struct TxUserRepository<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> TxUserRepository<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id).one(self.conn).await?;
        Ok(result.map(User::from))
    }

    /// Overwrite the user's role; the employee record owns driver/staff roles.
    pub async fn set_role(&self, id: Uuid, role: UserRole) -> AppResult<User> {
        let user = UserEntity::find_by_id(id)
            .one(self.conn)
            .await?
            .ok_or_not_found("User")?;

        let mut active: ActiveModel = user.into();
        active.role = Set(role.to_string());
        active.updated_at = Set(Utc::now());

        let model = active.update(self.conn).await?;
        Ok(User::from(model))
    }
}
