//! User service - registration and lookup of platform users.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use common::{AppError, AppResult, OptionExt};
use domain::{Actor, User, UserInput};

use crate::infra::UnitOfWork;

#[async_trait]
pub trait UserService: Send + Sync {
    /// Register a new user; the role defaults to `client`.
    async fn register_user(&self, input: UserInput) -> AppResult<User>;

    async fn get_user(&self, id: Uuid) -> AppResult<User>;

    async fn get_user_by_username(&self, username: &str) -> AppResult<User>;

    async fn list_users(&self) -> AppResult<Vec<User>>;

    /// Build the caller identity for a stored user, including the employee
    /// record drivers need for scoped reads.
    async fn actor_for(&self, user_id: Uuid) -> AppResult<Actor>;
}

pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork + 'static> UserService for UserManager<U> {
    #[tracing::instrument(skip(self, input), fields(username = %input.username))]
    async fn register_user(&self, input: UserInput) -> AppResult<User> {
        input.validate()?;

        let repo = self.uow.users();
        if repo.find_by_username(input.username.trim()).await?.is_some() {
            return Err(AppError::conflict(format!(
                "Username '{}' is already taken",
                input.username.trim()
            )));
        }
        let email = input.email.trim().to_lowercase();
        if repo.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict(format!(
                "Email '{}' is already registered",
                email
            )));
        }

        let user = repo.create(input).await?;
        tracing::info!(user_id = %user.id, role = %user.role, "User registered");
        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.uow.users().find_by_id(id).await?.ok_or_not_found("User")
    }

    async fn get_user_by_username(&self, username: &str) -> AppResult<User> {
        self.uow
            .users()
            .find_by_username(username)
            .await?
            .ok_or_not_found("User")
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        self.uow.users().list().await
    }

    async fn actor_for(&self, user_id: Uuid) -> AppResult<Actor> {
        let user = self.get_user(user_id).await?;
        let actor = Actor::new(user.id, user.role, user.notification_contact());

        if !user.role.can_become_employee() {
            return Ok(actor);
        }
        let employee = self.uow.reader().employees().find_by_user(user.id).await?;
        Ok(match employee {
            Some(e) => actor.with_employee(e.id),
            None => actor,
        })
    }
}
