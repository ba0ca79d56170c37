//! User service unit tests.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use mockall::predicate::eq;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::{User, UserInput, UserRole};
use logistics_service_lib::infra::{Repositories, TransactionContext, TxFuture, UnitOfWork};
use logistics_service_lib::repository::{MockUserRepository, UserRepository};
use logistics_service_lib::service::{UserManager, UserService};

fn create_test_user(id: Uuid, role: UserRole) -> User {
    User {
        id,
        username: "maria".to_string(),
        full_name: "Maria Silva".to_string(),
        email: "maria@example.com".to_string(),
        contact: None,
        address: None,
        tax_id: None,
        role,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn registration() -> UserInput {
    UserInput {
        username: "maria".to_string(),
        full_name: "Maria Silva".to_string(),
        email: "Maria@Example.com".to_string(),
        contact: None,
        address: None,
        tax_id: None,
        role: None,
    }
}

/// Test mock for UnitOfWork that wraps a MockUserRepository
struct TestUnitOfWork {
    user_repo: Arc<MockUserRepository>,
    db: DatabaseConnection,
}

impl TestUnitOfWork {
    fn new(user_repo: MockUserRepository) -> Self {
        Self {
            user_repo: Arc::new(user_repo),
            db: DatabaseConnection::Disconnected,
        }
    }
}

#[async_trait]
impl UnitOfWork for TestUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn reader(&self) -> Repositories<'_, DatabaseConnection> {
        Repositories::new(&self.db)
    }

    async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        // Transaction not supported in test mock
        Err(AppError::internal("Transactions not supported in test mock"))
    }

    async fn transaction_serializable<F, T>(&self, _f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        // Transaction not supported in test mock
        Err(AppError::internal("Transactions not supported in test mock"))
    }
}

#[tokio::test]
async fn test_get_user_success() {
    let user_id = Uuid::new_v4();

    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .with(eq(user_id))
        .returning(|id| Ok(Some(create_test_user(id, UserRole::Client))));

    let service = UserManager::new(Arc::new(TestUnitOfWork::new(repo)));
    let result = service.get_user(user_id).await;

    assert_eq!(result.unwrap().id, user_id);
}

#[tokio::test]
async fn test_get_user_not_found() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id().returning(|_| Ok(None));

    let service = UserManager::new(Arc::new(TestUnitOfWork::new(repo)));
    let result = service.get_user(Uuid::new_v4()).await;

    assert!(matches!(result.unwrap_err(), AppError::NotFound(_)));
}

#[tokio::test]
async fn test_register_user_success() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_username().returning(|_| Ok(None));
    repo.expect_find_by_email()
        .with(eq("maria@example.com"))
        .returning(|_| Ok(None));
    repo.expect_create()
        .times(1)
        .returning(|_| Ok(create_test_user(Uuid::new_v4(), UserRole::Client)));

    let service = UserManager::new(Arc::new(TestUnitOfWork::new(repo)));
    let user = service.register_user(registration()).await.unwrap();

    assert_eq!(user.role, UserRole::Client);
}

#[tokio::test]
async fn test_register_user_duplicate_username() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_username()
        .returning(|_| Ok(Some(create_test_user(Uuid::new_v4(), UserRole::Client))));
    repo.expect_create().never();

    let service = UserManager::new(Arc::new(TestUnitOfWork::new(repo)));
    let result = service.register_user(registration()).await;

    assert!(matches!(result.unwrap_err(), AppError::Conflict(_)));
}

#[tokio::test]
async fn test_register_user_duplicate_email() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_username().returning(|_| Ok(None));
    repo.expect_find_by_email()
        .returning(|_| Ok(Some(create_test_user(Uuid::new_v4(), UserRole::Client))));
    repo.expect_create().never();

    let service = UserManager::new(Arc::new(TestUnitOfWork::new(repo)));
    let result = service.register_user(registration()).await;

    assert!(result.unwrap_err().is_conflict());
}

#[tokio::test]
async fn test_register_user_invalid_email() {
    let mut repo = MockUserRepository::new();
    repo.expect_create().never();

    let mut input = registration();
    input.email = "not-an-email".to_string();

    let service = UserManager::new(Arc::new(TestUnitOfWork::new(repo)));
    let result = service.register_user(input).await;

    assert!(result.unwrap_err().is_validation());
}

#[tokio::test]
async fn test_actor_for_client_skips_employee_lookup() {
    let user_id = Uuid::new_v4();

    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .returning(|id| Ok(Some(create_test_user(id, UserRole::Client))));

    let service = UserManager::new(Arc::new(TestUnitOfWork::new(repo)));
    let actor = service.actor_for(user_id).await.unwrap();

    assert_eq!(actor.user_id, user_id);
    assert_eq!(actor.employee_id, None);
    assert_eq!(actor.contact, "maria@example.com");
}

#[tokio::test]
async fn test_list_users_success() {
    let mut repo = MockUserRepository::new();
    repo.expect_list().returning(|| {
        Ok(vec![
            create_test_user(Uuid::new_v4(), UserRole::Admin),
            create_test_user(Uuid::new_v4(), UserRole::Client),
        ])
    });

    let service = UserManager::new(Arc::new(TestUnitOfWork::new(repo)));
    let result = service.list_users().await;

    assert_eq!(result.unwrap().len(), 2);
}
