//! Unit of Work pattern implementation.
//!
//! Every consistency-engine write runs inside `transaction`: the closure gets
//! a `TransactionContext` whose repositories all share one database
//! transaction, committed when the closure returns `Ok` and rolled back
//! otherwise.

use async_trait::async_trait;
use sea_orm::{
    AccessMode, ConnectionTrait, DatabaseConnection, DatabaseTransaction, IsolationLevel,
    TransactionTrait,
};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use common::{AppError, AppResult};

use crate::repository::{
    DeliveryRepo, EmployeeRepo, InvoiceRepo, RouteRepo, TxUserRepository, UserRepository,
    UserStore, VehicleRepo, WarehouseRepo,
};

/// Boxed future returned by transaction closures.
pub type TxFuture<'a, T> = Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>;

/// Unit of Work trait for dependency injection.
///
/// Note: This trait is not mockable directly due to generic methods.
/// For testing, mock at the repository level or use integration tests.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Get user repository
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Repositories bound to the plain connection, for reads.
    fn reader(&self) -> Repositories<'_, DatabaseConnection>;

    /// Execute a closure within a transaction.
    ///
    /// Uses ReadCommitted isolation; the slot and uniqueness guarantees come
    /// from unique indexes, not from isolation.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send;

    /// Execute a closure within a transaction with serializable isolation.
    async fn transaction_serializable<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send;
}

/// Repository access over one connection or transaction.
pub struct Repositories<'a, C> {
    conn: &'a C,
}

/// Repositories sharing the current database transaction.
pub type TransactionContext<'a> = Repositories<'a, DatabaseTransaction>;

impl<'a, C: ConnectionTrait> Repositories<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub fn users(&self) -> TxUserRepository<'a, C> {
        TxUserRepository::new(self.conn)
    }

    pub fn employees(&self) -> EmployeeRepo<'a, C> {
        EmployeeRepo::new(self.conn)
    }

    pub fn warehouses(&self) -> WarehouseRepo<'a, C> {
        WarehouseRepo::new(self.conn)
    }

    pub fn vehicles(&self) -> VehicleRepo<'a, C> {
        VehicleRepo::new(self.conn)
    }

    pub fn invoices(&self) -> InvoiceRepo<'a, C> {
        InvoiceRepo::new(self.conn)
    }

    pub fn routes(&self) -> RouteRepo<'a, C> {
        RouteRepo::new(self.conn)
    }

    pub fn deliveries(&self) -> DeliveryRepo<'a, C> {
        DeliveryRepo::new(self.conn)
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    user_repo: Arc<UserStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: DatabaseConnection) -> Self {
        let user_repo = Arc::new(UserStore::new(db.clone()));
        Self { db, user_repo }
    }

    /// Internal transaction execution with configurable isolation level
    async fn execute_transaction<F, T>(&self, isolation: IsolationLevel, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(Some(isolation), Some(AccessMode::ReadWrite))
            .await
            .map_err(AppError::from)?;

        let ctx = Repositories::new(&txn);

        match f(ctx).await {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn reader(&self) -> Repositories<'_, DatabaseConnection> {
        Repositories::new(&self.db)
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        self.execute_transaction(IsolationLevel::ReadCommitted, f).await
    }

    async fn transaction_serializable<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        self.execute_transaction(IsolationLevel::Serializable, f).await
    }
}
