//! Infrastructure layer - database, migrations and the unit of work.

mod db;
pub mod migrations;
pub mod unit_of_work;

pub use db::Database;
pub use migrations::Migrator;
pub use unit_of_work::{Persistence, Repositories, TransactionContext, TxFuture, UnitOfWork};
