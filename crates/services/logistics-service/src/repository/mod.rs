//! Repository layer for data access.
//!
//! Apart from `UserStore`, repositories borrow a connection and are generic
//! over it, so the same queries serve plain reads and unit-of-work writes.

pub mod entities;
mod delivery_repository;
mod employee_repository;
mod fleet_repository;
mod invoice_repository;
mod route_repository;
mod user_repository;

pub use delivery_repository::DeliveryRepo;
pub use employee_repository::EmployeeRepo;
pub use fleet_repository::{VehicleRepo, WarehouseRepo};
pub use invoice_repository::InvoiceRepo;
pub use route_repository::RouteRepo;
pub use user_repository::{TxUserRepository, UserRepository, UserStore};

#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
