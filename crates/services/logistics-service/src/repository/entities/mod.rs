//! SeaORM database entities.

pub mod delivery;
pub mod employee;
pub mod employee_driver;
pub mod employee_staff;
pub mod invoice;
pub mod invoice_item;
pub mod route;
pub mod user;
pub mod vehicle;
pub mod warehouse;
