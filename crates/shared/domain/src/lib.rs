//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies:
//! entity types, their input structs and the record-level invariants checked
//! before anything is persisted.

pub mod constants;
pub mod delivery;
pub mod employee;
pub mod error;
pub mod invoice;
pub mod notification;
pub mod route;
pub mod user;
pub mod vehicle;
pub mod warehouse;

pub use constants::*;
pub use delivery::{Delivery, DeliveryInput, DeliveryStatus, Party};
pub use employee::{
    DriverInfo, Employee, EmployeeInput, EmployeeSpecialization, Position, StaffInfo,
};
pub use error::{DomainError, DomainResult};
pub use invoice::{derive_status, Invoice, InvoiceInput, InvoiceItem, InvoiceItemInput, InvoiceTotals};
pub use notification::{Notification, NotificationType};
pub use route::{Route, RouteInput, RouteSlot, RouteStatus, Stop};
pub use user::{Actor, DeliveryScope, InvoiceScope, RouteScope, User, UserInput, UserRole};
pub use vehicle::{Vehicle, VehicleInput};
pub use warehouse::{Warehouse, WarehouseInput};
