//! Application services.
//!
//! Each service owns the cross-entity rules for one aggregate. Writes run in
//! a single unit-of-work transaction; notifications are queued only after the
//! transaction has committed.

mod container;
mod delivery_service;
mod employee_service;
mod fleet_service;
mod invoice_service;
mod route_service;
mod user_service;

pub use container::{ServiceContainer, Services};
pub use delivery_service::{DeliveryManager, DeliveryService};
pub use employee_service::{EmployeeManager, EmployeeService};
pub use fleet_service::{FleetManager, FleetService};
pub use invoice_service::{InvoiceManager, InvoiceService};
pub use route_service::{cascade_route_completion, RouteManager, RouteService};
pub use user_service::{UserManager, UserService};

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
