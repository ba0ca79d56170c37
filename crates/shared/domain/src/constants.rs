//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// User Roles
// =============================================================================

/// Platform administrator
pub const ROLE_ADMIN: &str = "admin";

/// Customer placing deliveries; default role for new users
pub const ROLE_CLIENT: &str = "client";

/// Employee whose position is Driver
pub const ROLE_DRIVER: &str = "driver";

/// Employee whose position is Staff
pub const ROLE_STAFF: &str = "staff";

/// Back-office manager
pub const ROLE_MANAGER: &str = "manager";

/// All valid role values
pub const VALID_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_CLIENT, ROLE_DRIVER, ROLE_STAFF, ROLE_MANAGER];

/// Check if a role value is valid
pub fn is_valid_role(role: &str) -> bool {
    VALID_ROLES.contains(&role)
}

// =============================================================================
// Employees
// =============================================================================

pub const POSITION_DRIVER: &str = "Driver";
pub const POSITION_STAFF: &str = "Staff";

// =============================================================================
// Vehicles
// =============================================================================

pub const MIN_VEHICLE_YEAR: i32 = 1900;
pub const MAX_VEHICLE_YEAR: i32 = 2100;

/// Status given to vehicles registered without one
pub const DEFAULT_VEHICLE_STATUS: &str = "Active";

// =============================================================================
// Invoices
// =============================================================================

/// Status forced onto every paid invoice
pub const INVOICE_STATUS_PAID: &str = "Paid";

/// Status given to invoices created without one
pub const INVOICE_STATUS_PENDING: &str = "Pending";

/// VAT applied on top of the item subtotal (percent)
pub const INVOICE_TAX_RATE_PERCENT: u32 = 23;

// =============================================================================
// Notifications
// =============================================================================

/// Default trailing window for "recent" notifications
pub const DEFAULT_NOTIFICATION_WINDOW_MINUTES: i64 = 3;

/// Default capacity of the dispatcher queue
pub const DEFAULT_NOTIFICATION_QUEUE_CAPACITY: usize = 256;

/// Default lifetime of a stored notification (7 days)
pub const DEFAULT_NOTIFICATION_TTL_SECONDS: u64 = 7 * 24 * 3600;

pub const NOTIFICATION_STATUS_PENDING: &str = "pending";
pub const NOTIFICATION_STATUS_SENT: &str = "sent";

// =============================================================================
// Formatting
// =============================================================================

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M:%S";
