//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::constants::{ROLE_ADMIN, ROLE_CLIENT, ROLE_DRIVER, ROLE_MANAGER, ROLE_STAFF};
use crate::error::{DomainError, DomainResult};

/// User roles enumeration.
///
/// The role is the single source of truth for authorization. `Driver` and
/// `Staff` are owned by the employee record attached to the same user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Client,
    Driver,
    Staff,
    Manager,
}

impl UserRole {
    /// Check if this role has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    /// Roles that may never be attached to an employee record
    pub fn can_become_employee(&self) -> bool {
        !matches!(self, UserRole::Admin | UserRole::Client)
    }

    /// Roles that see every delivery, invoice and route
    pub fn sees_everything(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Manager | UserRole::Staff)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => ROLE_ADMIN,
            UserRole::Client => ROLE_CLIENT,
            UserRole::Driver => ROLE_DRIVER,
            UserRole::Staff => ROLE_STAFF,
            UserRole::Manager => ROLE_MANAGER,
        }
    }

    /// Strict parse, for input that must name a known role
    pub fn parse(s: &str) -> DomainResult<Self> {
        match s {
            ROLE_ADMIN => Ok(UserRole::Admin),
            ROLE_CLIENT => Ok(UserRole::Client),
            ROLE_DRIVER => Ok(UserRole::Driver),
            ROLE_STAFF => Ok(UserRole::Staff),
            ROLE_MANAGER => Ok(UserRole::Manager),
            other => Err(DomainError::validation(format!("Unknown role '{}'", other))),
        }
    }
}

/// Lenient conversion for stored values; unknown roles degrade to `Client`,
/// the least privileged role.
impl From<&str> for UserRole {
    fn from(s: &str) -> Self {
        UserRole::parse(s).unwrap_or(UserRole::Client)
    }
}

impl From<String> for UserRole {
    fn from(s: String) -> Self {
        UserRole::from(s.as_str())
    }
}

impl From<UserRole> for String {
    fn from(role: UserRole) -> Self {
        role.as_str().to_string()
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub contact: Option<String>,
    pub address: Option<String>,
    pub tax_id: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Check if user has admin role
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Notifications are addressed to the user's email.
    pub fn notification_contact(&self) -> &str {
        &self.email
    }
}

/// User registration data
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UserInput {
    #[validate(length(min = 1, max = 150, message = "Username is required"))]
    pub username: String,
    #[validate(length(max = 150))]
    pub full_name: String,
    #[validate(email(message = "Email address is invalid"))]
    pub email: String,
    #[validate(length(max = 20, message = "Contact must be at most 20 characters"))]
    pub contact: Option<String>,
    #[validate(length(max = 255))]
    pub address: Option<String>,
    pub tax_id: Option<String>,
    /// Defaults to `client`
    pub role: Option<UserRole>,
}

/// Caller identity handed in by the (external) access-control layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: Uuid,
    pub role: UserRole,
    /// Employee record of this user, when the user is a driver or staff member
    pub employee_id: Option<Uuid>,
    /// Recipient contact for operator-facing notifications
    pub contact: String,
}

impl Actor {
    pub fn new(user_id: Uuid, role: UserRole, contact: impl Into<String>) -> Self {
        Self {
            user_id,
            role,
            employee_id: None,
            contact: contact.into(),
        }
    }

    pub fn with_employee(mut self, employee_id: Uuid) -> Self {
        self.employee_id = Some(employee_id);
        self
    }

    /// Which deliveries this caller may list
    pub fn delivery_scope(&self) -> DeliveryScope {
        match self.role {
            UserRole::Admin | UserRole::Manager | UserRole::Staff => DeliveryScope::All,
            UserRole::Driver => match self.employee_id {
                Some(id) => DeliveryScope::Driver(id),
                None => DeliveryScope::Nothing,
            },
            UserRole::Client => DeliveryScope::Client(self.user_id),
        }
    }

    /// Which routes this caller may list; clients see none
    pub fn route_scope(&self) -> DomainResult<RouteScope> {
        match self.role {
            UserRole::Admin | UserRole::Manager | UserRole::Staff => Ok(RouteScope::All),
            UserRole::Driver => Ok(match self.employee_id {
                Some(id) => RouteScope::Driver(id),
                None => RouteScope::Nothing,
            }),
            UserRole::Client => Err(DomainError::Forbidden),
        }
    }

    /// Which invoices this caller may list
    pub fn invoice_scope(&self) -> DomainResult<InvoiceScope> {
        match self.role {
            UserRole::Admin | UserRole::Manager => Ok(InvoiceScope::All),
            UserRole::Client => Ok(InvoiceScope::Owner(self.user_id)),
            UserRole::Driver | UserRole::Staff => Err(DomainError::Forbidden),
        }
    }
}

/// Row filter applied to delivery listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryScope {
    All,
    /// Deliveries assigned to this employee
    Driver(Uuid),
    /// Deliveries owned by this client user
    Client(Uuid),
    /// Driver user without an employee record
    Nothing,
}

impl DeliveryScope {
    pub fn admits(&self, driver_id: Option<Uuid>, client_id: Option<Uuid>) -> bool {
        match self {
            DeliveryScope::All => true,
            DeliveryScope::Driver(id) => driver_id == Some(*id),
            DeliveryScope::Client(id) => client_id == Some(*id),
            DeliveryScope::Nothing => false,
        }
    }
}

/// Row filter applied to route listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteScope {
    All,
    Driver(Uuid),
    Nothing,
}

impl RouteScope {
    pub fn admits(&self, driver_id: Option<Uuid>) -> bool {
        match self {
            RouteScope::All => true,
            RouteScope::Driver(id) => driver_id == Some(*id),
            RouteScope::Nothing => false,
        }
    }
}

/// Row filter applied to invoice listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvoiceScope {
    All,
    Owner(Uuid),
}

impl InvoiceScope {
    pub fn admits(&self, owner: Option<Uuid>) -> bool {
        match self {
            InvoiceScope::All => true,
            InvoiceScope::Owner(id) => owner == Some(*id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_and_client_cannot_become_employees() {
        assert!(!UserRole::Admin.can_become_employee());
        assert!(!UserRole::Client.can_become_employee());
        assert!(UserRole::Manager.can_become_employee());
        assert!(UserRole::Driver.can_become_employee());
    }

    #[test]
    fn unknown_stored_role_degrades_to_client() {
        assert_eq!(UserRole::from("superuser"), UserRole::Client);
        assert_eq!(UserRole::from("staff"), UserRole::Staff);
        assert!(UserRole::parse("superuser").is_err());
    }

    #[test]
    fn delivery_scope_follows_role() {
        let user = Uuid::new_v4();
        let emp = Uuid::new_v4();

        let staff = Actor::new(user, UserRole::Staff, "s@example.com");
        assert_eq!(staff.delivery_scope(), DeliveryScope::All);

        let driver = Actor::new(user, UserRole::Driver, "d@example.com").with_employee(emp);
        assert_eq!(driver.delivery_scope(), DeliveryScope::Driver(emp));

        let orphan = Actor::new(user, UserRole::Driver, "d@example.com");
        assert_eq!(orphan.delivery_scope(), DeliveryScope::Nothing);

        let client = Actor::new(user, UserRole::Client, "c@example.com");
        assert_eq!(client.delivery_scope(), DeliveryScope::Client(user));
    }

    #[test]
    fn scopes_admit_only_matching_rows() {
        let me = Uuid::new_v4();
        let other = Uuid::new_v4();

        assert!(DeliveryScope::Client(me).admits(None, Some(me)));
        assert!(!DeliveryScope::Client(me).admits(Some(me), Some(other)));
        assert!(!DeliveryScope::Nothing.admits(Some(me), Some(me)));
        assert!(RouteScope::Driver(me).admits(Some(me)));
        assert!(!InvoiceScope::Owner(me).admits(None));

        let client = Actor::new(me, UserRole::Client, "c@example.com");
        assert_eq!(client.route_scope(), Err(DomainError::Forbidden));
    }

    #[test]
    fn drivers_cannot_list_invoices() {
        let driver = Actor::new(Uuid::new_v4(), UserRole::Driver, "d@example.com");
        assert_eq!(driver.invoice_scope(), Err(DomainError::Forbidden));
    }
}
