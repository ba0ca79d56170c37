//! Notification record.
//!
//! Notifications live outside the relational store; they only move from
//! unread to read.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::NOTIFICATION_STATUS_PENDING;

/// Event kinds recorded after a committed write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    EmployeeSaved,
    EmployeeDeleted,
    WarehouseSaved,
    WarehouseDeleted,
    VehicleSaved,
    VehicleDeleted,
    RouteCreated,
    RouteUpdated,
    RouteCompleted,
    RouteDeleted,
    InvoiceCreated,
    InvoiceUpdated,
    InvoicePaid,
    InvoiceDeleted,
    DeliveryCreated,
    DeliveryUpdated,
    DeliveryDeleted,
    DataImported,
    DataExported,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::EmployeeSaved => "employee_saved",
            NotificationType::EmployeeDeleted => "employee_deleted",
            NotificationType::WarehouseSaved => "warehouse_saved",
            NotificationType::WarehouseDeleted => "warehouse_deleted",
            NotificationType::VehicleSaved => "vehicle_saved",
            NotificationType::VehicleDeleted => "vehicle_deleted",
            NotificationType::RouteCreated => "route_created",
            NotificationType::RouteUpdated => "route_updated",
            NotificationType::RouteCompleted => "route_completed",
            NotificationType::RouteDeleted => "route_deleted",
            NotificationType::InvoiceCreated => "invoice_created",
            NotificationType::InvoiceUpdated => "invoice_updated",
            NotificationType::InvoicePaid => "invoice_paid",
            NotificationType::InvoiceDeleted => "invoice_deleted",
            NotificationType::DeliveryCreated => "delivery_created",
            NotificationType::DeliveryUpdated => "delivery_updated",
            NotificationType::DeliveryDeleted => "delivery_deleted",
            NotificationType::DataImported => "data_imported",
            NotificationType::DataExported => "data_exported",
        }
    }
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A stored notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub notification_type: NotificationType,
    pub recipient_contact: String,
    pub subject: String,
    pub message: String,
    pub status: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(
        notification_type: NotificationType,
        recipient_contact: impl Into<String>,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            notification_type,
            recipient_contact: recipient_contact.into(),
            subject: subject.into(),
            message: message.into(),
            status: NOTIFICATION_STATUS_PENDING.to_string(),
            is_read: false,
            created_at: Utc::now(),
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn created(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = at;
        self
    }

    /// Returns true if the notification was unread.
    pub fn mark_read(&mut self) -> bool {
        let changed = !self.is_read;
        self.is_read = true;
        changed
    }

    /// Whether `created_at` falls inside the trailing window ending at `now`.
    pub fn is_within(&self, window: Duration, now: DateTime<Utc>) -> bool {
        self.created_at >= now - window && self.created_at <= now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_excludes_old_notifications() {
        let now = Utc::now();
        let window = Duration::minutes(3);
        let fresh = Notification::new(NotificationType::RouteCompleted, "912", "s", "m")
            .created(now - Duration::minutes(1));
        let stale = fresh.clone().created(now - Duration::minutes(5));

        assert!(fresh.is_within(window, now));
        assert!(!stale.is_within(window, now));
    }

    #[test]
    fn mark_read_is_one_way() {
        let mut n = Notification::new(NotificationType::InvoicePaid, "a@b.pt", "s", "m");
        assert_eq!(n.status, "pending");
        assert!(n.mark_read());
        assert!(!n.mark_read());
        assert!(n.is_read);
    }

    #[test]
    fn type_serialises_snake_case() {
        let json = serde_json::to_string(&NotificationType::RouteCompleted).unwrap();
        assert_eq!(json, "\"route_completed\"");
    }
}
