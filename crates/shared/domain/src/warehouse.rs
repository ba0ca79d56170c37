//! Warehouse entity.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::{collect, DomainResult};

/// Warehouse domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Warehouse {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub contact: Option<String>,
    pub po_schedule_open: NaiveTime,
    pub po_schedule_close: NaiveTime,
    pub maximum_storage_capacity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Warehouse create/update data
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct WarehouseInput {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 255, message = "Address is required"))]
    pub address: String,
    #[validate(length(max = 20))]
    pub contact: Option<String>,
    pub po_schedule_open: NaiveTime,
    pub po_schedule_close: NaiveTime,
    pub maximum_storage_capacity: i32,
}

impl WarehouseInput {
    pub fn validate_rules(&self) -> DomainResult<()> {
        self.validate()?;

        let mut violations = Vec::new();
        if self.po_schedule_close <= self.po_schedule_open {
            violations.push("Closing time must be after opening time.".to_string());
        }
        if self.maximum_storage_capacity <= 0 {
            violations.push("Maximum storage capacity must be positive.".to_string());
        }
        collect(violations)
    }
}
