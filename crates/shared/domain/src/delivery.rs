//! Delivery entity.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::{collect, DomainError, DomainResult};

/// Delivery lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DeliveryStatus {
    #[default]
    Registered,
    Ready,
    Pending,
    #[serde(rename = "In Transit")]
    InTransit,
    Completed,
    Cancelled,
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Registered => "Registered",
            DeliveryStatus::Ready => "Ready",
            DeliveryStatus::Pending => "Pending",
            DeliveryStatus::InTransit => "In Transit",
            DeliveryStatus::Completed => "Completed",
            DeliveryStatus::Cancelled => "Cancelled",
        }
    }

    pub fn parse(s: &str) -> DomainResult<Self> {
        match s.trim() {
            "" | "Registered" => Ok(DeliveryStatus::Registered),
            "Ready" => Ok(DeliveryStatus::Ready),
            "Pending" => Ok(DeliveryStatus::Pending),
            "In Transit" => Ok(DeliveryStatus::InTransit),
            "Completed" => Ok(DeliveryStatus::Completed),
            "Cancelled" => Ok(DeliveryStatus::Cancelled),
            other => Err(DomainError::validation(format!(
                "Unknown delivery status '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Sender or recipient contact block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Party {
    #[validate(length(max = 100))]
    pub name: String,
    #[validate(length(max = 255))]
    pub address: String,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    #[validate(email(message = "Email address is invalid"))]
    pub email: Option<String>,
}

/// Delivery domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Delivery {
    pub id: Uuid,
    pub tracking_number: String,
    pub description: Option<String>,
    pub sender: Party,
    pub recipient: Party,
    pub item_type: Option<String>,
    pub weight: Decimal,
    pub dimensions: Option<String>,
    pub status: DeliveryStatus,
    pub priority: Option<String>,
    pub registered_at: DateTime<Utc>,
    /// Set by every mutation after creation
    pub updated_at: Option<DateTime<Utc>>,
    pub in_transition: bool,
    pub destination: Option<String>,
    pub delivery_date: Option<NaiveDate>,
    pub invoice_id: Option<Uuid>,
    pub driver_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
    pub route_id: Option<Uuid>,
}

impl Delivery {
    /// Record-level invariants, checked before every persisted write.
    pub fn check_invariants(&self) -> DomainResult<()> {
        let mut violations = Vec::new();
        if self.weight <= Decimal::ZERO {
            violations.push("Weight must be greater than 0.".to_string());
        }
        if self.status == DeliveryStatus::Completed && self.delivery_date.is_none() {
            violations.push("Cannot mark delivery as Completed without delivery_date.".to_string());
        }
        if let Some(updated_at) = self.updated_at {
            if updated_at <= self.registered_at {
                violations.push("Updated time must be after registered time.".to_string());
            }
        }
        collect(violations)
    }

    /// Stamp a mutation.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = Some(now);
    }

    /// Route-completion step for one delivery. Returns `false` when the
    /// delivery was already completed, leaving it untouched.
    pub fn complete_on(&mut self, today: NaiveDate, now: DateTime<Utc>) -> DomainResult<bool> {
        if self.status == DeliveryStatus::Completed {
            return Ok(false);
        }
        self.status = DeliveryStatus::Completed;
        self.delivery_date = Some(today);
        self.touch(now);
        self.check_invariants()
            .map_err(|e| DomainError::validation(format!("Delivery {}: {}", self.tracking_number, e)))?;
        Ok(true)
    }
}

/// Delivery create/update data
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DeliveryInput {
    #[validate(length(min = 1, max = 50, message = "Tracking number is required"))]
    pub tracking_number: String,
    pub description: Option<String>,
    #[validate(nested)]
    pub sender: Party,
    #[validate(nested)]
    pub recipient: Party,
    pub item_type: Option<String>,
    pub weight: Decimal,
    pub dimensions: Option<String>,
    #[serde(default)]
    pub status: DeliveryStatus,
    pub priority: Option<String>,
    /// Defaults to the time of creation; kept on update when absent
    pub registered_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub in_transition: bool,
    pub destination: Option<String>,
    pub delivery_date: Option<NaiveDate>,
    pub invoice_id: Option<Uuid>,
    pub driver_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
    pub route_id: Option<Uuid>,
}

impl DeliveryInput {
    pub fn validate_rules(&self) -> DomainResult<()> {
        self.validate()?;

        let mut violations = Vec::new();
        if self.weight <= Decimal::ZERO {
            violations.push("Weight must be a positive number.".to_string());
        }
        if self.status == DeliveryStatus::Completed && self.delivery_date.is_none() {
            violations.push("Cannot mark delivery as Completed without delivery_date.".to_string());
        }
        collect(violations)
    }

    /// Build the entity this input describes. `previous` carries the stored
    /// record on update; `now` is the write time.
    pub fn apply(self, id: Uuid, previous: Option<&Delivery>, now: DateTime<Utc>) -> Delivery {
        let (registered_at, updated_at) = match previous {
            Some(prev) => (self.registered_at.unwrap_or(prev.registered_at), Some(now)),
            None => (self.registered_at.unwrap_or(now), None),
        };

        Delivery {
            id,
            tracking_number: self.tracking_number.trim().to_string(),
            description: self.description,
            sender: self.sender,
            recipient: self.recipient,
            item_type: self.item_type,
            weight: self.weight,
            dimensions: self.dimensions,
            status: self.status,
            priority: self.priority,
            registered_at,
            updated_at,
            in_transition: self.in_transition,
            destination: self.destination,
            delivery_date: self.delivery_date,
            invoice_id: self.invoice_id,
            driver_id: self.driver_id,
            client_id: self.client_id,
            route_id: self.route_id,
        }
    }
}
