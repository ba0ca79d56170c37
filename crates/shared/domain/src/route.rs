//! Route entity.
//!
//! A route moves one driver and one vehicle on one date. The
//! (driver, vehicle, delivery_date) slot can be booked once; completing a
//! route completes every delivery assigned to it.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::{collect, DomainError, DomainResult};

/// Route progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RouteStatus {
    #[default]
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    Cancelled,
}

impl RouteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteStatus::Pending => "Pending",
            RouteStatus::InProgress => "In Progress",
            RouteStatus::Completed => "Completed",
            RouteStatus::Cancelled => "Cancelled",
        }
    }

    pub fn parse(s: &str) -> DomainResult<Self> {
        match s.trim() {
            "" | "Pending" => Ok(RouteStatus::Pending),
            "In Progress" => Ok(RouteStatus::InProgress),
            "Completed" => Ok(RouteStatus::Completed),
            "Cancelled" => Ok(RouteStatus::Cancelled),
            other => Err(DomainError::validation(format!(
                "Unknown route status '{}'",
                other
            ))),
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, RouteStatus::Completed)
    }
}

impl std::fmt::Display for RouteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Name / address / contact of a route end point
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stop {
    pub name: Option<String>,
    pub address: Option<String>,
    pub contact: Option<String>,
}

/// Booking slot guarded by a unique index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RouteSlot {
    pub driver_id: Uuid,
    pub vehicle_id: Uuid,
    pub delivery_date: NaiveDate,
}

/// Route domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    pub id: Uuid,
    pub description: String,
    pub delivery_status: RouteStatus,
    pub delivery_date: NaiveDate,
    pub delivery_start_time: NaiveTime,
    pub delivery_end_time: NaiveTime,
    pub expected_duration_minutes: i32,
    pub kms_travelled: Decimal,
    pub driver_notes: Option<String>,
    pub driver_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,
    pub warehouse_id: Option<Uuid>,
    pub origin: Stop,
    pub destination: Stop,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Route create/update data
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RouteInput {
    #[validate(length(max = 255))]
    pub description: String,
    #[serde(default)]
    pub delivery_status: RouteStatus,
    pub delivery_date: NaiveDate,
    pub delivery_start_time: NaiveTime,
    pub delivery_end_time: NaiveTime,
    pub expected_duration_minutes: i32,
    #[serde(default)]
    pub kms_travelled: Decimal,
    pub driver_notes: Option<String>,
    pub driver_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,
    pub warehouse_id: Option<Uuid>,
    #[serde(default)]
    pub origin: Stop,
    #[serde(default)]
    pub destination: Stop,
}

impl RouteInput {
    pub fn validate_rules(&self) -> DomainResult<()> {
        self.validate()?;

        let mut violations = Vec::new();
        if self.delivery_end_time <= self.delivery_start_time {
            violations.push("End time must be after start time.".to_string());
        }
        if self.expected_duration_minutes <= 0 {
            violations.push("Expected duration must be positive.".to_string());
        }
        if self.kms_travelled < Decimal::ZERO {
            violations.push("Kilometres travelled cannot be negative.".to_string());
        }
        collect(violations)
    }

    /// The booked slot; only routes with both a driver and a vehicle occupy one.
    pub fn slot(&self) -> Option<RouteSlot> {
        match (self.driver_id, self.vehicle_id) {
            (Some(driver_id), Some(vehicle_id)) => Some(RouteSlot {
                driver_id,
                vehicle_id,
                delivery_date: self.delivery_date,
            }),
            _ => None,
        }
    }
}

/// Re-submit a stored route, e.g. to change only its status.
impl From<&Route> for RouteInput {
    fn from(route: &Route) -> Self {
        RouteInput {
            description: route.description.clone(),
            delivery_status: route.delivery_status,
            delivery_date: route.delivery_date,
            delivery_start_time: route.delivery_start_time,
            delivery_end_time: route.delivery_end_time,
            expected_duration_minutes: route.expected_duration_minutes,
            kms_travelled: route.kms_travelled,
            driver_notes: route.driver_notes.clone(),
            driver_id: route.driver_id,
            vehicle_id: route.vehicle_id,
            warehouse_id: route.warehouse_id,
            origin: route.origin.clone(),
            destination: route.destination.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(start: u32, end: u32, minutes: i32) -> RouteInput {
        RouteInput {
            description: "Lisbon loop".into(),
            delivery_status: RouteStatus::Pending,
            delivery_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            delivery_start_time: NaiveTime::from_hms_opt(start, 0, 0).unwrap(),
            delivery_end_time: NaiveTime::from_hms_opt(end, 0, 0).unwrap(),
            expected_duration_minutes: minutes,
            kms_travelled: Decimal::ZERO,
            driver_notes: None,
            driver_id: Some(Uuid::new_v4()),
            vehicle_id: None,
            warehouse_id: None,
            origin: Stop::default(),
            destination: Stop::default(),
        }
    }

    #[test]
    fn window_must_be_ordered() {
        assert!(input(9, 12, 180).validate_rules().is_ok());
        assert!(input(12, 9, 180).validate_rules().is_err());
    }

    #[test]
    fn duration_must_be_positive() {
        assert!(input(9, 12, 0).validate_rules().is_err());
    }

    #[test]
    fn slot_needs_driver_and_vehicle() {
        let mut route = input(9, 12, 60);
        assert!(route.slot().is_none());
        route.vehicle_id = Some(Uuid::new_v4());
        assert!(route.slot().is_some());
    }

    #[test]
    fn status_parse_accepts_blank_as_pending() {
        assert_eq!(RouteStatus::parse("").unwrap(), RouteStatus::Pending);
        assert_eq!(RouteStatus::parse("In Progress").unwrap(), RouteStatus::InProgress);
        assert!(RouteStatus::parse("Lost").is_err());
    }
}
