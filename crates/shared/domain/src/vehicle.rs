//! Vehicle entity.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::constants::{MAX_VEHICLE_YEAR, MIN_VEHICLE_YEAR};
use crate::error::{collect, DomainResult};

/// Vehicle domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: Uuid,
    pub plate_number: String,
    pub vehicle_type: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub capacity: Decimal,
    pub vehicle_status: String,
    pub year: i32,
    pub fuel_type: Option<String>,
    pub last_maintenance_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Vehicle create/update data
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VehicleInput {
    #[validate(length(min = 1, max = 20, message = "Plate number is required"))]
    pub plate_number: String,
    #[validate(length(max = 50))]
    pub vehicle_type: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub capacity: Decimal,
    /// Defaults to `Active`
    pub vehicle_status: Option<String>,
    pub year: i32,
    pub fuel_type: Option<String>,
    pub last_maintenance_date: Option<NaiveDate>,
}

impl VehicleInput {
    pub fn validate_rules(&self) -> DomainResult<()> {
        self.validate()?;

        let mut violations = Vec::new();
        if self.capacity <= Decimal::ZERO {
            violations.push("Capacity must be a positive number.".to_string());
        }
        if !(MIN_VEHICLE_YEAR..=MAX_VEHICLE_YEAR).contains(&self.year) {
            violations.push(format!(
                "Year must be between {} and {}.",
                MIN_VEHICLE_YEAR, MAX_VEHICLE_YEAR
            ));
        }
        collect(violations)
    }

    /// Plates are compared case-insensitively and without surrounding blanks
    pub fn normalized_plate(&self) -> String {
        self.plate_number.trim().to_uppercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn input(capacity: Decimal, year: i32) -> VehicleInput {
        VehicleInput {
            plate_number: " ab-12-cd ".into(),
            vehicle_type: "Van".into(),
            brand: Some("Renault".into()),
            model: Some("Master".into()),
            capacity,
            vehicle_status: None,
            year,
            fuel_type: Some("Diesel".into()),
            last_maintenance_date: None,
        }
    }

    #[test]
    fn year_bounds_are_inclusive() {
        assert!(input(dec!(1000), 1900).validate_rules().is_ok());
        assert!(input(dec!(1000), 2100).validate_rules().is_ok());
        assert!(input(dec!(1000), 1899).validate_rules().is_err());
        assert!(input(dec!(1000), 2101).validate_rules().is_err());
    }

    #[test]
    fn capacity_must_be_positive() {
        assert!(input(dec!(0), 2020).validate_rules().is_err());
    }

    #[test]
    fn plate_is_normalized() {
        assert_eq!(input(dec!(1), 2020).normalized_plate(), "AB-12-CD");
    }
}
