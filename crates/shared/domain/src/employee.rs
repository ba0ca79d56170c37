//! Employee entity and its Driver / Staff specialization.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::constants::{POSITION_DRIVER, POSITION_STAFF};
use crate::error::{collect, DomainError, DomainResult};
use crate::user::UserRole;

/// Employee position. Each position maps to exactly one user role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    Driver,
    Staff,
}

impl Position {
    /// The role a user must hold while employed in this position
    pub fn role(&self) -> UserRole {
        match self {
            Position::Driver => UserRole::Driver,
            Position::Staff => UserRole::Staff,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Position::Driver => POSITION_DRIVER,
            Position::Staff => POSITION_STAFF,
        }
    }

    pub fn parse(s: &str) -> DomainResult<Self> {
        match s {
            POSITION_DRIVER => Ok(Position::Driver),
            POSITION_STAFF => Ok(Position::Staff),
            other => Err(DomainError::validation(format!(
                "Unknown position '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Driver-only data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct DriverInfo {
    #[validate(length(min = 1, max = 50, message = "License number is required"))]
    pub license_number: String,
    #[validate(length(max = 10))]
    pub license_category: String,
    pub license_expiry_date: NaiveDate,
    pub driving_experience_years: i32,
    pub driver_status: String,
}

impl DriverInfo {
    /// Rules evaluated against the calendar date of the write.
    pub fn validate_rules(&self, today: NaiveDate) -> DomainResult<()> {
        self.validate()?;

        let mut violations = Vec::new();
        if self.license_expiry_date <= today {
            violations.push("License expiry date must be in the future.".to_string());
        }
        if self.driving_experience_years < 0 {
            violations.push("Driving experience must be non-negative.".to_string());
        }
        collect(violations)
    }
}

/// Staff-only data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct StaffInfo {
    #[validate(length(min = 1, max = 100, message = "Department is required"))]
    pub department: String,
}

/// Exactly one specialization exists per employee; its variant decides the
/// employee's position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "position")]
pub enum EmployeeSpecialization {
    Driver(DriverInfo),
    Staff(StaffInfo),
}

impl EmployeeSpecialization {
    pub fn position(&self) -> Position {
        match self {
            EmployeeSpecialization::Driver(_) => Position::Driver,
            EmployeeSpecialization::Staff(_) => Position::Staff,
        }
    }

    pub fn validate_rules(&self, today: NaiveDate) -> DomainResult<()> {
        match self {
            EmployeeSpecialization::Driver(info) => info.validate_rules(today),
            EmployeeSpecialization::Staff(info) => info.validate().map_err(DomainError::from),
        }
    }
}

/// Employee domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: Uuid,
    pub user_id: Uuid,
    pub position: Position,
    pub schedule: Option<String>,
    pub wage: Decimal,
    pub hire_date: NaiveDate,
    pub is_active: bool,
    /// `None` only for rows written outside this system
    pub specialization: Option<EmployeeSpecialization>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Employee {
    pub fn is_driver(&self) -> bool {
        self.position == Position::Driver
    }

    pub fn driver_info(&self) -> Option<&DriverInfo> {
        match &self.specialization {
            Some(EmployeeSpecialization::Driver(info)) => Some(info),
            _ => None,
        }
    }

    pub fn staff_info(&self) -> Option<&StaffInfo> {
        match &self.specialization {
            Some(EmployeeSpecialization::Staff(info)) => Some(info),
            _ => None,
        }
    }
}

/// Employee create/update data
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EmployeeInput {
    pub user_id: Uuid,
    #[validate(length(max = 100))]
    pub schedule: Option<String>,
    pub wage: Decimal,
    pub hire_date: NaiveDate,
    pub is_active: bool,
    pub specialization: EmployeeSpecialization,
}

impl EmployeeInput {
    pub fn position(&self) -> Position {
        self.specialization.position()
    }

    /// Full field-level rule set; re-run on every write.
    pub fn validate_rules(&self, today: NaiveDate) -> DomainResult<()> {
        self.validate()?;
        if self.wage < Decimal::ZERO {
            return Err(DomainError::validation("Wage must be a positive number."));
        }
        self.specialization.validate_rules(today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn driver(expiry: NaiveDate) -> EmployeeSpecialization {
        EmployeeSpecialization::Driver(DriverInfo {
            license_number: "L-1234".into(),
            license_category: "C".into(),
            license_expiry_date: expiry,
            driving_experience_years: 4,
            driver_status: "Available".into(),
        })
    }

    fn input(spec: EmployeeSpecialization) -> EmployeeInput {
        EmployeeInput {
            user_id: Uuid::new_v4(),
            schedule: Some("Mon-Fri".into()),
            wage: dec!(1200.00),
            hire_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            is_active: true,
            specialization: spec,
        }
    }

    #[test]
    fn position_maps_to_role() {
        assert_eq!(Position::Driver.role(), UserRole::Driver);
        assert_eq!(Position::Staff.role(), UserRole::Staff);
    }

    #[test]
    fn license_expiring_today_is_rejected() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert!(input(driver(today)).validate_rules(today).is_err());
        assert!(input(driver(today + Duration::days(1)))
            .validate_rules(today)
            .is_ok());
    }

    #[test]
    fn negative_wage_is_rejected() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let mut emp = input(EmployeeSpecialization::Staff(StaffInfo {
            department: "Sorting".into(),
        }));
        emp.wage = dec!(-1);
        assert!(matches!(
            emp.validate_rules(today),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn specialization_is_tagged_by_position() {
        let json = r#"{"position":"Staff","department":"Customer care"}"#;
        let spec: EmployeeSpecialization = serde_json::from_str(json).unwrap();
        assert_eq!(spec.position(), Position::Staff);
    }
}
