//! Domain-level errors.
//!
//! These errors represent business rule violations and domain logic failures.
//! They are independent of infrastructure concerns (database, notification store).

use thiserror::Error;

/// Domain-specific errors for business rule violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed for a field or input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Uniqueness or reference conflict
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Role not permitted for the operation
    #[error("Forbidden")]
    Forbidden,

    /// Internal domain error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        DomainError::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity: impl Into<String>) -> Self {
        DomainError::NotFound(entity.into())
    }

    /// Create a conflict error
    pub fn conflict(msg: impl Into<String>) -> Self {
        DomainError::Conflict(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        DomainError::Internal(msg.into())
    }
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let message =
            first_message(&errors, "").unwrap_or_else(|| "Validation failed".to_string());
        DomainError::Validation(message)
    }
}

/// First field message in name order, descending into nested structs.
fn first_message(errors: &validator::ValidationErrors, prefix: &str) -> Option<String> {
    use validator::ValidationErrorsKind;

    let mut fields: Vec<_> = errors.errors().iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));

    fields.into_iter().find_map(|(field, kind)| {
        let path = format!("{}{}", prefix, field);
        match kind {
            ValidationErrorsKind::Field(errs) => errs.first().map(|e| match &e.message {
                Some(msg) => msg.to_string(),
                None => format!("{} is invalid", path),
            }),
            ValidationErrorsKind::Struct(inner) => first_message(inner, &format!("{}.", path)),
            ValidationErrorsKind::List(items) => items
                .iter()
                .find_map(|(idx, inner)| first_message(inner, &format!("{}[{}].", path, idx))),
        }
    })
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Turn a list of rule violations into a single validation error.
pub(crate) fn collect(violations: Vec<String>) -> DomainResult<()> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(DomainError::Validation(violations.join("; ")))
    }
}
