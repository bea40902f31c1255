//! # Error Types
//!
//! Domain-specific error types for workshop-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  workshop-core errors (this file)                                      │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  workshop-db errors (separate crate)                                   │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  CLI command errors (in app)                                           │
//! │  └── ApiError         - What the user sees (serialized)                │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Things that are *expected* outcomes are not errors here: a wrong PIN is a
//! `false`, a zero sale total is a 0% margin, and a broken counter store is a
//! random fallback ID.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Work order cannot be found.
    #[error("Work order not found: {0}")]
    OrderNotFound(String),

    /// Task cannot be found within its order.
    #[error("Task {task_id} not found in order {order_id}")]
    TaskNotFound { order_id: String, task_id: String },

    /// The operation needs the admin role.
    ///
    /// ## When This Occurs
    /// - Editing real costs from a mechanic session
    /// - Requesting the admin budget view without logging in
    #[error("Admin role required to {action}")]
    AdminRequired { action: String },

    /// A client quote cannot be shared because the order has no phone.
    #[error("Client phone is missing for order {order_id}")]
    MissingClientPhone { order_id: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The printable quote template failed to render.
    #[error("Quote rendering failed: {0}")]
    Render(#[from] askama::Error),
}

impl CoreError {
    /// Creates an AdminRequired error for the given action.
    pub fn admin_required(action: impl Into<String>) -> Self {
        CoreError::AdminRequired {
            action: action.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (non-numeric PIN, malformed order ID, ...).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Reception needs something to identify the vehicle by.
    #[error("Se requiere al menos las Placas o el VIN del vehículo")]
    MissingVehicleIdentity,
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::TaskNotFound {
            order_id: "250615-01".to_string(),
            task_id: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "Task abc not found in order 250615-01");

        let err = CoreError::admin_required("view real costs");
        assert_eq!(err.to_string(), "Admin role required to view real costs");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::TooShort {
            field: "pin".to_string(),
            min: 4,
        };
        assert_eq!(err.to_string(), "pin must be at least 4 characters");
        assert_eq!(
            ValidationError::MissingVehicleIdentity.to_string(),
            "Se requiere al menos las Placas o el VIN del vehículo"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::MissingVehicleIdentity.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
