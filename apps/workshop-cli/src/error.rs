//! # API Error Type
//!
//! Unified error type for commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Workshop Manager                       │
//! │                                                                         │
//! │  Command Function  ── Result<T, ApiError>                               │
//! │         │                                                               │
//! │         ├── DbError::NotFound ────────────┐                             │
//! │         ├── CoreError::AdminRequired ─────┼──► ApiError { code, message}│
//! │         └── ValidationError (via Core) ───┘          │                  │
//! │                                                      ▼                  │
//! │                                    stderr as JSON, exit code 1          │
//! │                                                                         │
//! │  {"code":"FORBIDDEN","message":"Admin role required to view real costs"}│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A wrong PIN is not an error: `login` answers `{"success": false}`.

use serde::Serialize;
use workshop_core::{CoreError, ValidationError};
use workshop_db::DbError;

/// API error returned from commands.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Order or task not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// The session role may not do this
    Forbidden,

    /// Database operation failed
    DatabaseError,

    /// Business rule prevented the operation
    BusinessLogic,

    /// Internal error
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => ApiError::new(
                ErrorCode::ValidationError,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::Validation(e) => ApiError::validation(e.to_string()),
            DbError::ConnectionFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::Corrupt { key, reason } => {
                tracing::error!(key = %key, "Corrupt stored value: {}", reason);
                ApiError::new(ErrorCode::DatabaseError, format!("Stored data is corrupt: {}", key))
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                ApiError::new(ErrorCode::ValidationError, "Invalid reference")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::OrderNotFound(id) => ApiError::not_found("Work order", &id),
            CoreError::TaskNotFound { order_id, task_id } => {
                ApiError::not_found("Task", &format!("{} (order {})", task_id, order_id))
            }
            e @ CoreError::AdminRequired { .. } => ApiError::new(ErrorCode::Forbidden, e.to_string()),
            CoreError::MissingClientPhone { order_id } => ApiError::new(
                ErrorCode::BusinessLogic,
                format!(
                    "Sin teléfono: agregue el teléfono del cliente en la recepción de la orden {}",
                    order_id
                ),
            ),
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
            CoreError::Render(e) => {
                tracing::error!("Quote rendering failed: {}", e);
                ApiError::internal("Could not render the quote")
            }
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_shape() {
        let err = ApiError::from(CoreError::admin_required("view real costs"));
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(
            json,
            r#"{"code":"FORBIDDEN","message":"Admin role required to view real costs"}"#
        );
    }

    #[test]
    fn test_not_found_mapping() {
        let err = ApiError::from(DbError::not_found("Work order", "250615-07"));
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Work order not found: 250615-07");
    }

    #[test]
    fn test_validation_mapping() {
        let err = ApiError::from(CoreError::from(ValidationError::MissingVehicleIdentity));
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(err.message.contains("Placas o el VIN"));
    }
}
