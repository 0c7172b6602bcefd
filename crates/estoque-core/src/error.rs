//! # Error Types
//!
//! Domain-specific error types for estoque-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  estoque-core errors (this file)                                       │
//! │  ├── CoreError        - Ledger / credential rule violations            │
//! │  ├── ValidationError  - Input validation failures                      │
//! │  └── ErrorKind        - Coarse classification used by every layer      │
//! │                                                                         │
//! │  estoque-db errors (separate crate)                                    │
//! │  ├── DbError          - Database operation failures                    │
//! │  └── StoreError       - CoreError | DbError                            │
//! │                                                                         │
//! │  estoque-cli errors (app)                                              │
//! │  └── AppError         - What the user sees                             │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → StoreError → AppError → Terminal  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Error Kind
// =============================================================================

/// Coarse error classification shared by every layer.
///
/// Callers that only need to know *what sort* of failure happened (tests,
/// the terminal front end) match on this instead of on concrete variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Non-numeric, non-positive or empty input.
    InvalidInput,
    /// Username already registered.
    DuplicateUser,
    /// Unknown good id.
    NotFound,
    /// Sale exceeds remaining stock.
    InsufficientStock,
    /// Persistence or file system failure.
    Storage,
}

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Good cannot be found.
    ///
    /// ## When This Occurs
    /// - Id was never registered
    /// - Good was deleted (deletion is permanent)
    #[error("Good not found: {0}")]
    GoodNotFound(String),

    /// Username is already taken.
    #[error("User already exists: {0}")]
    DuplicateUser(String),

    /// Insufficient stock to complete a sale.
    ///
    /// ## User Workflow
    /// ```text
    /// Record sale (qty: 3)
    ///      │
    ///      ▼
    /// Check stock: purchased=5, sold=3 → available=2
    ///      │
    ///      ▼
    /// InsufficientStock { id: "P1", available: 2, requested: 3 }
    ///      │
    ///      ▼
    /// Terminal shows: "Insufficient stock for P1: available 2, requested 3"
    /// ```
    #[error("Insufficient stock for {id}: available {available}, requested {requested}")]
    InsufficientStock {
        id: String,
        available: i64,
        requested: i64,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Returns the coarse classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::GoodNotFound(_) => ErrorKind::NotFound,
            CoreError::DuplicateUser(_) => ErrorKind::DuplicateUser,
            CoreError::InsufficientStock { .. } => ErrorKind::InsufficientStock,
            CoreError::Validation(_) => ErrorKind::InvalidInput,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., a price that is not a number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Arithmetic on the field would overflow.
    #[error("{field} is too large")]
    Overflow { field: String },
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
        let err = CoreError::InsufficientStock {
            id: "P1".to_string(),
            available: 2,
            requested: 3,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for P1: available 2, requested 3"
        );

        let err = CoreError::GoodNotFound("X9".to_string());
        assert_eq!(err.to_string(), "Good not found: X9");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "id".to_string(),
        };
        assert_eq!(err.to_string(), "id is required");

        let err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        assert_eq!(err.to_string(), "quantity must be positive");
    }

    #[test]
    fn test_kind_mapping() {
        assert_eq!(
            CoreError::GoodNotFound("a".into()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            CoreError::DuplicateUser("a".into()).kind(),
            ErrorKind::DuplicateUser
        );
        let validation: CoreError = ValidationError::Required {
            field: "name".to_string(),
        }
        .into();
        assert_eq!(validation.kind(), ErrorKind::InvalidInput);
    }
}
