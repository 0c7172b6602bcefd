//! # Application Error Type
//!
//! Unified error type for the terminal front end.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in EstoquePlus                            │
//! │                                                                         │
//! │  Menu action                                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function → Result<T, AppError>                          │  │
//! │  │                                                                  │  │
//! │  │  StoreError::Db(..)    ─── logged, generic message ──┐           │  │
//! │  │  StoreError::Core(..)  ─── message shown as is ──────┤           │  │
//! │  │  io::Error             ─── logged, generic message ──┼─► AppError│  │
//! │  │  ConfigError           ─── message shown as is ──────┘           │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Menu loop prints "Error: <message>" and shows the menu again          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use estoque_core::{CoreError, ErrorKind, ValidationError};
use estoque_db::{DbError, StoreError};

use crate::config::ConfigError;

/// Error shown to the user when an action fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for menu actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Unknown good id
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Username already taken
    DuplicateUser,

    /// Sale exceeds remaining stock
    InsufficientStock,

    /// Database operation failed
    DatabaseError,

    /// Image, backup or report file could not be written
    FileError,

    /// Configuration could not be loaded
    ConfigError,

    /// The terminal could not be read from or written to
    Terminal,
}

impl AppError {
    /// Creates a new application error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        AppError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::ValidationError, message)
    }

    /// Creates a file error.
    pub fn file(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::FileError, message)
    }

    /// Coarse classification, matching the library error kinds.
    pub fn kind(&self) -> ErrorKind {
        match self.code {
            ErrorCode::NotFound => ErrorKind::NotFound,
            ErrorCode::ValidationError | ErrorCode::ConfigError => ErrorKind::InvalidInput,
            ErrorCode::DuplicateUser => ErrorKind::DuplicateUser,
            ErrorCode::InsufficientStock => ErrorKind::InsufficientStock,
            ErrorCode::DatabaseError | ErrorCode::FileError | ErrorCode::Terminal => {
                ErrorKind::Storage
            }
        }
    }
}

/// Converts core errors to application errors.
impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        let code = match err.kind() {
            ErrorKind::NotFound => ErrorCode::NotFound,
            ErrorKind::DuplicateUser => ErrorCode::DuplicateUser,
            ErrorKind::InsufficientStock => ErrorCode::InsufficientStock,
            ErrorKind::InvalidInput => ErrorCode::ValidationError,
            ErrorKind::Storage => ErrorCode::DatabaseError,
        };

        let message = match err {
            CoreError::Validation(e) => e.to_string(),
            other => other.to_string(),
        };

        AppError::new(code, message)
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::validation(err.to_string())
    }
}

/// Converts database errors to application errors.
impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => {
                AppError::new(ErrorCode::NotFound, format!("{} not found: {}", entity, id))
            }
            DbError::UniqueViolation { field, value } => AppError::new(
                ErrorCode::ValidationError,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Database migration failed: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::PoolExhausted => {
                AppError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Hashing(e) => {
                tracing::error!("Password hashing failed: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Could not store the password")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Core(e) => e.into(),
            StoreError::Db(e) => e.into(),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        tracing::error!("File operation failed: {}", err);
        AppError::file(format!("File operation failed: {}", err.kind()))
    }
}

impl From<dialoguer::Error> for AppError {
    fn from(err: dialoguer::Error) -> Self {
        tracing::error!("Terminal interaction failed: {}", err);
        AppError::new(ErrorCode::Terminal, "Terminal interaction failed")
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

/// Result type for the terminal front end.
pub type AppResult<T> = Result<T, AppError>;
