//! Error types

use super::category::ErrorCategory;
use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Coarse failure kinds a presentation layer renders messages for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    Conflict,
    ValidationFailed,
    InsufficientStock,
    Unavailable,
    EmptyCart,
    AuthenticationFailed,
    PermissionDenied,
    /// Storage fault or other unexpected failure
    Storage,
}

/// Application error with structured error code and details
///
/// Every business-rule violation is returned as an `AppError`; only
/// [`ErrorKind::Storage`] represents an unexpected failure.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details (field-level errors, context, etc.)
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Map the error code onto the failure taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self.code {
            ErrorCode::NotFound
            | ErrorCode::OrderNotFound
            | ErrorCode::CartItemNotFound
            | ErrorCode::DishNotFound
            | ErrorCode::DepartmentNotFound
            | ErrorCode::UserNotFound => ErrorKind::NotFound,
            ErrorCode::AlreadyExists
            | ErrorCode::DepartmentNameExists
            | ErrorCode::EmailExists => ErrorKind::Conflict,
            ErrorCode::InsufficientStock => ErrorKind::InsufficientStock,
            ErrorCode::DishUnavailable => ErrorKind::Unavailable,
            ErrorCode::OrderEmpty => ErrorKind::EmptyCart,
            ErrorCode::InvalidCredentials | ErrorCode::AccountDisabled => {
                ErrorKind::AuthenticationFailed
            }
            ErrorCode::PermissionDenied | ErrorCode::AdminRequired => ErrorKind::PermissionDenied,
            code if code.category() == ErrorCategory::System || code == ErrorCode::Unknown => {
                ErrorKind::Storage
            }
            _ => ErrorKind::ValidationFailed,
        }
    }

    /// Whether the caller can act on this error (everything but storage faults)
    pub fn is_recoverable(&self) -> bool {
        self.kind() != ErrorKind::Storage
    }

    // ==================== Convenience constructors ====================

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>) -> Self {
        let r = resource.into();
        Self::with_message(ErrorCode::NotFound, format!("{} not found", r))
            .with_detail("resource", r)
    }

    /// Create an already exists error
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::AlreadyExists, msg)
    }

    /// Create an insufficient stock error for a dish
    pub fn insufficient_stock(dish_id: i64, requested: i64, available: i64) -> Self {
        Self::with_message(
            ErrorCode::InsufficientStock,
            format!("Insufficient stock for dish {dish_id}: requested {requested}, available {available}"),
        )
        .with_detail("dish_id", dish_id)
        .with_detail("requested", requested)
        .with_detail("available", available)
    }

    /// Create a dish unavailable error
    pub fn unavailable(dish_id: i64) -> Self {
        Self::with_message(
            ErrorCode::DishUnavailable,
            format!("Dish {dish_id} is not available"),
        )
        .with_detail("dish_id", dish_id)
    }

    /// Create an empty cart error
    pub fn empty_cart() -> Self {
        Self::new(ErrorCode::OrderEmpty)
    }

    /// Create an invalid credentials error
    pub fn invalid_credentials() -> Self {
        Self::new(ErrorCode::InvalidCredentials)
    }

    /// Create a permission denied error
    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::PermissionDenied, msg)
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }

    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::DatabaseError, msg)
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;
