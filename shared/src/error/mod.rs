//! Unified error system for the meal ordering core
//!
//! This module provides:
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//! - [`ErrorKind`]: The coarse failure taxonomy callers render on
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 4xxx: Order errors
//! - 5xxx: Cart errors
//! - 6xxx: Dish errors
//! - 7xxx: Department errors
//! - 8xxx: User errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ErrorKind};
//!
//! let err = AppError::new(ErrorCode::OrderEmpty);
//! assert_eq!(err.kind(), ErrorKind::EmptyCart);
//!
//! let err = AppError::validation("Missing required field")
//!     .with_detail("field", "email");
//! assert!(err.is_recoverable());
//! ```

mod category;
mod codes;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult, ErrorKind};
