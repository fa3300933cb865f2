//! Utility module
//!
//! - [`AppError`] - application error type (from shared::error)
//! - logging setup
//! - input validation helpers

pub mod error;
pub mod logger;
pub mod validation;

pub use error::{AppError, AppResult, ErrorCategory, ErrorCode, ErrorKind};
