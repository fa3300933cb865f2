//! Shared types for the meal ordering core
//!
//! Domain models, the unified error system and small utilities used by the
//! engine crate and by any presentation layer built on top of it.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use error::{AppError, AppResult, ErrorCategory, ErrorCode, ErrorKind};
pub use rust_decimal::Decimal;
pub use serde::{Deserialize, Serialize};
