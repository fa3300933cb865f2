//! Unified error handling
//!
//! Re-exports the shared error system so engine code can write
//! `use crate::utils::{AppError, AppResult}` like everywhere else.
//!
//! # Usage
//!
//! ```ignore
//! let dish = dish::find_by_id(pool, id)
//!     .await?
//!     .ok_or_else(|| AppError::new(ErrorCode::DishNotFound))?;
//! ```

pub use shared::error::{AppError, AppResult, ErrorCategory, ErrorCode, ErrorKind};
