//! Repository Module
//!
//! Free async functions over `&SqlitePool` (or a connection borrowed from a
//! transaction). Money columns are integer cents; rows holding money are
//! mapped through private row structs into the shared models.

pub mod cart;
pub mod department;
pub mod dish;
pub mod order;
pub mod report;
pub mod user;

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    /// SQLite could not take the write lock within the busy timeout
    #[error("Database busy: {0}")]
    Busy(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// SQLite primary result code for SQLITE_BUSY (extended codes keep it in the low byte)
const SQLITE_BUSY: i32 = 5;

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return RepoError::Duplicate(db_err.message().to_string());
            }
            if db_err.is_foreign_key_violation() || db_err.is_check_violation() {
                return RepoError::Validation(db_err.message().to_string());
            }
            let busy = db_err
                .code()
                .and_then(|code| code.parse::<i32>().ok())
                .is_some_and(|code| code & 0xFF == SQLITE_BUSY);
            if busy {
                return RepoError::Busy(db_err.message().to_string());
            }
        }
        RepoError::Database(err.to_string())
    }
}

impl RepoError {
    /// Whether retrying the whole unit of work may succeed
    pub fn is_busy(&self) -> bool {
        matches!(self, RepoError::Busy(_))
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::conflict(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Busy(msg) | RepoError::Database(msg) => {
                tracing::error!(error = %msg, "Storage fault");
                AppError::database(msg)
            }
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Convert `Option<T>` lookups into `NotFound` errors
pub(crate) trait OptionExt<T> {
    fn or_not_found(self, what: impl FnOnce() -> String) -> RepoResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn or_not_found(self, what: impl FnOnce() -> String) -> RepoResult<T> {
        self.ok_or_else(|| RepoError::NotFound(what()))
    }
}
