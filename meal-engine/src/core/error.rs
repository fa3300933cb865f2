use thiserror::Error;

/// Startup failures
///
/// Business operations return `AppError`; this type only covers bringing
/// the engine up.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Seeding failed: {0}")]
    Seed(String),

    #[error("Internal error")]
    Internal(#[from] anyhow::Error),
}

impl From<shared::error::AppError> for EngineError {
    fn from(err: shared::error::AppError) -> Self {
        EngineError::Database(err.to_string())
    }
}

/// Startup result alias
pub type Result<T> = std::result::Result<T, EngineError>;
