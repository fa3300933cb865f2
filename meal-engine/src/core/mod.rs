//! Core module - engine configuration, state and startup errors
//!
//! - [`Config`] - engine configuration
//! - [`EngineState`] - database pool plus the services built on it
//! - [`EngineError`] - startup errors

pub mod config;
pub mod error;
pub mod state;

pub use config::Config;
pub use error::{EngineError, Result};
pub use state::EngineState;
