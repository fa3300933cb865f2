//! Data models
//!
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! Money-carrying types are mapped by hand in the engine because prices are
//! stored as integer cents.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY), timestamps are UTC millis.

pub mod cart;
pub mod department;
pub mod dish;
pub mod order;
pub mod report;
pub mod user;

// Re-exports
pub use cart::*;
pub use department::*;
pub use dish::*;
pub use order::*;
pub use report::*;
pub use user::*;
