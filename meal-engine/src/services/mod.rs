//! Service layer - the operations presentation layers call
//!
//! - [`AuthService`] - registration, authentication, account administration
//! - [`CatalogService`] - departments and dishes
//! - [`CartService`] - per-user carts
//! - [`OrderService`] - checkout and order bookkeeping
//! - [`ReportService`] - dashboard aggregates

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod ordering;
pub mod reports;

#[cfg(test)]
pub(crate) mod test_support;

pub use auth::AuthService;
pub use cart::CartService;
pub use catalog::CatalogService;
pub use ordering::OrderService;
pub use reports::ReportService;
