//! Meal Engine - meal-ordering core
//!
//! # Overview
//!
//! Users browse a menu, keep a cart and check out; administrators manage
//! dishes, departments and order status. The one multi-entity write is
//! checkout, which runs as a single SQLite transaction.
//!
//! - **Catalog** (`services::catalog`): departments and dishes with soft delete
//! - **Cart** (`services::cart`): per-user lines checked against stock
//! - **Ordering** (`services::ordering`): transactional checkout, order status
//! - **Accounts** (`services::auth`): registration and argon2 credentials
//!
//! # Module layout
//!
//! ```text
//! meal-engine/src/
//! ├── core/          # config, state, startup errors
//! ├── auth/          # credential hashing
//! ├── db/            # SQLite pool, migrations, repositories
//! ├── services/      # operations called by presentation layers
//! ├── order_money/   # fixed-point money helpers
//! ├── seed.rs        # demo data
//! └── utils/         # errors, logging, validation
//! ```

pub mod auth;
pub mod core;
pub mod db;
pub mod order_money;
pub mod seed;
pub mod services;
pub mod utils;

// Re-export public types
pub use auth::{Argon2Hasher, CredentialHasher};
pub use core::{Config, EngineError, EngineState};
pub use db::DbService;
pub use services::{AuthService, CartService, CatalogService, OrderService, ReportService};
pub use utils::{AppError, AppResult, ErrorCategory, ErrorCode, ErrorKind};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// Load `.env`, read the configuration and start logging
///
/// Returns the configuration so the caller does not read the environment twice.
pub fn setup_environment() -> core::Result<Config> {
    // .env is optional
    if let Err(e) = dotenvy::dotenv()
        && !e.not_found()
    {
        return Err(EngineError::Config(format!("Failed to load .env: {e}")));
    }

    let config = Config::from_env();
    config.ensure_work_dir_structure()?;
    init_logger_with_file(
        Some(&config.log_level),
        Some(config.log_json),
        Some(&config.log_dir),
    );
    Ok(config)
}

pub fn print_banner() {
    println!(
        r#"
                        __
   ____ ___  ___  ____ _/ /
  / __ `__ \/ _ \/ __ `/ /
 / / / / / /  __/ /_/ / /
/_/ /_/ /_/\___/\__,_/_/  engine
    "#
    );
}
