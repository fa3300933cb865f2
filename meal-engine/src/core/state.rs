use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::{Argon2Hasher, CredentialHasher};
use crate::core::{Config, EngineError, Result};
use crate::db::DbService;
use crate::services::{AuthService, CartService, CatalogService, OrderService, ReportService};

/// Engine state - the database pool and every service built on it
///
/// Cloning is cheap: the pool and hasher are shared.
///
/// | Field | Purpose |
/// |-------|---------|
/// | config | configuration (immutable) |
/// | pool | SQLite connection pool |
/// | auth | accounts and credentials |
/// | catalog | departments and dishes |
/// | carts | per-user carts |
/// | orders | checkout and order bookkeeping |
/// | reports | dashboard aggregates |
///
/// ```ignore
/// let state = EngineState::initialize(&Config::from_env()).await?;
/// let user = state.auth.authenticate("john@company.com", "password123").await?;
/// state.carts.add(user.id, dish_id, 2).await?;
/// ```
#[derive(Clone, Debug)]
pub struct EngineState {
    pub config: Config,
    pub pool: SqlitePool,
    pub auth: AuthService,
    pub catalog: CatalogService,
    pub carts: CartService,
    pub orders: OrderService,
    pub reports: ReportService,
}

impl EngineState {
    /// Build the services over an open pool
    pub fn new(config: Config, pool: SqlitePool, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self {
            auth: AuthService::new(pool.clone(), hasher, config.min_password_len),
            catalog: CatalogService::new(pool.clone()),
            carts: CartService::new(pool.clone()),
            orders: OrderService::new(pool.clone()),
            reports: ReportService::new(pool.clone()),
            config,
            pool,
        }
    }

    /// Initialize engine state
    ///
    /// In order:
    /// 1. work directory structure
    /// 2. database (WAL, migrations)
    /// 3. services with the default argon2 hasher
    pub async fn initialize(config: &Config) -> Result<Self> {
        config.ensure_work_dir_structure()?;

        let db = DbService::new(&config.database_path, config.db_max_connections)
            .await
            .map_err(|e| EngineError::Database(e.message))?;

        let hasher = Argon2Hasher::new().map_err(|e| EngineError::Config(e.message))?;
        Ok(Self::new(config.clone(), db.pool, Arc::new(hasher)))
    }
}
