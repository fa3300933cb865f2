use std::path::PathBuf;

/// Engine configuration
///
/// # Environment variables
///
/// Every setting can be overridden from the environment:
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | ./data | working directory (database, logs) |
/// | DATABASE_PATH | <WORK_DIR>/meal.db | SQLite database file |
/// | LOG_LEVEL | info | tracing filter when RUST_LOG is unset |
/// | LOG_DIR | <WORK_DIR>/logs | daily rolling log files |
/// | LOG_JSON | false | emit JSON log lines |
/// | ENVIRONMENT | development | development / staging / production |
/// | SEED_DEMO_DATA | true | seed demo data into an empty database |
/// | MIN_PASSWORD_LEN | 8 | minimum password length on register |
/// | DB_MAX_CONNECTIONS | 5 | SQLite pool size |
///
/// # Example
///
/// ```ignore
/// WORK_DIR=/srv/meal SEED_DEMO_DATA=true cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory holding the database and logs
    pub work_dir: String,
    /// SQLite database file
    pub database_path: String,
    /// Log level used when RUST_LOG is not set
    pub log_level: String,
    /// Directory for rolling log files
    pub log_dir: String,
    /// JSON formatted logs
    pub log_json: bool,
    /// Environment: development | staging | production
    pub environment: String,
    /// Seed demo departments, users and dishes when the database is empty
    pub seed_demo_data: bool,
    /// Minimum accepted password length
    pub min_password_len: usize,
    /// SQLite pool size
    pub db_max_connections: u32,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset or unparsable variables fall back to their defaults.
    pub fn from_env() -> Self {
        let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into());
        let database_path = std::env::var("DATABASE_PATH").unwrap_or_else(|_| {
            PathBuf::from(&work_dir)
                .join("meal.db")
                .to_string_lossy()
                .into_owned()
        });
        let log_dir = std::env::var("LOG_DIR").unwrap_or_else(|_| {
            PathBuf::from(&work_dir)
                .join("logs")
                .to_string_lossy()
                .into_owned()
        });

        Self {
            database_path,
            log_dir,
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: env_parse("LOG_JSON").unwrap_or(false),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            seed_demo_data: env_parse("SEED_DEMO_DATA").unwrap_or(true),
            min_password_len: env_parse("MIN_PASSWORD_LEN").unwrap_or(8),
            db_max_connections: env_parse("DB_MAX_CONNECTIONS").unwrap_or(5),
            work_dir,
        }
    }

    /// Configuration pointing at a specific database file
    ///
    /// Used by tests and tools; everything else keeps its default.
    pub fn for_database(database_path: impl Into<String>) -> Self {
        let database_path = database_path.into();
        let work_dir = PathBuf::from(&database_path)
            .parent()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_else(|| ".".into());
        Self {
            log_dir: PathBuf::from(&work_dir)
                .join("logs")
                .to_string_lossy()
                .into_owned(),
            work_dir,
            database_path,
            log_level: "info".into(),
            log_json: false,
            environment: "development".into(),
            seed_demo_data: false,
            min_password_len: 8,
            db_max_connections: 5,
        }
    }

    /// Make sure the working directory and log directory exist
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.work_dir)?;
        std::fs::create_dir_all(&self.log_dir)?;
        if let Some(parent) = PathBuf::from(&self.database_path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Production environment?
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Development environment?
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_database_derives_work_dir() {
        let config = Config::for_database("/tmp/meal/test.db");
        assert_eq!(config.work_dir, "/tmp/meal");
        assert_eq!(config.database_path, "/tmp/meal/test.db");
        assert_eq!(config.min_password_len, 8);
        assert!(config.is_development());
        assert!(!config.is_production());
    }
}
