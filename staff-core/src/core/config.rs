/// Core configuration
///
/// # Environment variables
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | WORK_DIR | /var/lib/staff-core | Working directory (database files, logs) |
/// | DB_NAMESPACE | staff | SurrealDB namespace |
/// | DB_DATABASE | core | SurrealDB database name |
/// | ENVIRONMENT | development | development \| staging \| production |
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory, stores the embedded database and logs
    pub work_dir: String,
    /// Database namespace
    pub db_namespace: String,
    /// Database name
    pub db_database: String,
    /// Runtime environment tag
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/staff-core".into()),
            db_namespace: std::env::var("DB_NAMESPACE").unwrap_or_else(|_| "staff".into()),
            db_database: std::env::var("DB_DATABASE").unwrap_or_else(|_| "core".into()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
