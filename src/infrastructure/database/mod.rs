pub mod entities;
pub mod migrator;
pub mod repositories;

pub use repositories::SeaOrmBootcampRepository;

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use tokio::sync::OnceCell;
use tracing::info;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://./devcamper.db?mode=rwc";

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database URL (e.g., "sqlite://./devcamper.db?mode=rwc")
    pub url: String,
    pub max_connections: u32,
    pub connect_timeout: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: 10,
            connect_timeout: Duration::from_secs(8),
        }
    }
}

impl DatabaseConfig {
    /// Create config for SQLite
    pub fn sqlite(path: &str) -> Self {
        Self {
            url: format!("sqlite://{}?mode=rwc", path),
            ..Default::default()
        }
    }

    /// Private in-memory SQLite database
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            ..Default::default()
        }
    }

    fn is_sqlite_memory(&self) -> bool {
        self.url.starts_with("sqlite::memory:") || self.url.contains("mode=memory")
    }
}

/// Initialize database connection
pub async fn init_database(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    info!("Connecting to database: {}", config.url);

    let mut options = ConnectOptions::new(config.url.clone());
    options
        .connect_timeout(config.connect_timeout)
        .acquire_timeout(config.connect_timeout)
        .sqlx_logging(false);

    // Every pooled connection to an in-memory SQLite database sees its own
    // empty database, so keep exactly one open.
    if config.is_sqlite_memory() {
        options.max_connections(1).min_connections(1);
    } else {
        options.max_connections(config.max_connections.max(1));
    }

    let db = Database::connect(options).await?;
    info!("Database connected successfully");
    Ok(db)
}

/// Lazily established, shared database handle.
///
/// The first [`connect`](Self::connect) opens the connection; concurrent and
/// later calls wait for and reuse it instead of reconnecting.
pub struct DatabasePool {
    config: DatabaseConfig,
    connection: OnceCell<DatabaseConnection>,
}

impl DatabasePool {
    pub fn new(config: DatabaseConfig) -> Self {
        Self {
            config,
            connection: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    pub async fn connect(&self) -> Result<&DatabaseConnection, DbErr> {
        self.connection
            .get_or_try_init(|| init_database(&self.config))
            .await
    }

    /// The connection, if one has been established
    pub fn get(&self) -> Option<&DatabaseConnection> {
        self.connection.get()
    }

    pub async fn close(self) -> Result<(), DbErr> {
        match self.connection.into_inner() {
            Some(db) => db.close().await,
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn connect_is_done_once() {
        let pool = DatabasePool::new(DatabaseConfig::in_memory());
        assert!(pool.get().is_none());

        let first = pool.connect().await.unwrap() as *const DatabaseConnection;
        let second = pool.connect().await.unwrap() as *const DatabaseConnection;
        assert_eq!(first, second);
        assert!(pool.get().is_some());

        pool.close().await.unwrap();
    }

    #[tokio::test]
    async fn failed_connect_can_be_retried() {
        let pool = DatabasePool::new(DatabaseConfig {
            url: "sqlite://./no/such/dir/devcamper.db".to_string(),
            connect_timeout: Duration::from_secs(1),
            ..Default::default()
        });
        assert!(pool.connect().await.is_err());
        assert!(pool.get().is_none());
    }

    #[test]
    fn detects_in_memory_urls() {
        assert!(DatabaseConfig::in_memory().is_sqlite_memory());
        assert!(!DatabaseConfig::default().is_sqlite_memory());
        assert_eq!(
            DatabaseConfig::sqlite("/tmp/x.db").url,
            "sqlite:///tmp/x.db?mode=rwc"
        );
    }
}
