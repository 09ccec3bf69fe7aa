//! # Database Pool Management
//!
//! Connection pool creation and configuration for SQLite.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Database Connection Pool                           │
//! │                                                                         │
//! │  App Startup                                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbConfig::load_or_init(dir) ← config file, env overrides, defaults    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(config).await ← Create pool + run migrations            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │            SqlitePool                    │                           │
//! │  │  ┌─────┐ ┌─────┐ ┌─────┐ ┌─────┐       │                           │
//! │  │  │Conn1│ │Conn2│ │Conn3│ │Conn4│ ...   │  (max_connections)        │
//! │  │  └─────┘ └─────┘ └─────┘ └─────┘       │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       │ Each repository operation borrows one connection,              │
//! │       ▼ releases it on every exit path                                 │
//! │  db.employees() ──► uses Conn1                                         │
//! │  db.tasks()     ──► uses Conn2                                         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## WAL Mode
//! SQLite WAL (Write-Ahead Logging) mode is enabled for:
//! - Better concurrent read performance
//! - Readers don't block writers and vice versa
//! - Better crash recovery
//!
//! ## Failure Mode
//! Nothing in the application can proceed without the store, so a pool that
//! cannot be built (bad path, permissions, corrupt file) fails loudly with
//! `DbError::ConnectionFailed` rather than degrading.

use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::absence::AbsenceRepository;
use crate::repository::address::AddressRepository;
use crate::repository::employee::EmployeeRepository;
use crate::repository::issue::IssueRepository;
use crate::repository::order::OrderRepository;
use crate::repository::product::ProductRepository;
use crate::repository::report::ReportRepository;
use crate::repository::stock::StockRepository;
use crate::repository::task::TaskRepository;
use crate::repository::token::TokenRepository;
use crate::repository::transaction::TransactionRepository;

// =============================================================================
// Configuration
// =============================================================================

/// Database configuration.
///
/// ## Sources (priority order)
/// 1. Environment variables (`BACKROOM_*`)
/// 2. Config file (`backroom.json`) — written with defaults on first run
/// 3. Defaults (this file)
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("/path/to/backroom.db")
///     .max_connections(5)
///     .min_connections(1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 5 (sufficient for a local back-office app)
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 1
    pub min_connections: u32,

    /// Connection acquire timeout, seconds.
    /// Default: 30
    pub connect_timeout_secs: u64,

    /// Idle timeout before closing a connection, seconds.
    /// Default: 600
    pub idle_timeout_secs: u64,

    /// Whether to run migrations on connect.
    /// Default: true
    pub run_migrations: bool,
}

impl Default for DbConfig {
    fn default() -> Self {
        DbConfig {
            database_path: PathBuf::from("./backroom.db"),
            max_connections: 5,
            min_connections: 1,
            connect_timeout_secs: 30,
            idle_timeout_secs: 600,
            run_migrations: true,
        }
    }
}

impl DbConfig {
    /// Creates a new database configuration with the given path.
    ///
    /// ## Arguments
    /// * `path` - Path to the SQLite database file. Will be created if it
    ///   doesn't exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            ..DbConfig::default()
        }
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets whether to run migrations on connect.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Creates an in-memory database configuration (for testing).
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let db = Database::new(DbConfig::in_memory()).await?;
    /// // Database is isolated, perfect for tests
    /// ```
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1, // In-memory requires single connection
            min_connections: 1,
            connect_timeout_secs: 5,
            idle_timeout_secs: 60,
            run_migrations: true,
        }
    }

    /// Loads configuration from `<dir>/backroom.json`, writing the defaults
    /// there on first run, then applies `BACKROOM_*` env overrides.
    ///
    /// ## Environment Variables
    /// - `BACKROOM_DB_PATH`: override the database file path
    /// - `BACKROOM_MAX_CONNECTIONS`: override the pool ceiling
    pub fn load_or_init(dir: impl AsRef<Path>) -> DbResult<Self> {
        let path = dir.as_ref().join("backroom.json");

        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(&path)
                .map_err(|e| DbError::ConnectionFailed(format!("read {}: {e}", path.display())))?;
            serde_json::from_str(&raw)
                .map_err(|e| DbError::ConnectionFailed(format!("parse {}: {e}", path.display())))?
        } else {
            let config = DbConfig::default();
            // Sane defaults on first run: persist them so operators have a
            // file to edit.
            let raw = serde_json::to_string_pretty(&config)
                .map_err(|e| DbError::Internal(e.to_string()))?;
            if let Err(e) = std::fs::write(&path, raw) {
                warn!(path = %path.display(), error = %e, "Could not write default config");
            } else {
                info!(path = %path.display(), "Wrote default configuration");
            }
            config
        };

        if let Ok(db_path) = std::env::var("BACKROOM_DB_PATH") {
            config.database_path = PathBuf::from(db_path);
        }
        if let Ok(max) = std::env::var("BACKROOM_MAX_CONNECTIONS") {
            if let Ok(max) = max.parse::<u32>() {
                config.max_connections = max;
            }
        }

        Ok(config)
    }
}

// =============================================================================
// Database
// =============================================================================

/// Main database handle providing repository access.
///
/// One `Database` is constructed at startup and passed to whoever needs
/// data access; its lifecycle (create once, close once at shutdown) is
/// owned by the top-level process, not hidden global state. Cloning is
/// cheap — clones share the pool.
///
/// ## Usage
/// ```rust,ignore
/// let db = Database::new(DbConfig::new("./backroom.db")).await?;
///
/// let mut employee = Employee::new(/* … */)?;
/// db.employees().insert(&mut employee).await?;
///
/// db.close().await; // at shutdown
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    /// The SQLite connection pool.
    pool: SqlitePool,
}

impl Database {
    /// Creates a new database connection pool.
    ///
    /// ## What This Does
    /// 1. Creates the database file if it doesn't exist
    /// 2. Configures SQLite:
    ///    - WAL mode for concurrent reads
    ///    - NORMAL synchronous (balance of safety/speed)
    ///    - Foreign keys enabled (association rows need them)
    /// 3. Creates the connection pool
    /// 4. Runs migrations (if enabled)
    ///
    /// ## Returns
    /// * `Ok(Database)` - Ready-to-use database handle
    /// * `Err(DbError)` - Connection or migration failed; fatal for callers
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Initializing database connection"
        );

        // sqlite://path with mode=rwc creates the file if missing
        let connect_url = format!("sqlite://{}?mode=rwc", config.database_path.display());

        let connect_options = SqliteConnectOptions::from_str(&connect_url)
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            // SQLite ships with foreign keys off for backwards compatibility;
            // the association tables depend on them
            .foreign_keys(true)
            .create_if_missing(true);

        debug!("Connection options configured");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_secs)))
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            "Database pool created"
        );

        let db = Database { pool };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Runs database migrations.
    ///
    /// Automatically called by `new()` unless disabled in the config;
    /// idempotent either way.
    pub async fn run_migrations(&self) -> DbResult<()> {
        info!("Running database migrations");
        migrations::run_migrations(&self.pool).await?;
        info!("Migrations complete");
        Ok(())
    }

    /// Returns a reference to the connection pool.
    ///
    /// For advanced queries not covered by repositories.
    /// Prefer using repository methods when available.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Returns the address repository.
    pub fn addresses(&self) -> AddressRepository {
        AddressRepository::new(self.pool.clone())
    }

    /// Returns the employee repository.
    pub fn employees(&self) -> EmployeeRepository {
        EmployeeRepository::new(self.pool.clone())
    }

    /// Returns the product repository.
    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.pool.clone())
    }

    /// Returns the warehouse stock repository.
    pub fn stock(&self) -> StockRepository {
        StockRepository::new(self.pool.clone())
    }

    /// Returns the order repository.
    pub fn orders(&self) -> OrderRepository {
        OrderRepository::new(self.pool.clone())
    }

    /// Returns the transaction repository.
    pub fn transactions(&self) -> TransactionRepository {
        TransactionRepository::new(self.pool.clone())
    }

    /// Returns the absence-request repository.
    pub fn absences(&self) -> AbsenceRepository {
        AbsenceRepository::new(self.pool.clone())
    }

    /// Returns the task repository.
    pub fn tasks(&self) -> TaskRepository {
        TaskRepository::new(self.pool.clone())
    }

    /// Returns the technical-issue repository.
    pub fn issues(&self) -> IssueRepository {
        IssueRepository::new(self.pool.clone())
    }

    /// Returns the report repository.
    pub fn reports(&self) -> ReportRepository {
        ReportRepository::new(self.pool.clone())
    }

    /// Returns the password-reset-token repository.
    pub fn reset_tokens(&self) -> TokenRepository {
        TokenRepository::new(self.pool.clone())
    }

    /// Closes the database connection pool.
    ///
    /// ## When To Call
    /// On application shutdown, exactly once. Close is terminal: repository
    /// operations afterwards fail with `DbError::ConnectionFailed`.
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }

    /// Checks if the database is healthy (can execute queries).
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(db.health_check().await);

        let (total, applied) = migrations::migration_status(db.pool()).await.unwrap();
        assert_eq!(total, applied);
    }

    #[tokio::test]
    async fn test_config_builder() {
        let config = DbConfig::new("/tmp/test.db")
            .max_connections(10)
            .min_connections(2);

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 2);
        assert!(config.run_migrations);
    }

    #[tokio::test]
    async fn test_close_is_terminal() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;
        assert!(!db.health_check().await);
    }

    #[test]
    fn test_load_or_init_writes_defaults_then_reads_them_back() {
        let dir = tempfile::tempdir().unwrap();

        let first = DbConfig::load_or_init(dir.path()).unwrap();
        assert_eq!(first.max_connections, 5);
        assert!(dir.path().join("backroom.json").exists());

        let second = DbConfig::load_or_init(dir.path()).unwrap();
        assert_eq!(second.database_path, first.database_path);
    }
}
