//! # Database Connection Pool Module
//!
//! SQLite connection pool for the record store.
//!
//! ## Features
//!
//! - **WAL Mode**: Enabled for file-backed stores (readers don't block the writer)
//! - **Single-connection memory stores**: `:memory:` databases live as long as
//!   their connection, so in-memory pools hold exactly one connection that
//!   never idles out
//! - **Statement Caching**: Automatic prepared statement caching
//! - **Schema Upgrade**: Runs on pool creation (see [`crate::schema`])
//! - **Health Checks**: Connection validation
//!
//! ## Usage
//!
//! ```rust,ignore
//! use core_library::db::{DatabaseConfig, create_pool};
//!
//! let config = DatabaseConfig::new("/data/melodyflow/library.db");
//! let pool = create_pool(config).await?;
//! ```

use crate::schema;
use crate::{LibraryError, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Pool, Sqlite};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, warn};

const MEMORY_URL: &str = "sqlite::memory:";

/// Database configuration for the SQLite connection pool
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database file, or `None` for an in-memory database
    pub database_path: Option<PathBuf>,

    /// Minimum number of connections in the pool
    pub min_connections: u32,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Maximum time to wait for a connection from the pool
    pub acquire_timeout: Duration,

    /// Maximum lifetime of a connection
    pub max_lifetime: Option<Duration>,

    /// Maximum idle time for a connection before being closed
    pub idle_timeout: Option<Duration>,

    /// Number of prepared statements cached per connection
    pub statement_cache_capacity: usize,
}

impl DatabaseConfig {
    /// Create a configuration for a database file
    ///
    /// The file (but not its parent directory) is created on first open.
    pub fn new(database_path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: Some(database_path.into()),
            min_connections: 1,
            max_connections: 5,
            acquire_timeout: Duration::from_secs(30),
            max_lifetime: Some(Duration::from_secs(1800)), // 30 minutes
            idle_timeout: Some(Duration::from_secs(600)),  // 10 minutes
            statement_cache_capacity: 100,
        }
    }

    /// Create a configuration for an in-memory database
    pub fn in_memory() -> Self {
        Self {
            database_path: None,
            min_connections: 1,
            max_connections: 1,
            acquire_timeout: Duration::from_secs(30),
            max_lifetime: None,
            idle_timeout: None,
            statement_cache_capacity: 100,
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_path.is_none()
    }

    /// Human-readable location for logs
    pub fn location(&self) -> String {
        match &self.database_path {
            Some(path) => path.display().to_string(),
            None => ":memory:".to_string(),
        }
    }

    /// Connect options for this location
    ///
    /// File paths are used as-is, never parsed as a URL, so `?` and `#` in a
    /// directory name stay part of the path.
    fn connect_options(&self) -> Result<SqliteConnectOptions> {
        match &self.database_path {
            Some(path) => Ok(SqliteConnectOptions::new().filename(path)),
            None => SqliteConnectOptions::from_str(MEMORY_URL)
                .map_err(|e| unavailable("invalid memory database options", e)),
        }
    }

    /// Set the minimum number of connections
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Set the maximum number of connections
    ///
    /// Ignored for in-memory databases, which always use a single connection.
    pub fn max_connections(mut self, max: u32) -> Self {
        if !self.is_in_memory() {
            self.max_connections = max;
        }
        self
    }

    /// Set the connection acquire timeout
    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    /// Set the statement cache capacity
    pub fn statement_cache_capacity(mut self, capacity: usize) -> Self {
        self.statement_cache_capacity = capacity;
        self
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::in_memory()
    }
}

/// Create a configured SQLite connection pool
///
/// This function:
/// 1. Configures SQLite connection options (WAL mode, statement cache)
/// 2. Creates a connection pool with the specified configuration
/// 3. Upgrades the schema to the current version
/// 4. Performs a health check
///
/// # Errors
///
/// Every failure is reported as [`LibraryError::StoreUnavailable`]: the file
/// cannot be opened or created, the schema is newer than this build, or the
/// health check fails.
pub async fn create_pool(config: DatabaseConfig) -> Result<Pool<Sqlite>> {
    info!(
        database = %config.location(),
        min_connections = config.min_connections,
        max_connections = config.max_connections,
        "Creating database connection pool"
    );

    let connect_options = config
        .connect_options()?
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .create_if_missing(true)
        .statement_cache_capacity(config.statement_cache_capacity);

    debug!("SQLite connection options configured");

    let pool = SqlitePoolOptions::new()
        .min_connections(config.min_connections)
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .max_lifetime(config.max_lifetime)
        .idle_timeout(config.idle_timeout)
        .connect_with(connect_options)
        .await
        .map_err(|e| unavailable("failed to open database", e))?;

    info!(
        connections = pool.size(),
        "Database connection pool created successfully"
    );

    schema::upgrade(&pool).await.map_err(|e| match e {
        LibraryError::StoreUnavailable(_) => e,
        other => unavailable("schema upgrade failed", other),
    })?;

    health_check(&pool).await?;

    Ok(pool)
}

/// Perform a health check on the connection pool
async fn health_check(pool: &Pool<Sqlite>) -> Result<()> {
    debug!("Performing database health check");

    sqlx::query("SELECT 1")
        .fetch_one(pool)
        .await
        .map_err(|e| unavailable("health check failed", e))?;

    debug!("Database health check passed");
    Ok(())
}

fn unavailable(context: &str, err: impl std::fmt::Display) -> LibraryError {
    warn!(error = %err, "{}", context);
    LibraryError::StoreUnavailable(format!("{context}: {err}"))
}
