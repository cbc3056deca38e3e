//! `SQLite` connection pool setup and table bootstrap.

use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use todohub_app::ports::TableName;

use crate::error::StorageError;
use crate::todo_repo::SqliteTodoRepository;

/// Pool size for file-backed databases unless configured otherwise.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Configuration for the `SQLite` storage adapter.
pub struct Config {
    /// `SQLite` connection URL (e.g. `sqlite:todohub.db` or `sqlite::memory:`).
    pub database_url: String,
    /// Table holding todo items, created on startup if missing.
    pub table_name: TableName,
    /// Upper bound on pooled connections for file-backed databases.
    pub max_connections: u32,
}

impl Config {
    #[must_use]
    pub fn new(database_url: impl Into<String>, table_name: TableName) -> Self {
        Self {
            database_url: database_url.into(),
            table_name,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }

    /// Build a [`Database`] from this configuration.
    ///
    /// Creates the connection pool, creates the database file if missing,
    /// and creates the todo table if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the connection or table bootstrap fails.
    pub async fn build(self) -> Result<Database, StorageError> {
        Database::initialize(self).await
    }
}

/// Holds the `SQLite` connection pool and the table it serves.
pub struct Database {
    pool: SqlitePool,
    table_name: TableName,
}

impl Database {
    async fn initialize(config: Config) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);

        // An in-memory database lives only as long as its connections.
        let pool_options = if config.database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(config.max_connections)
        };
        let pool = pool_options.connect_with(options).await?;

        let database = Self {
            pool,
            table_name: config.table_name,
        };
        database.ensure_table().await?;
        Ok(database)
    }

    /// Create the todo table unless it already exists.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the statement fails.
    pub async fn ensure_table(&self) -> Result<(), StorageError> {
        let statement = format!(
            r#"CREATE TABLE IF NOT EXISTS "{}" (
                id TEXT PRIMARY KEY NOT NULL,
                name TEXT NOT NULL,
                description TEXT NOT NULL,
                timestamp TEXT NOT NULL
            )"#,
            self.table_name
        );
        sqlx::query(&statement).execute(&self.pool).await?;
        tracing::info!(table = %self.table_name, "todo table ready");
        Ok(())
    }

    /// Borrow the underlying connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    #[must_use]
    pub fn table_name(&self) -> &TableName {
        &self.table_name
    }

    /// Repository over this database's todo table.
    #[must_use]
    pub fn todo_repository(&self) -> SqliteTodoRepository {
        SqliteTodoRepository::new(self.pool.clone(), &self.table_name)
    }
}
