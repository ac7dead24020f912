//! Database connection configuration

use std::{env, str::FromStr, sync::Arc, sync::LazyLock};

use sqlx::postgres::PgPoolOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use super::types::{DataStore, PostgresDataStore, SqliteDataStore};
use crate::storage::errors::StorageError;

// Configuration
static GENERIC_DATA_STORE_TYPE: LazyLock<String> = LazyLock::new(|| {
    env::var("GENERIC_DATA_STORE_TYPE").unwrap_or_else(|_| "sqlite".to_string())
});

static GENERIC_DATA_STORE_URL: LazyLock<String> = LazyLock::new(|| {
    env::var("GENERIC_DATA_STORE_URL").unwrap_or_else(|_| "sqlite:konvos.db".to_string())
});

/// Table prefix from environment variable
pub(crate) static DB_TABLE_PREFIX: LazyLock<String> =
    LazyLock::new(|| env::var("DB_TABLE_PREFIX").unwrap_or_else(|_| "konvos_".to_string()));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataStoreType {
    Sqlite,
    Postgres,
}

impl FromStr for DataStoreType {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            t => Err(StorageError::Config(format!(
                "Unsupported store type: {t}. Supported types are 'sqlite' and 'postgres'"
            ))),
        }
    }
}

/// Where the credential store lives
#[derive(Debug, Clone)]
pub struct DataStoreConfig {
    pub store_type: DataStoreType,
    pub url: String,
}

impl DataStoreConfig {
    /// Read `GENERIC_DATA_STORE_TYPE` and `GENERIC_DATA_STORE_URL`
    pub fn from_env() -> Result<Self, StorageError> {
        Ok(Self {
            store_type: GENERIC_DATA_STORE_TYPE.parse()?,
            url: GENERIC_DATA_STORE_URL.clone(),
        })
    }

    /// A private SQLite database that lives as long as the pool
    pub fn sqlite_in_memory() -> Self {
        Self {
            store_type: DataStoreType::Sqlite,
            url: "sqlite::memory:".to_string(),
        }
    }

    fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }
}

/// Open a connection pool for the configured backend
pub async fn connect_data_store(
    config: &DataStoreConfig,
) -> Result<Arc<dyn DataStore>, StorageError> {
    tracing::info!(
        "Initializing data store with type: {:?}, url: {}",
        config.store_type,
        config.url
    );

    let store: Arc<dyn DataStore> = match config.store_type {
        DataStoreType::Sqlite => {
            let opts = SqliteConnectOptions::from_str(&config.url)
                .map_err(|e| {
                    StorageError::Config(format!("Failed to parse SQLite connection string: {e}"))
                })?
                .create_if_missing(true);

            // Every connection to ":memory:" is its own database, so pin the pool to one.
            let pool_options = if config.is_in_memory() {
                SqlitePoolOptions::new()
                    .max_connections(1)
                    .idle_timeout(None)
                    .max_lifetime(None)
            } else {
                SqlitePoolOptions::new()
            };

            Arc::new(SqliteDataStore {
                pool: pool_options.connect_with(opts).await?,
            })
        }
        DataStoreType::Postgres => Arc::new(PostgresDataStore {
            pool: PgPoolOptions::new().connect(&config.url).await?,
        }),
    };

    tracing::info!("Connected to database: type={:?}", config.store_type);

    Ok(store)
}
