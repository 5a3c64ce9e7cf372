// ============================================================================
// Database Configuration
// ============================================================================

use anyhow::{Result, bail};

use crate::constants::*;

/// Which `MessageStore` implementation the service runs on
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    MongoDb,
    /// Process-local store, for local runs and tests. Data is lost on exit.
    Memory,
}

impl StoreBackend {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mongodb" | "mongo" => Ok(StoreBackend::MongoDb),
            "memory" | "in-memory" => Ok(StoreBackend::Memory),
            other => bail!("Unknown STORE_BACKEND '{}': expected 'mongodb' or 'memory'", other),
        }
    }
}

/// Document store connection configuration
#[derive(Clone, Debug)]
pub struct DbConfig {
    pub backend: StoreBackend,
    /// MongoDB connection string
    pub uri: String,
    pub database: String,
    pub collection: String,
    /// Timeout for establishing a connection (seconds)
    pub connect_timeout_secs: u64,
    /// Timeout for selecting a server for an operation (seconds)
    pub server_selection_timeout_secs: u64,
}

impl DbConfig {
    pub(crate) fn from_env() -> Result<Self> {
        let backend = match std::env::var("STORE_BACKEND") {
            Ok(value) => StoreBackend::parse(&value)?,
            Err(_) => StoreBackend::MongoDb,
        };

        Ok(Self {
            backend,
            uri: std::env::var("MONGODB_URI").unwrap_or_else(|_| DEFAULT_MONGODB_URI.to_string()),
            database: std::env::var("MONGODB_DATABASE")
                .unwrap_or_else(|_| DEFAULT_MONGODB_DATABASE.to_string()),
            collection: std::env::var("MONGODB_COLLECTION")
                .unwrap_or_else(|_| DEFAULT_MONGODB_COLLECTION.to_string()),
            connect_timeout_secs: std::env::var("DB_CONNECT_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_DB_CONNECT_TIMEOUT_SECS),
            server_selection_timeout_secs: std::env::var("DB_SERVER_SELECTION_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_DB_SERVER_SELECTION_TIMEOUT_SECS),
        })
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::MongoDb,
            uri: DEFAULT_MONGODB_URI.to_string(),
            database: DEFAULT_MONGODB_DATABASE.to_string(),
            collection: DEFAULT_MONGODB_COLLECTION.to_string(),
            connect_timeout_secs: DEFAULT_DB_CONNECT_TIMEOUT_SECS,
            server_selection_timeout_secs: DEFAULT_DB_SERVER_SELECTION_TIMEOUT_SECS,
        }
    }
}
