// ============================================================================
// Message Store Config - Centralized configuration management
// ============================================================================
//
// Configuration for the message store service, loaded from environment
// variables (and an optional `.env` file) with sensible defaults.
//
// ============================================================================

mod constants;
mod database;
mod logging;
mod services;

// Re-export all public types
pub use constants::MAX_REQUEST_BODY_SIZE;
pub use database::{DbConfig, StoreBackend};
pub use logging::LoggingConfig;
pub use services::ServicesConfig;

use anyhow::Result;
use constants::*;

/// Main configuration structure for the message store service
#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub bind_address: String,
    pub rust_log: String,

    // Sub-configurations
    pub logging: LoggingConfig,
    pub db: DbConfig,
    pub services: ServicesConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let logging = LoggingConfig::from_env();
        let db = DbConfig::from_env()?;
        let services = ServicesConfig::from_env()?;

        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Ok(Self {
            port,
            bind_address: format!("0.0.0.0:{}", port),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            logging,
            db,
            services,
        })
    }
}
