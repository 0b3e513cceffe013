//! Configuration management for the Fuel Station Dashboard
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with FSD_ prefix

use config::{ConfigError, Environment, File};
use rust_decimal::Decimal;
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// JWT authentication configuration
    pub jwt: JwtConfig,

    /// Station-level business settings
    pub station: StationConfig,

    /// Initial admin account, created when no admin exists
    #[serde(default)]
    pub bootstrap: Option<BootstrapConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    /// Secret key for signing JWT tokens
    pub secret: String,

    /// Access token expiration in seconds
    pub access_token_expiry: i64,

    /// Refresh token expiration in seconds
    pub refresh_token_expiry: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StationConfig {
    /// Display name of the station
    pub name: String,

    /// Fill percentage under which a tank is flagged low
    pub low_stock_percent: i64,

    /// Litres of dip/totalizer difference that flag a discrepancy
    pub discrepancy_threshold_liters: Decimal,

    /// Default number of tokens in the registry listing (max 100)
    pub token_list_limit: u32,

    /// Number of tokens shown on the dashboard
    pub recent_token_count: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BootstrapConfig {
    pub admin_email: String,
    pub admin_password: String,
    pub admin_name: String,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("FSD_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("jwt.access_token_expiry", 3600)?
            .set_default("jwt.refresh_token_expiry", 604800)?
            .set_default("station.name", "Fuel Station")?
            .set_default("station.low_stock_percent", 30)?
            .set_default("station.discrepancy_threshold_liters", "10")?
            .set_default("station.token_list_limit", 100)?
            .set_default("station.recent_token_count", 10)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (FSD_ prefix)
            .add_source(
                Environment::with_prefix("FSD")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
impl Config {
    /// Configuration with fixed values for unit tests
    pub fn for_tests() -> Self {
        Self {
            environment: "test".to_string(),
            server: ServerConfig {
                port: 0,
                host: "127.0.0.1".to_string(),
            },
            database: DatabaseConfig {
                url: "postgres://localhost/fsd_test".to_string(),
                max_connections: 1,
                min_connections: 1,
            },
            jwt: JwtConfig {
                secret: "test-secret".to_string(),
                access_token_expiry: 3600,
                refresh_token_expiry: 604800,
            },
            station: StationConfig {
                name: "Test Station".to_string(),
                low_stock_percent: 30,
                discrepancy_threshold_liters: Decimal::TEN,
                token_list_limit: 100,
                recent_token_count: 10,
            },
            bootstrap: None,
        }
    }
}
