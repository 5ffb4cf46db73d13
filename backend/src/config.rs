//! Configuration management for the BioGarden server
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with BIOGARDEN_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Authentication configuration
    pub auth: AuthConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

/// Storage backend selection
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    /// Process-local storage, lost on shutdown
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub backend: StorageBackend,

    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Secret key for signing JWT tokens
    pub jwt_secret: String,

    /// Access token expiration in seconds
    pub access_token_expiry: i64,

    /// bcrypt work factor for password hashes
    pub bcrypt_cost: u32,
}

pub const DEVELOPMENT_JWT_SECRET: &str = "development-secret-key";

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> AppResult<Self> {
        let config = Self::read().map_err(|e| AppError::Configuration(e.to_string()))?;
        config.check()?;
        Ok(config)
    }

    fn read() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("BIOGARDEN_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = Self::defaults(config::Config::builder(), &environment)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (BIOGARDEN_ prefix)
            .add_source(
                Environment::with_prefix("BIOGARDEN")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    fn defaults(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
        environment: &str,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        builder
            .set_default("environment", environment)?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.backend", "postgres")?
            .set_default("database.url", "postgres://localhost/biogarden")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("auth.jwt_secret", DEVELOPMENT_JWT_SECRET)?
            .set_default("auth.access_token_expiry", 3600)?
            .set_default("auth.bcrypt_cost", i64::from(bcrypt::DEFAULT_COST))
    }

    /// Reject settings that are only acceptable on a developer machine
    pub fn check(&self) -> AppResult<()> {
        if !self.is_development() && self.auth.jwt_secret == DEVELOPMENT_JWT_SECRET {
            return Err(AppError::Configuration(format!(
                "auth.jwt_secret must be set in the {} environment",
                self.environment
            )));
        }
        Ok(())
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Configuration backed by in-memory storage, for tests and demos
    pub fn in_memory() -> Self {
        Self {
            environment: "test".to_string(),
            server: ServerConfig::default(),
            database: DatabaseConfig {
                backend: StorageBackend::Memory,
                url: String::new(),
                max_connections: 1,
                min_connections: 0,
            },
            auth: AuthConfig {
                jwt_secret: "test-secret".to_string(),
                access_token_expiry: 3600,
                bcrypt_cost: 4,
            },
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}
