//! Configuration module
//!
//! Loads configuration from environment variables.

use std::env;

use rust_decimal::Decimal;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL
    pub database_url: String,

    /// Maximum database connections in pool
    pub database_max_connections: u32,

    /// Fixed USD -> EUR exchange rate
    pub usd_eur_rate: Decimal,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url =
            env::var("DATABASE_URL").map_err(|_| ConfigError::MissingEnv("DATABASE_URL"))?;

        let database_max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("DATABASE_MAX_CONNECTIONS"))?;

        let usd_eur_rate: Decimal = env::var("USD_EUR_RATE")
            .unwrap_or_else(|_| "0.92".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("USD_EUR_RATE"))?;

        if usd_eur_rate <= Decimal::ZERO {
            return Err(ConfigError::InvalidValue("USD_EUR_RATE"));
        }

        Ok(Self {
            database_url,
            database_max_connections,
            usd_eur_rate,
        })
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}
