//! # Configuration
//!
//! Environment-based configuration with explicit validation. The database URL
//! is the only hard requirement; cadence parameters default to values that
//! are sane for local development. Invalid values fail at startup rather than
//! falling back silently.

use config::{Config, Environment};
use serde::Deserialize;
use std::time::Duration;

use crate::error::{ProcessorError, Result};

/// Runtime configuration, loaded from environment variables
/// (`DATABASE_URL`, `PORT`, `BATCH_SIZE`, `POLL_INTERVAL`,
/// `DATABASE_MAX_CONNECTIONS`).
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    /// Maximum elements claimed per poll tick.
    pub batch_size: i64,
    /// Seconds between poll ticks.
    pub poll_interval: u64,
    pub database_max_connections: u32,
}

impl AppConfig {
    /// Load from the environment, applying defaults for everything except
    /// the database URL.
    pub fn load() -> Result<AppConfig> {
        let settings = Config::builder()
            .set_default("port", 8080_i64)
            .map_err(config_error)?
            .set_default("batch_size", 10_i64)
            .map_err(config_error)?
            .set_default("poll_interval", 5_i64)
            .map_err(config_error)?
            .set_default("database_max_connections", 10_i64)
            .map_err(config_error)?
            .add_source(Environment::default())
            .build()
            .map_err(config_error)?;

        let app_config: AppConfig = settings.try_deserialize().map_err(config_error)?;
        app_config.validate()?;
        Ok(app_config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size < 1 {
            return Err(ProcessorError::Configuration(format!(
                "BATCH_SIZE must be positive, got {}",
                self.batch_size
            )));
        }
        if self.poll_interval < 1 {
            return Err(ProcessorError::Configuration(
                "POLL_INTERVAL must be at least 1 second".to_string(),
            ));
        }
        if self.database_max_connections < 1 {
            return Err(ProcessorError::Configuration(
                "DATABASE_MAX_CONNECTIONS must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval)
    }
}

fn config_error(err: config::ConfigError) -> ProcessorError {
    ProcessorError::Configuration(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> AppConfig {
        AppConfig {
            database_url: "postgresql://localhost/batchproc_test".to_string(),
            port: 8080,
            batch_size: 10,
            poll_interval: 5,
            database_max_connections: 10,
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn zero_batch_size_rejected() {
        let mut cfg = base_config();
        cfg.batch_size = 0;
        assert!(matches!(
            cfg.validate(),
            Err(ProcessorError::Configuration(_))
        ));
    }

    #[test]
    fn zero_poll_interval_rejected() {
        let mut cfg = base_config();
        cfg.poll_interval = 0;
        assert!(matches!(
            cfg.validate(),
            Err(ProcessorError::Configuration(_))
        ));
    }

    #[test]
    fn poll_interval_duration() {
        assert_eq!(base_config().poll_interval(), Duration::from_secs(5));
    }
}
