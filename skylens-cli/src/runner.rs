//! CLI runner for common setup and operations.
//!
//! Encapsulates configuration loading and logging initialization to reduce
//! duplication across command handlers.

use std::path::Path;

use tracing::info;

use skylens::config::EngineConfig;
use skylens::logging::{default_log_dir, default_log_file, init_logging, LoggingGuard};

use crate::error::CliError;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    /// Loaded configuration
    config: EngineConfig,
}

impl CliRunner {
    /// Create a new CLI runner, loading config and initializing logging.
    ///
    /// # Arguments
    ///
    /// * `config_path` - Config file to load instead of ~/.skylens/config.ini
    pub fn new(config_path: Option<&Path>) -> Result<Self, CliError> {
        // Load config file (or use defaults if not present)
        let config = match config_path {
            Some(path) => EngineConfig::load_from(path),
            None => EngineConfig::load(),
        }
        .map_err(|e| CliError::Config(e.to_string()))?;

        let logging_guard = init_logging(default_log_dir(), default_log_file())
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("SkyLens v{}", skylens::VERSION);
        info!("SkyLens CLI: {} command", command);
    }
}
