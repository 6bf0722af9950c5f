//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::path::PathBuf;
use std::process;

use skylens::capture::CaptureError;
use skylens::engine::SightError;
use skylens::sources::SourceBuildError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Scene file could not be read or parsed
    Scene { path: PathBuf, message: String },
    /// Scene carried camera values the engine rejects
    Capture(CaptureError),
    /// Failed to build candidate sources from configuration
    Sources(SourceBuildError),
    /// Identification failed
    Sight(SightError),
    /// Failed to start the async runtime
    Runtime(std::io::Error),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        match self {
            CliError::Config(_) => {
                eprintln!();
                eprintln!("Run 'skylens init' to create a configuration file,");
                eprintln!("or 'skylens config path' to see where one is expected.");
            }
            CliError::Sources(SourceBuildError::Catalog(_)) => {
                eprintln!();
                eprintln!("Check the [catalog] path setting in your config file.");
            }
            CliError::Scene { .. } => {
                eprintln!();
                eprintln!("Scene files are JSON with a \"camera\" object and an");
                eprintln!("optional \"recognized\" array. See the README for the format.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Scene { path, message } => {
                write!(f, "Failed to load scene '{}': {}", path.display(), message)
            }
            CliError::Capture(e) => write!(f, "Invalid capture: {}", e),
            CliError::Sources(e) => write!(f, "Failed to build sources: {}", e),
            CliError::Sight(e) => write!(f, "Identification failed: {}", e),
            CliError::Runtime(e) => write!(f, "Failed to start runtime: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Capture(e) => Some(e),
            CliError::Sources(e) => Some(e),
            CliError::Sight(e) => Some(e),
            CliError::Runtime(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CaptureError> for CliError {
    fn from(e: CaptureError) -> Self {
        CliError::Capture(e)
    }
}

impl From<SourceBuildError> for CliError {
    fn from(e: SourceBuildError) -> Self {
        CliError::Sources(e)
    }
}

impl From<SightError> for CliError {
    fn from(e: SightError) -> Self {
        CliError::Sight(e)
    }
}
