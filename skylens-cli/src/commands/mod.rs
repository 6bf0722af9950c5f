//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`aircraft`] - Aircraft identification from a skyward capture
//! - [`config`] - Configuration management (list, path)
//! - [`fix`] - Optical fix projection without querying sources
//! - [`identify`] - Landmark identification from a captured scene
//! - [`init`] - Configuration initialization

pub mod aircraft;
pub mod common;
pub mod config;
pub mod fix;
pub mod identify;
pub mod init;
pub mod scene;
