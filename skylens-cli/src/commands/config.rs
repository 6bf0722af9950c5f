//! Configuration management CLI commands.
//!
//! Provides `config list` and `config path` commands for viewing the
//! effective configuration from the command line.

use clap::Subcommand;

use skylens::config::{config_file_path, EngineConfig};

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// List the effective configuration (defaults overlaid with the file)
    List,

    /// Show the configuration file path
    Path,
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::List => run_list(),
        ConfigCommands::Path => run_path(),
    }
}

/// List the effective configuration.
fn run_list() -> Result<(), CliError> {
    let config = EngineConfig::load().map_err(|e| CliError::Config(e.to_string()))?;

    println!("Configuration Settings");
    println!("======================");
    println!();
    println!("[fusion]");
    println!(
        "  bearing_tolerance_deg = {}",
        config.fusion.base_bearing_tolerance_deg
    );
    println!(
        "  similarity_threshold = {}",
        config.fusion.similarity_threshold
    );
    println!("  max_results = {}", config.fusion.max_results);
    println!("  default_radius_m = {}", config.fusion.default_radius_m);
    println!(
        "  source_timeout_secs = {}",
        config.fusion.source_timeout.as_secs()
    );
    println!("  gps_bound_factor = {}", config.fusion.gps_bound_factor);
    println!();
    println!("[distance]");
    println!("  base_distance_m = {}", config.distance.base_distance_m);
    println!("  reference_fov_deg = {}", config.distance.reference_fov_deg);
    println!(
        "  reference_coverage_pct = {}",
        config.distance.reference_coverage_pct
    );
    println!();
    println!("[registry]");
    println!("  url = {}", not_set(config.registry.url.as_deref()));
    println!("  api_key = {}", not_set(config.registry.api_key.as_deref()));
    println!();
    println!("[flightfeed]");
    println!("  url = {}", not_set(config.flightfeed.url.as_deref()));
    println!("  max_stale_secs = {}", config.flightfeed.max_stale_secs);
    println!();
    println!("[catalog]");
    match config.catalog.path {
        Some(ref path) => println!("  path = {}", path.display()),
        None => println!("  path = (not set)"),
    }

    Ok(())
}

/// Show the configuration file path.
fn run_path() -> Result<(), CliError> {
    println!("{}", config_file_path().display());
    Ok(())
}

fn not_set(value: Option<&str>) -> &str {
    value.unwrap_or("(not set)")
}
