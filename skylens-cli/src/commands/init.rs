//! Init command - initialize configuration file.

use std::fs;

use skylens::config::{config_directory, config_file_path};

use crate::error::CliError;

/// Template written for a fresh install. Source sections stay commented
/// out until the user fills in their own endpoints.
const CONFIG_TEMPLATE: &str = "\
# SkyLens configuration
#
# Values here override built-in defaults. CLI arguments override both.

[fusion]
# Half-width of the bearing search window in degrees.
bearing_tolerance_deg = 15.0
# Name similarity above which two candidates merge, in (0, 1].
similarity_threshold = 0.8
# Maximum ranked candidates returned.
max_results = 10
# Search radius in meters when a request does not set one.
default_radius_m = 5000.0
# Per-source search deadline in seconds.
source_timeout_secs = 10
# Upper bound on the optical estimate as a multiple of GPS distance.
gps_bound_factor = 2.0

[distance]
# Distance in meters for an unzoomed capture at the reference view.
base_distance_m = 130.0
reference_fov_deg = 60.0
reference_coverage_pct = 50.0

[registry]
# Remote place registry. Disabled until a url is set.
# url = https://places.example.com
# api_key = your-key-here

[flightfeed]
# Live aircraft feed. Disabled until a url is set.
# url = https://flights.example.com
# Reports older than this many seconds are discarded.
max_stale_secs = 60

[catalog]
# Offline landmark catalog. Disabled until a path is set.
# path = ~/.skylens/landmarks.json
";

/// Run the init command.
pub fn run() -> Result<(), CliError> {
    let path = config_file_path();

    if path.exists() {
        println!("Configuration file already exists: {}", path.display());
        println!("Edit it directly, or remove it and re-run 'skylens init'.");
        return Ok(());
    }

    fs::create_dir_all(config_directory())
        .map_err(|e| CliError::Config(format!("Failed to create config directory: {}", e)))?;
    fs::write(&path, CONFIG_TEMPLATE)
        .map_err(|e| CliError::Config(format!("Failed to write config file: {}", e)))?;

    println!("Configuration file: {}", path.display());
    println!();
    println!("Edit this file to customize SkyLens settings.");
    println!("CLI arguments override config file values when specified.");
    Ok(())
}
