//! Configuration file handling for ~/.skylens/config.ini.
//!
//! Loads user configuration with sensible defaults; a missing file means
//! defaults. Every value here feeds
//! [`TargetingEngine`](crate::engine::TargetingEngine) construction, so
//! parsing rejects values the engine would later refuse.

use std::path::{Path, PathBuf};
use std::time::Duration;

use ini::Ini;
use thiserror::Error;

use crate::distance::DistanceModel;
use crate::fusion::FusionConfig;

/// Default staleness ceiling for live feed reports, in seconds.
pub const DEFAULT_FEED_MAX_STALE_SECS: u64 = 60;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },
}

/// Remote place registry settings.
#[derive(Debug, Clone, Default)]
pub struct RegistrySettings {
    /// Base URL of the registry service; the source is disabled when unset.
    pub url: Option<String>,
    /// API key sent as `X-Api-Key` when present.
    pub api_key: Option<String>,
}

/// Live aircraft feed settings.
#[derive(Debug, Clone)]
pub struct FlightFeedSettings {
    /// Base URL of the feed service; the source is disabled when unset.
    pub url: Option<String>,
    /// Reports older than this many seconds are discarded.
    pub max_stale_secs: u64,
}

impl Default for FlightFeedSettings {
    fn default() -> Self {
        Self {
            url: None,
            max_stale_secs: DEFAULT_FEED_MAX_STALE_SECS,
        }
    }
}

/// Local landmark catalog settings.
#[derive(Debug, Clone, Default)]
pub struct CatalogSettings {
    /// Path to the catalog JSON file; the source is disabled when unset.
    pub path: Option<PathBuf>,
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Distance estimation model parameters.
    pub distance: DistanceModel,
    /// Fusion pipeline tunables.
    pub fusion: FusionConfig,
    /// Remote place registry settings.
    pub registry: RegistrySettings,
    /// Live aircraft feed settings.
    pub flightfeed: FlightFeedSettings,
    /// Local landmark catalog settings.
    pub catalog: CatalogSettings,
}

impl EngineConfig {
    /// Load configuration from the default path (~/.skylens/config.ini).
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_file_path();
        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        parse_ini(&ini)
    }
}

/// Get the path to the config directory (~/.skylens).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".skylens")
}

/// Get the path to the config file (~/.skylens/config.ini).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}

/// Parse an `Ini` object into an `EngineConfig`.
///
/// Starts from `EngineConfig::default()` and overlays any values found in
/// the INI.
fn parse_ini(ini: &Ini) -> Result<EngineConfig, ConfigError> {
    let mut config = EngineConfig::default();

    // [fusion] section
    if let Some(section) = ini.section(Some("fusion")) {
        if let Some(v) = section.get("bearing_tolerance_deg") {
            config.fusion.base_bearing_tolerance_deg =
                parse_positive_float(v, "fusion", "bearing_tolerance_deg")?;
        }
        if let Some(v) = section.get("similarity_threshold") {
            let parsed = parse_positive_float(v, "fusion", "similarity_threshold")?;
            if parsed > 1.0 {
                return Err(ConfigError::InvalidValue {
                    section: "fusion".to_string(),
                    key: "similarity_threshold".to_string(),
                    value: v.to_string(),
                    reason: "must be in (0.0, 1.0]".to_string(),
                });
            }
            config.fusion.similarity_threshold = parsed;
        }
        if let Some(v) = section.get("max_results") {
            config.fusion.max_results = parse_positive_int(v, "fusion", "max_results")?;
        }
        if let Some(v) = section.get("default_radius_m") {
            config.fusion.default_radius_m = parse_positive_float(v, "fusion", "default_radius_m")?;
        }
        if let Some(v) = section.get("source_timeout_secs") {
            let secs: u64 = parse_positive_int(v, "fusion", "source_timeout_secs")? as u64;
            config.fusion.source_timeout = Duration::from_secs(secs);
        }
        if let Some(v) = section.get("gps_bound_factor") {
            config.fusion.gps_bound_factor = parse_positive_float(v, "fusion", "gps_bound_factor")?;
        }
    }

    // [distance] section
    if let Some(section) = ini.section(Some("distance")) {
        if let Some(v) = section.get("base_distance_m") {
            config.distance.base_distance_m = parse_positive_float(v, "distance", "base_distance_m")?;
        }
        if let Some(v) = section.get("reference_fov_deg") {
            config.distance.reference_fov_deg =
                parse_positive_float(v, "distance", "reference_fov_deg")?;
        }
        if let Some(v) = section.get("reference_coverage_pct") {
            config.distance.reference_coverage_pct =
                parse_positive_float(v, "distance", "reference_coverage_pct")?;
        }
    }

    // [registry] section
    if let Some(section) = ini.section(Some("registry")) {
        if let Some(v) = section.get("url") {
            let v = v.trim();
            if !v.is_empty() {
                config.registry.url = Some(v.to_string());
            }
        }
        if let Some(v) = section.get("api_key") {
            let v = v.trim();
            if !v.is_empty() {
                config.registry.api_key = Some(v.to_string());
            }
        }
    }

    // [flightfeed] section
    if let Some(section) = ini.section(Some("flightfeed")) {
        if let Some(v) = section.get("url") {
            let v = v.trim();
            if !v.is_empty() {
                config.flightfeed.url = Some(v.to_string());
            }
        }
        if let Some(v) = section.get("max_stale_secs") {
            config.flightfeed.max_stale_secs =
                parse_positive_int(v, "flightfeed", "max_stale_secs")? as u64;
        }
    }

    // [catalog] section
    if let Some(section) = ini.section(Some("catalog")) {
        if let Some(v) = section.get("path") {
            let v = v.trim();
            if !v.is_empty() {
                config.catalog.path = Some(expand_tilde(v));
            }
        }
    }

    Ok(config)
}

fn parse_positive_float(value: &str, section: &str, key: &str) -> Result<f64, ConfigError> {
    let parsed: f64 = value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason: "must be a number".to_string(),
        })?;
    if !parsed.is_finite() || parsed <= 0.0 {
        return Err(ConfigError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason: "must be a positive number".to_string(),
        });
    }
    Ok(parsed)
}

fn parse_positive_int(value: &str, section: &str, key: &str) -> Result<usize, ConfigError> {
    let parsed: usize = value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason: "must be a positive integer".to_string(),
        })?;
    if parsed == 0 {
        return Err(ConfigError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason: "must be a positive integer".to_string(),
        });
    }
    Ok(parsed)
}

/// Expand ~ to home directory in paths.
fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
