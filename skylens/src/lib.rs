//! SkyLens - Camera targeting and candidate fusion
//!
//! This library turns "camera here, pointing there, zoomed this much" into
//! a real-world target location and a ranked list of candidate objects,
//! fusing a vision recognizer, a remote place registry, a local catalog,
//! and a live aircraft feed.
//!
//! # High-Level API
//!
//! For most use cases, the [`engine`] module provides a simplified facade:
//!
//! ```ignore
//! use skylens::config::EngineConfig;
//! use skylens::engine::{SightOptions, TargetingEngine};
//! use skylens::sources::build_sources;
//! use tokio_util::sync::CancellationToken;
//!
//! let config = EngineConfig::load()?;
//! let sources = build_sources(&config, Some(vision))?;
//! let engine = TargetingEngine::new(config);
//!
//! let sighting = engine
//!     .sight_stationary(&metadata, &SightOptions::default(), &sources, &CancellationToken::new())
//!     .await?;
//! ```

pub mod aerial;
pub mod candidate;
pub mod capture;
pub mod confidence;
pub mod config;
pub mod distance;
pub mod engine;
pub mod fix;
pub mod fusion;
pub mod geo;
pub mod logging;
pub mod metrics;
pub mod projection;
pub mod sources;
pub mod visibility;

/// Version of the SkyLens library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
