//! Source assembly from configuration.
//!
//! Builds the production source set for an identification session: the
//! recognizer output supplied by the caller plus whichever network and
//! local sources the configuration enables.

use std::time::Duration;

use thiserror::Error;
use tracing::info;

use crate::config::EngineConfig;

use super::{
    AsyncReqwestClient, CandidateSourceType, CatalogError, FlightFeedSource, LocalCatalog,
    PlaceRegistrySource, SourceError, VisionSource,
};

/// Errors assembling the source set.
#[derive(Debug, Error)]
pub enum SourceBuildError {
    /// HTTP client construction failed
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] SourceError),

    /// Local catalog could not be loaded
    #[error("failed to load landmark catalog: {0}")]
    Catalog(#[from] CatalogError),
}

/// Builds every enabled source from the configuration.
///
/// The recognizer output travels with the capture, so the caller passes it
/// in; registry, catalog, and flight feed sources are created only when
/// their configuration section carries a URL or path. The returned set may
/// be empty, which identifies to an empty result rather than an error.
pub fn build_sources(
    config: &EngineConfig,
    vision: Option<VisionSource>,
) -> Result<Vec<CandidateSourceType>, SourceBuildError> {
    let mut sources = Vec::new();

    if let Some(vision) = vision {
        info!(objects = vision.len(), "using recognizer output source");
        sources.push(CandidateSourceType::Vision(vision));
    }

    if let Some(url) = &config.registry.url {
        info!(url = url.as_str(), "enabling place registry source");
        let client = AsyncReqwestClient::with_timeout(config.fusion.source_timeout.as_secs())?;
        sources.push(CandidateSourceType::Registry(PlaceRegistrySource::new(
            client,
            url.clone(),
            config.registry.api_key.clone(),
        )));
    }

    if let Some(path) = &config.catalog.path {
        let catalog = LocalCatalog::from_json_file(path)?;
        info!(path = %path.display(), entries = catalog.len(), "enabling local catalog source");
        sources.push(CandidateSourceType::Catalog(catalog));
    }

    if let Some(url) = &config.flightfeed.url {
        info!(url = url.as_str(), "enabling flight feed source");
        let client = AsyncReqwestClient::with_timeout(config.fusion.source_timeout.as_secs())?;
        sources.push(CandidateSourceType::FlightFeed(FlightFeedSource::new(
            client,
            url.clone(),
            Duration::from_secs(config.flightfeed.max_stale_secs),
        )));
    }

    Ok(sources)
}
