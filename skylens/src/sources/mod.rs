//! Candidate source abstraction
//!
//! This module provides traits and implementations for looking up candidate
//! identifications from various sources (vision recognizer output, remote
//! place registries, local catalogs, live aircraft feeds).
//!
//! # Heterogeneous source sets
//!
//! Production code holds a mixed set of sources as [`CandidateSourceType`]
//! values:
//!
//! ```ignore
//! use skylens::sources::{CandidateSourceType, LocalCatalog, VisionSource};
//!
//! let sources = vec![
//!     CandidateSourceType::Vision(VisionSource::new(recognized)),
//!     CandidateSourceType::Catalog(LocalCatalog::from_json_file("landmarks.json")?),
//! ];
//! ```

mod catalog;
mod factory;
mod flightfeed;
mod http;
mod registry;
mod types;
mod vision;

pub use catalog::{CatalogEntry, CatalogError, LocalCatalog};
pub use factory::{build_sources, SourceBuildError};
pub use flightfeed::{FeedAircraft, FlightFeedSource, DEFAULT_MAX_STALE};
pub use http::{AsyncHttpClient, AsyncReqwestClient};
pub use registry::{PlaceRegistrySource, RegistryPlace};
pub use types::{CandidateSource, SourceError, SourceQuery};
pub use vision::{RecognizedObject, VisionSource};

#[cfg(test)]
pub use http::tests::MockAsyncHttpClient;

use crate::candidate::{Candidate, Provenance};

/// Enum to hold different candidate source types.
///
/// This allows callers to assemble heterogeneous source sets while the
/// [`CandidateSource`] trait stays free of trait objects.
pub enum CandidateSourceType {
    /// Recognizer output for the captured frame.
    Vision(VisionSource),
    /// Remote place registry.
    Registry(PlaceRegistrySource<AsyncReqwestClient>),
    /// Local offline catalog.
    Catalog(LocalCatalog),
    /// Live aircraft feed.
    FlightFeed(FlightFeedSource<AsyncReqwestClient>),
}

impl CandidateSource for CandidateSourceType {
    async fn search(&self, query: &SourceQuery) -> Result<Vec<Candidate>, SourceError> {
        match self {
            Self::Vision(s) => s.search(query).await,
            Self::Registry(s) => s.search(query).await,
            Self::Catalog(s) => s.search(query).await,
            Self::FlightFeed(s) => s.search(query).await,
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::Vision(s) => s.name(),
            Self::Registry(s) => s.name(),
            Self::Catalog(s) => s.name(),
            Self::FlightFeed(s) => s.name(),
        }
    }

    fn provenance(&self) -> Provenance {
        match self {
            Self::Vision(s) => s.provenance(),
            Self::Registry(s) => s.provenance(),
            Self::Catalog(s) => s.provenance(),
            Self::FlightFeed(s) => s.provenance(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::GeoPoint;

    #[tokio::test]
    async fn test_source_type_delegates() {
        let catalog = LocalCatalog::from_entries(vec![CatalogEntry {
            id: Some("coit".to_string()),
            name: "Coit Tower".to_string(),
            latitude: 37.8024,
            longitude: -122.4058,
            height_m: Some(64.0),
            year_built: Some(1933),
            category: Some("tower".to_string()),
            address: None,
        }]);
        let source = CandidateSourceType::Catalog(catalog);

        assert_eq!(source.name(), "LocalCatalog");
        assert_eq!(source.provenance(), Provenance::Catalog);

        let query = SourceQuery::new(GeoPoint::new(37.8024, -122.4058).unwrap(), 1000.0, 5);
        let results = source.search(&query).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id(), "coit");
    }
}
