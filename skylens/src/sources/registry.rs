//! Remote place registry source.
//!
//! Queries a place registry service over HTTP for named landmarks near a
//! position. Responses are cached per query cell so repeated
//! identifications from the same spot (the common burst pattern when a
//! user re-frames a shot) do not refetch.
//!
//! # URL Pattern
//!
//! `{base}/places?lat={lat}&lon={lon}&radius={m}&limit={n}`
//!
//! - Optional `X-Api-Key` header when the registry requires a key
//! - HTTP 429 surfaces as [`SourceError::RateLimited`]

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde::Deserialize;
use tracing::{debug, warn};

use super::http::AsyncHttpClient;
use super::types::{CandidateSource, SourceError, SourceQuery};
use crate::candidate::{Candidate, LandmarkCategory, Provenance};
use crate::geo::GeoPoint;

/// How long a cached registry response stays valid.
const CACHE_TTL_SECS: u64 = 300;

/// Maximum number of query cells kept in the cache.
const CACHE_MAX_CELLS: u64 = 256;

/// Query cell quantization: 1e-3 degrees is roughly a 100 m cell, finer
/// than GPS accuracy, so co-located queries share a cell.
const CELL_SCALE: f64 = 1_000.0;

/// One place record as returned by the registry service.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryPlace {
    /// Registry identifier, if assigned.
    #[serde(default)]
    pub id: Option<String>,
    /// Place name.
    pub name: String,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Structure height in meters, when known.
    #[serde(default)]
    pub height_m: Option<f64>,
    /// Construction year, when known.
    #[serde(default)]
    pub year_built: Option<u16>,
    /// Category label, when classified.
    #[serde(default)]
    pub category: Option<String>,
    /// Street address, when known.
    #[serde(default)]
    pub address: Option<String>,
}

/// Top-level registry response envelope.
#[derive(Debug, Deserialize)]
struct RegistryResponse {
    places: Vec<RegistryPlace>,
}

/// Cache key: quantized query cell plus the window parameters.
type QueryCell = (i64, i64, u64, usize);

fn query_cell(query: &SourceQuery) -> QueryCell {
    (
        (query.origin.latitude() * CELL_SCALE).round() as i64,
        (query.origin.longitude() * CELL_SCALE).round() as i64,
        query.radius_m.round() as u64,
        query.limit,
    )
}

/// Candidate source backed by a remote place registry.
pub struct PlaceRegistrySource<C: AsyncHttpClient> {
    http_client: C,
    base_url: String,
    api_key: Option<String>,
    cache: Cache<QueryCell, Arc<Vec<Candidate>>>,
}

impl<C: AsyncHttpClient> PlaceRegistrySource<C> {
    /// Creates a new registry source.
    ///
    /// # Arguments
    ///
    /// * `http_client` - HTTP client for making requests
    /// * `base_url` - Registry base URL, without a trailing slash
    /// * `api_key` - API key sent as `X-Api-Key`, when the registry needs one
    pub fn new(http_client: C, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        let cache = Cache::builder()
            .max_capacity(CACHE_MAX_CELLS)
            .time_to_live(Duration::from_secs(CACHE_TTL_SECS))
            .build();

        Self {
            http_client,
            base_url: base_url.into(),
            api_key,
            cache,
        }
    }

    /// Builds the places URL for the given query window.
    fn build_url(&self, query: &SourceQuery) -> String {
        format!(
            "{}/places?lat={:.6}&lon={:.6}&radius={:.0}&limit={}",
            self.base_url,
            query.origin.latitude(),
            query.origin.longitude(),
            query.radius_m,
            query.limit
        )
    }

    async fn fetch(&self, query: &SourceQuery) -> Result<Vec<Candidate>, SourceError> {
        let url = self.build_url(query);

        let body = match &self.api_key {
            Some(key) => {
                self.http_client
                    .get_with_headers(&url, &[("X-Api-Key", key.as_str())])
                    .await?
            }
            None => self.http_client.get(&url).await?,
        };

        let response: RegistryResponse = serde_json::from_slice(&body)
            .map_err(|e| SourceError::InvalidResponse(format!("Malformed registry JSON: {}", e)))?;

        let candidates = response
            .places
            .into_iter()
            .enumerate()
            .filter_map(|(index, place)| convert_place(index, place))
            .collect();

        Ok(candidates)
    }
}

/// Converts one registry record to a candidate.
///
/// Records with out-of-range coordinates are logged and skipped; one bad
/// record must not poison the rest of the response.
fn convert_place(index: usize, place: RegistryPlace) -> Option<Candidate> {
    let position = match GeoPoint::new(place.latitude, place.longitude) {
        Ok(position) => position,
        Err(e) => {
            warn!(
                name = %place.name,
                error = %e,
                "Skipping registry place with invalid coordinates"
            );
            return None;
        }
    };

    let id = place.id.unwrap_or_else(|| format!("place:{}", index));
    let category = place
        .category
        .as_deref()
        .map(LandmarkCategory::from_label)
        .unwrap_or(LandmarkCategory::Other);

    let candidate = Candidate::stationary(
        id,
        place.name,
        position,
        Provenance::Registry,
        place.height_m,
        place.year_built,
        category,
    );

    Some(match place.address {
        Some(address) => candidate.with_address(address),
        None => candidate,
    })
}

impl<C: AsyncHttpClient> CandidateSource for PlaceRegistrySource<C> {
    async fn search(&self, query: &SourceQuery) -> Result<Vec<Candidate>, SourceError> {
        let cell = query_cell(query);

        if let Some(cached) = self.cache.get(&cell).await {
            debug!(?cell, "Registry cache hit");
            return Ok((*cached).clone());
        }

        let candidates = self.fetch(query).await?;
        self.cache
            .insert(cell, Arc::new(candidates.clone()))
            .await;

        Ok(candidates)
    }

    fn name(&self) -> &str {
        "PlaceRegistry"
    }

    fn provenance(&self) -> Provenance {
        Provenance::Registry
    }
}
