//! Multi-source candidate fusion.
//!
//! The fusion engine fans an identify request out to every configured
//! candidate source, keeps each failure isolated to its own source, and
//! refines the combined pool into one ranked list: bearing-window filter,
//! distance annotation, fuzzy name dedup, distance sort, then a
//! line-of-sight pass for stationary targets or an elevation pass for
//! aerial ones.
//!
//! All tunables live in [`FusionConfig`]; the defaults below are the
//! shipped policy.

mod similarity;

pub use similarity::{levenshtein, name_similarity};

use std::sync::Arc;
use std::time::Duration;

use futures::future;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::aerial;
use crate::candidate::{Candidate, Provenance};
use crate::distance;
use crate::geo::{angular_difference, great_circle_distance, initial_bearing, GeoPoint};
use crate::metrics::{FusionMetrics, MetricsSnapshot};
use crate::sources::{CandidateSource, SourceQuery};
use crate::visibility;

// ============================================================================
// Policy constants
// ============================================================================

/// Half-width of the bearing acceptance window, before the per-provenance
/// tolerance factor is applied.
pub const DEFAULT_BEARING_TOLERANCE_DEG: f64 = 15.0;

/// Name pairs scoring above this are treated as the same real-world object.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.8;

/// Ranked candidates returned per identification.
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Search radius when the request does not carry one.
pub const DEFAULT_RADIUS_M: f64 = 5_000.0;

/// Hard ceiling on a single source search.
pub const DEFAULT_SOURCE_TIMEOUT: Duration = Duration::from_secs(10);

/// A heuristic distance beyond this multiple of the straight-line GPS
/// distance is discarded in favor of the GPS figure.
pub const DEFAULT_GPS_BOUND_FACTOR: f64 = 2.0;

/// Candidates closer than this to the camera skip the bearing test; the
/// bearing to a nearly coincident point is numerically meaningless.
pub const MIN_BEARING_DISTANCE_M: f64 = 1.0;

/// Sources are asked for this many times the requested result count. The
/// bearing window keeps roughly a tenth of a radius disc, so the oversample
/// leaves enough survivors to fill the ranked list.
const SOURCE_LIMIT_FACTOR: usize = 10;

// ============================================================================
// Configuration and request types
// ============================================================================

/// Tunables for the fusion pipeline.
#[derive(Debug, Clone)]
pub struct FusionConfig {
    /// Base half-width of the bearing window in degrees.
    pub base_bearing_tolerance_deg: f64,
    /// Name similarity above which two candidates merge.
    pub similarity_threshold: f64,
    /// Maximum ranked candidates returned.
    pub max_results: usize,
    /// Search radius used when a request leaves it unset.
    pub default_radius_m: f64,
    /// Per-source search deadline.
    pub source_timeout: Duration,
    /// Upper bound on heuristic distance as a multiple of GPS distance.
    pub gps_bound_factor: f64,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            base_bearing_tolerance_deg: DEFAULT_BEARING_TOLERANCE_DEG,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            max_results: DEFAULT_MAX_RESULTS,
            default_radius_m: DEFAULT_RADIUS_M,
            source_timeout: DEFAULT_SOURCE_TIMEOUT,
            gps_bound_factor: DEFAULT_GPS_BOUND_FACTOR,
        }
    }
}

/// One identification request against a set of sources.
#[derive(Debug, Clone)]
pub struct IdentifyRequest {
    /// Camera position at capture time.
    pub origin: GeoPoint,
    /// Target bearing from the camera in degrees.
    pub bearing_deg: f64,
    /// Overrides the configured bearing tolerance when set.
    pub bearing_tolerance_deg: Option<f64>,
    /// Search radius around the origin in meters.
    pub radius_m: f64,
    /// Overrides the configured result cap when set.
    pub max_results: Option<usize>,
    /// Heuristic camera-to-target distance in meters, when the caller
    /// estimated one. Bounded against GPS distance before use.
    pub heuristic_distance_m: Option<f64>,
}

impl IdentifyRequest {
    /// Creates a request with the optional knobs unset.
    pub fn new(origin: GeoPoint, bearing_deg: f64, radius_m: f64) -> Self {
        Self {
            origin,
            bearing_deg,
            bearing_tolerance_deg: None,
            radius_m,
            max_results: None,
            heuristic_distance_m: None,
        }
    }

    fn validate(&self) -> Result<(), FusionError> {
        if !self.bearing_deg.is_finite() {
            return Err(FusionError::InvalidRequest(format!(
                "bearing must be finite, got {}",
                self.bearing_deg
            )));
        }
        if !self.radius_m.is_finite() || self.radius_m <= 0.0 {
            return Err(FusionError::InvalidRequest(format!(
                "radius must be positive and finite, got {}",
                self.radius_m
            )));
        }
        if let Some(tolerance) = self.bearing_tolerance_deg {
            if !tolerance.is_finite() || tolerance <= 0.0 {
                return Err(FusionError::InvalidRequest(format!(
                    "bearing tolerance must be positive and finite, got {tolerance}"
                )));
            }
        }
        if self.max_results == Some(0) {
            return Err(FusionError::InvalidRequest(
                "max results must be at least 1".to_string(),
            ));
        }
        if let Some(heuristic) = self.heuristic_distance_m {
            if !heuristic.is_finite() || heuristic <= 0.0 {
                return Err(FusionError::InvalidRequest(format!(
                    "heuristic distance must be positive and finite, got {heuristic}"
                )));
            }
        }
        Ok(())
    }
}

/// Camera attitude for aerial identification.
#[derive(Debug, Clone, Copy)]
pub struct AerialContext {
    /// Camera pitch above the horizon in degrees.
    pub pitch_deg: f64,
    /// Camera altitude above ground in meters.
    pub camera_altitude_m: f64,
    /// Horizontal field of view in degrees.
    pub fov_deg: f64,
    /// When set, live feeds are tried first and the first one producing an
    /// in-window candidate wins outright.
    pub auto_detect: bool,
}

impl AerialContext {
    /// Creates a context with auto-detection enabled.
    pub fn new(pitch_deg: f64, camera_altitude_m: f64, fov_deg: f64) -> Self {
        Self {
            pitch_deg,
            camera_altitude_m,
            fov_deg,
            auto_detect: true,
        }
    }

    fn validate(&self) -> Result<(), FusionError> {
        if !self.pitch_deg.is_finite() {
            return Err(FusionError::InvalidRequest(format!(
                "pitch must be finite, got {}",
                self.pitch_deg
            )));
        }
        if !self.camera_altitude_m.is_finite() {
            return Err(FusionError::InvalidRequest(format!(
                "camera altitude must be finite, got {}",
                self.camera_altitude_m
            )));
        }
        if !self.fov_deg.is_finite() || self.fov_deg <= 0.0 || self.fov_deg > 180.0 {
            return Err(FusionError::InvalidRequest(format!(
                "field of view must be in (0, 180], got {}",
                self.fov_deg
            )));
        }
        Ok(())
    }
}

/// Errors that abort an identification outright.
///
/// Individual source failures never surface here; they are logged, counted,
/// and treated as empty contributions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FusionError {
    /// The caller cancelled the identification
    #[error("identification cancelled")]
    Cancelled,

    /// The request carried a non-finite or out-of-range parameter
    #[error("invalid identify request: {0}")]
    InvalidRequest(String),
}

// ============================================================================
// Engine
// ============================================================================

/// Fans identify requests out to candidate sources and fuses the results.
#[derive(Debug, Clone)]
pub struct FusionEngine {
    config: FusionConfig,
    metrics: Arc<FusionMetrics>,
}

impl FusionEngine {
    /// Creates an engine with its own metrics registry.
    pub fn new(config: FusionConfig) -> Self {
        Self::with_metrics(config, Arc::new(FusionMetrics::default()))
    }

    /// Creates an engine that records into a shared metrics registry.
    pub fn with_metrics(config: FusionConfig, metrics: Arc<FusionMetrics>) -> Self {
        Self { config, metrics }
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &FusionConfig {
        &self.config
    }

    /// Returns a point-in-time copy of the engine counters.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Identifies stationary targets along the request bearing.
    ///
    /// All sources are queried concurrently, each under the configured
    /// timeout. A source that fails or times out contributes nothing and is
    /// recorded in the metrics; only cancellation or an invalid request
    /// fails the call. Results come back deduplicated, occlusion-filtered,
    /// and sorted by distance.
    pub async fn identify_stationary<S: CandidateSource>(
        &self,
        request: &IdentifyRequest,
        sources: &[S],
        cancel: &CancellationToken,
    ) -> Result<Vec<Candidate>, FusionError> {
        request.validate()?;
        self.metrics.record_identification();

        if sources.is_empty() {
            debug!("no sources configured, returning empty identification");
            return Ok(Vec::new());
        }
        if cancel.is_cancelled() {
            return Err(FusionError::Cancelled);
        }

        let order = priority_order(sources);
        let query = self.source_query(request);
        self.metrics.record_sources_queried(sources.len());
        let batches = self.gather(sources, &order, &query, cancel).await?;

        let tolerance = self.tolerance(request);
        let mut candidates = self.refine(request, tolerance, batches);

        let (kept, occluded) = visibility::filter_line_of_sight(request.origin, candidates);
        self.metrics.record_occlusions_dropped(occluded);
        candidates = kept;

        candidates.truncate(self.max_results(request));
        debug!(
            count = candidates.len(),
            occluded, "stationary identification complete"
        );
        Ok(candidates)
    }

    /// Identifies aerial targets along the request bearing.
    ///
    /// With `aerial.auto_detect` set, live feeds are tried one at a time in
    /// priority order and the first feed producing an in-window candidate
    /// short-circuits the rest; remaining sources are only consulted when no
    /// feed matched. Survivors must also agree with the camera pitch, see
    /// [`aerial::filter_by_elevation`].
    pub async fn identify_mobile<S: CandidateSource>(
        &self,
        request: &IdentifyRequest,
        aerial_context: &AerialContext,
        sources: &[S],
        cancel: &CancellationToken,
    ) -> Result<Vec<Candidate>, FusionError> {
        request.validate()?;
        aerial_context.validate()?;
        self.metrics.record_identification();

        if sources.is_empty() {
            debug!("no sources configured, returning empty identification");
            return Ok(Vec::new());
        }
        if cancel.is_cancelled() {
            return Err(FusionError::Cancelled);
        }

        // A moving target is easy to lose from a narrow window, but a wide
        // one pulls in unrelated traffic; cap the window at half the field
        // of view when auto-detecting.
        let mut tolerance = self.tolerance(request);
        if aerial_context.auto_detect {
            tolerance = tolerance.min(aerial_context.fov_deg / 2.0);
        }

        let order = priority_order(sources);
        let query = self.source_query(request);

        let batches = if aerial_context.auto_detect {
            self.gather_first_match(request, tolerance, sources, &order, &query, cancel)
                .await?
        } else {
            self.metrics.record_sources_queried(sources.len());
            self.gather(sources, &order, &query, cancel).await?
        };

        let candidates = self.refine(request, tolerance, batches);

        let (mut kept, dropped) = aerial::filter_by_elevation(
            aerial_context.pitch_deg,
            aerial_context.camera_altitude_m,
            request.origin,
            candidates,
        );
        self.metrics.record_elevation_dropped(dropped);

        kept.truncate(self.max_results(request));
        debug!(
            count = kept.len(),
            elevation_dropped = dropped,
            "aerial identification complete"
        );
        Ok(kept)
    }

    fn max_results(&self, request: &IdentifyRequest) -> usize {
        request.max_results.unwrap_or(self.config.max_results)
    }

    fn tolerance(&self, request: &IdentifyRequest) -> f64 {
        request
            .bearing_tolerance_deg
            .unwrap_or(self.config.base_bearing_tolerance_deg)
    }

    fn source_query(&self, request: &IdentifyRequest) -> SourceQuery {
        let limit = self.max_results(request).saturating_mul(SOURCE_LIMIT_FACTOR);
        SourceQuery::new(request.origin, request.radius_m, limit)
    }

    /// Runs every source in `order` concurrently and collects their batches
    /// in that order. Failures and timeouts become empty batches.
    async fn gather<S: CandidateSource>(
        &self,
        sources: &[S],
        order: &[usize],
        query: &SourceQuery,
        cancel: &CancellationToken,
    ) -> Result<Vec<Vec<Candidate>>, FusionError> {
        let searches = order
            .iter()
            .map(|&index| self.search_with_timeout(&sources[index], query));

        tokio::select! {
            _ = cancel.cancelled() => Err(FusionError::Cancelled),
            batches = future::join_all(searches) => Ok(batches),
        }
    }

    /// Auto-detect gathering for aerial targets: live feeds first, one at a
    /// time in priority order, short-circuiting on the first in-window hit.
    /// Falls back to a concurrent pass over the remaining sources.
    async fn gather_first_match<S: CandidateSource>(
        &self,
        request: &IdentifyRequest,
        tolerance_deg: f64,
        sources: &[S],
        order: &[usize],
        query: &SourceQuery,
        cancel: &CancellationToken,
    ) -> Result<Vec<Vec<Candidate>>, FusionError> {
        let mut fallback: Vec<usize> = Vec::new();
        let mut live_queried = 0;

        for &index in order {
            let source = &sources[index];
            if source.provenance() != Provenance::Registry {
                fallback.push(index);
                continue;
            }

            if cancel.is_cancelled() {
                return Err(FusionError::Cancelled);
            }

            live_queried += 1;
            let batch = self.search_one(source, query, cancel).await?;
            let matched = batch
                .iter()
                .any(|candidate| self.within_window(request, tolerance_deg, candidate).is_some());
            if matched {
                debug!(
                    source = source.name(),
                    "live feed matched, skipping remaining sources"
                );
                self.metrics.record_sources_queried(live_queried);
                return Ok(vec![batch]);
            }
        }

        self.metrics
            .record_sources_queried(live_queried + fallback.len());
        if fallback.is_empty() {
            return Ok(Vec::new());
        }
        self.gather(sources, &fallback, query, cancel).await
    }

    async fn search_one<S: CandidateSource>(
        &self,
        source: &S,
        query: &SourceQuery,
        cancel: &CancellationToken,
    ) -> Result<Vec<Candidate>, FusionError> {
        tokio::select! {
            _ = cancel.cancelled() => Err(FusionError::Cancelled),
            batch = self.search_with_timeout(source, query) => Ok(batch),
        }
    }

    /// One timeout-guarded source search. Never fails: errors and timeouts
    /// are logged, counted, and flattened to an empty batch.
    async fn search_with_timeout<S: CandidateSource>(
        &self,
        source: &S,
        query: &SourceQuery,
    ) -> Vec<Candidate> {
        match tokio::time::timeout(self.config.source_timeout, source.search(query)).await {
            Ok(Ok(candidates)) => {
                debug!(
                    source = source.name(),
                    count = candidates.len(),
                    "source answered"
                );
                candidates
            }
            Ok(Err(error)) => {
                warn!(
                    source = source.name(),
                    error = %error,
                    "source failed, continuing without it"
                );
                self.metrics.record_source_failed();
                Vec::new()
            }
            Err(_) => {
                warn!(
                    source = source.name(),
                    timeout_ms = self.config.source_timeout.as_millis() as u64,
                    "source timed out, continuing without it"
                );
                self.metrics.record_source_timed_out();
                Vec::new()
            }
        }
    }

    /// Window-filters, distance-annotates, dedups, and distance-sorts the
    /// gathered batches. Batch order is priority order, so the stable dedup
    /// and sort keep higher-priority candidates ahead on ties.
    fn refine(
        &self,
        request: &IdentifyRequest,
        tolerance_deg: f64,
        batches: Vec<Vec<Candidate>>,
    ) -> Vec<Candidate> {
        let mut merged: Vec<Candidate> = Vec::new();
        for batch in batches {
            for candidate in batch {
                if let Some(gps_m) = self.within_window(request, tolerance_deg, &candidate) {
                    merged.push(self.annotate_distance(request, candidate, gps_m));
                }
            }
        }
        self.metrics.record_candidates_merged(merged.len());

        let (mut unique, duplicates) = self.dedup(merged);
        self.metrics.record_duplicates_dropped(duplicates);

        unique.sort_by(|a, b| {
            a.distance_m()
                .unwrap_or(f64::INFINITY)
                .total_cmp(&b.distance_m().unwrap_or(f64::INFINITY))
        });
        unique
    }

    /// Tests a candidate against the radius and bearing window.
    ///
    /// Returns the GPS distance when the candidate passes. Candidates
    /// within [`MIN_BEARING_DISTANCE_M`] of the origin always pass; the
    /// window widens per provenance, see
    /// [`Provenance::tolerance_factor`].
    fn within_window(
        &self,
        request: &IdentifyRequest,
        tolerance_deg: f64,
        candidate: &Candidate,
    ) -> Option<f64> {
        let gps_m = great_circle_distance(request.origin, candidate.position());
        if gps_m > request.radius_m {
            return None;
        }
        if gps_m < MIN_BEARING_DISTANCE_M {
            return Some(gps_m);
        }

        let bearing = initial_bearing(request.origin, candidate.position());
        let window = tolerance_deg * candidate.provenance().tolerance_factor();
        if angular_difference(bearing, request.bearing_deg) <= window {
            Some(gps_m)
        } else {
            None
        }
    }

    fn annotate_distance(
        &self,
        request: &IdentifyRequest,
        candidate: Candidate,
        gps_m: f64,
    ) -> Candidate {
        let distance_m = match request.heuristic_distance_m {
            Some(heuristic_m) => {
                distance::bounded(heuristic_m, gps_m, self.config.gps_bound_factor)
            }
            None => gps_m,
        };
        candidate.with_distance(distance_m)
    }

    /// Drops candidates whose name is too similar to an earlier-kept one.
    /// Input arrives in priority order, so the first occurrence is the
    /// highest-priority rendition of the duplicate set.
    fn dedup(&self, candidates: Vec<Candidate>) -> (Vec<Candidate>, usize) {
        let mut kept: Vec<Candidate> = Vec::with_capacity(candidates.len());
        let mut keys: Vec<String> = Vec::with_capacity(candidates.len());
        let mut dropped = 0;

        for candidate in candidates {
            let key = candidate.similarity_key();
            let duplicate = keys
                .iter()
                .any(|existing| name_similarity(existing, &key) > self.config.similarity_threshold);
            if duplicate {
                debug!(name = candidate.name(), "dropping near-duplicate candidate");
                dropped += 1;
            } else {
                keys.push(key);
                kept.push(candidate);
            }
        }

        (kept, dropped)
    }
}

/// Source indices sorted by provenance priority, stable within a tier.
fn priority_order<S: CandidateSource>(sources: &[S]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..sources.len()).collect();
    order.sort_by_key(|&index| sources[index].provenance().priority());
    order
}
