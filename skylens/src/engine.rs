//! Top-level targeting engine.
//!
//! [`TargetingEngine`] is the one entry point surrounding subsystems talk
//! to: it owns the distance model and the fusion engine, and strings the
//! capture-to-candidates flow together. Callers construct it explicitly
//! from an [`EngineConfig`] and own its lifetime; there is no process-wide
//! instance.

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::candidate::Candidate;
use crate::capture::{CaptureMetadata, TapPoint};
use crate::config::EngineConfig;
use crate::distance::{DistanceError, DistanceModel};
use crate::fix::{self, FixError, TargetFix};
use crate::fusion::{AerialContext, FusionConfig, FusionEngine, FusionError, IdentifyRequest};
use crate::metrics::MetricsSnapshot;
use crate::projection::{self, ProjectionError};
use crate::sources::CandidateSource;

/// Errors from the end-to-end sighting flow.
#[derive(Debug, Error)]
pub enum SightError {
    /// Tap could not be projected to a bearing
    #[error(transparent)]
    Projection(#[from] ProjectionError),

    /// Distance could not be estimated from the capture
    #[error(transparent)]
    Distance(#[from] DistanceError),

    /// Target fix computation failed
    #[error(transparent)]
    Fix(#[from] FixError),

    /// Candidate fusion failed
    #[error(transparent)]
    Fusion(#[from] FusionError),
}

/// Caller knobs for one sighting.
#[derive(Debug, Clone, Copy, Default)]
pub struct SightOptions {
    /// Frame point the user tapped; None means center of frame.
    pub tap: Option<TapPoint>,
    /// Fraction of frame height the subject fills, in percent.
    pub coverage_pct: Option<f64>,
    /// Search radius override in meters.
    pub radius_m: Option<f64>,
    /// Result cap override.
    pub max_results: Option<usize>,
}

/// One resolved sighting: where the camera was aimed and what is there.
#[derive(Debug, Clone)]
pub struct Sighting {
    /// The projected aim point.
    pub fix: TargetFix,
    /// Ranked candidates along the aim bearing.
    pub candidates: Vec<Candidate>,
}

/// Facade over projection, distance estimation, fix computation, and
/// candidate fusion.
#[derive(Debug, Clone)]
pub struct TargetingEngine {
    distance: DistanceModel,
    fusion: FusionEngine,
}

impl TargetingEngine {
    /// Creates an engine from configuration.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            distance: config.distance,
            fusion: FusionEngine::new(config.fusion),
        }
    }

    /// Returns the active fusion configuration.
    pub fn fusion_config(&self) -> &FusionConfig {
        self.fusion.config()
    }

    /// Returns a point-in-time copy of the engine counters.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.fusion.metrics()
    }

    /// Projects a tap point to an absolute compass bearing.
    ///
    /// `None` means the user did not tap; the camera heading is returned
    /// unmodified.
    pub fn target_bearing(
        &self,
        tap: Option<TapPoint>,
        metadata: &CaptureMetadata,
    ) -> Result<f64, ProjectionError> {
        projection::tap_to_bearing(
            tap,
            metadata.frame(),
            metadata.heading_deg(),
            metadata.fov_deg(),
        )
    }

    /// Estimates ground distance from optical cues, see
    /// [`DistanceModel::estimate`].
    pub fn estimate_distance(
        &self,
        zoom: f64,
        fov_deg: f64,
        coverage_pct: Option<f64>,
    ) -> Result<f64, DistanceError> {
        self.distance.estimate(zoom, fov_deg, coverage_pct)
    }

    /// Computes the aim point for a capture, bearing, and distance.
    pub fn target_fix(
        &self,
        metadata: &CaptureMetadata,
        bearing_deg: f64,
        distance_m: f64,
    ) -> Result<TargetFix, FixError> {
        fix::compute_target_fix(metadata, bearing_deg, distance_m)
    }

    /// Identifies stationary targets, see
    /// [`FusionEngine::identify_stationary`].
    pub async fn identify_stationary<S: CandidateSource>(
        &self,
        request: &IdentifyRequest,
        sources: &[S],
        cancel: &CancellationToken,
    ) -> Result<Vec<Candidate>, FusionError> {
        self.fusion.identify_stationary(request, sources, cancel).await
    }

    /// Identifies aerial targets, see [`FusionEngine::identify_mobile`].
    pub async fn identify_mobile<S: CandidateSource>(
        &self,
        request: &IdentifyRequest,
        aerial: &AerialContext,
        sources: &[S],
        cancel: &CancellationToken,
    ) -> Result<Vec<Candidate>, FusionError> {
        self.fusion
            .identify_mobile(request, aerial, sources, cancel)
            .await
    }

    /// Full stationary sighting flow for one capture.
    ///
    /// Projects the tap to a bearing, estimates distance from the optical
    /// cues, computes the aim point, and fuses candidates along the
    /// bearing. The heuristic distance rides along into fusion, where each
    /// candidate bounds it against its own GPS distance.
    pub async fn sight_stationary<S: CandidateSource>(
        &self,
        metadata: &CaptureMetadata,
        options: &SightOptions,
        sources: &[S],
        cancel: &CancellationToken,
    ) -> Result<Sighting, SightError> {
        let bearing_deg = self.target_bearing(options.tap, metadata)?;
        let distance_m =
            self.estimate_distance(metadata.zoom(), metadata.fov_deg(), options.coverage_pct)?;
        debug!(
            bearing_deg,
            distance_m, "projected sighting from capture metadata"
        );

        let mut request = IdentifyRequest::new(
            metadata.position(),
            bearing_deg,
            options
                .radius_m
                .unwrap_or(self.fusion.config().default_radius_m),
        );
        request.max_results = options.max_results;
        request.heuristic_distance_m = Some(distance_m);

        let candidates = self
            .fusion
            .identify_stationary(&request, sources, cancel)
            .await?;
        let fix = fix::compute_target_fix(metadata, bearing_deg, distance_m)?;

        Ok(Sighting { fix, candidates })
    }

    /// Full aerial sighting flow for one capture.
    ///
    /// Like [`sight_stationary`](Self::sight_stationary), but the camera
    /// attitude drives an elevation filter instead of line-of-sight, and
    /// candidates rank by plain GPS distance; the optical distance
    /// heuristic is calibrated for ground subjects.
    pub async fn sight_mobile<S: CandidateSource>(
        &self,
        metadata: &CaptureMetadata,
        options: &SightOptions,
        auto_detect: bool,
        sources: &[S],
        cancel: &CancellationToken,
    ) -> Result<Sighting, SightError> {
        let bearing_deg = self.target_bearing(options.tap, metadata)?;

        let mut request = IdentifyRequest::new(
            metadata.position(),
            bearing_deg,
            options
                .radius_m
                .unwrap_or(self.fusion.config().default_radius_m),
        );
        request.max_results = options.max_results;

        let mut aerial = AerialContext::new(
            metadata.pitch_deg(),
            metadata.altitude_m(),
            metadata.fov_deg(),
        );
        aerial.auto_detect = auto_detect;

        let candidates = self
            .fusion
            .identify_mobile(&request, &aerial, sources, cancel)
            .await?;

        // The fix distance comes from the nearest match when there is one;
        // the optical heuristic has nothing useful to say about the sky.
        let fix_distance_m = candidates
            .first()
            .and_then(Candidate::distance_m)
            .unwrap_or(request.radius_m);
        let fix = fix::compute_target_fix(metadata, bearing_deg, fix_distance_m)?;

        Ok(Sighting { fix, candidates })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::FrameSize;
    use crate::geo::GeoPoint;

    fn engine() -> TargetingEngine {
        TargetingEngine::new(EngineConfig::default())
    }

    fn metadata() -> CaptureMetadata {
        CaptureMetadata::new(
            GeoPoint::new(37.7749, -122.4194).unwrap(),
            10.0,
            90.0,
            0.0,
            0.0,
            68.0,
            1.0,
            5.0,
            FrameSize::new(1920, 1080),
        )
        .unwrap()
    }

    #[test]
    fn test_target_bearing_without_tap_is_heading() {
        let bearing = engine().target_bearing(None, &metadata()).unwrap();
        assert_eq!(bearing, 90.0);
    }

    #[test]
    fn test_target_bearing_with_offset_tap() {
        // Quarter frame right of center: 68 / 4 = 17 degrees clockwise.
        let tap = TapPoint::new(1440.0, 540.0);
        let bearing = engine().target_bearing(Some(tap), &metadata()).unwrap();
        assert!((bearing - 107.0).abs() < 1e-9, "bearing was {bearing}");
    }

    #[test]
    fn test_estimate_distance_documented_example() {
        // 1x zoom, 68 degree fov, 50% coverage: the documented reference
        // capture lands near 122 m.
        let distance = engine().estimate_distance(1.0, 68.0, Some(50.0)).unwrap();
        assert!(
            (100.0..150.0).contains(&distance),
            "distance was {distance}"
        );
    }

    #[test]
    fn test_target_fix_travels_the_bearing() {
        let fix = engine().target_fix(&metadata(), 90.0, 250.0).unwrap();
        assert_eq!(fix.distance_m, 250.0);
        assert!(fix.position.longitude() > metadata().position().longitude());
    }

    #[test]
    fn test_engine_owns_independent_metrics() {
        let first = engine();
        let second = engine();
        assert_eq!(first.metrics().identifications, 0);
        assert_eq!(second.metrics().identifications, 0);
    }
}
