//! Heuristic distance estimation from capture optics.
//!
//! Without a rangefinder the only distance signal available at capture time
//! is how the user framed the target: zoom factor, field of view, and how
//! much of the frame the target fills. [`DistanceModel`] turns those into a
//! rough range estimate.
//!
//! The coefficients are a calibrated policy, not physics. They were tuned
//! against hand-labelled captures of mid-size urban landmarks; callers with
//! a different target population can construct their own table.
//!
//! # Zoom regimes
//!
//! The zoom multiplier is piecewise: casual framing (below 2x) scales
//! linearly, deliberate zooming (2x-4x) implies the target is farther than
//! the optics alone suggest, and heavy zoom (above 4x) more so. The table is
//! monotonic non-decreasing in zoom.

use thiserror::Error;

// =============================================================================
// Calibrated Defaults
// =============================================================================

/// Estimated distance for an unzoomed capture at the reference FOV with the
/// target filling half the frame (meters).
pub const DEFAULT_BASE_DISTANCE_M: f64 = 130.0;

/// Field of view the base distance was calibrated at (degrees).
pub const DEFAULT_REFERENCE_FOV_DEG: f64 = 60.0;

/// Floor for the FOV multiplier. Very wide lenses stop pulling the
/// estimate closer past this point.
pub const DEFAULT_MIN_FOV_MULTIPLIER: f64 = 0.7;

/// Frame coverage the base distance was calibrated at (percent of frame
/// height).
pub const DEFAULT_REFERENCE_COVERAGE_PCT: f64 = 50.0;

/// Floor for reported coverage. Coverage readings below this carry more
/// noise than signal and are clamped up to it.
pub const DEFAULT_MIN_COVERAGE_PCT: f64 = 5.0;

/// Zoom regime boundary between casual framing and deliberate zooming.
pub const DEFAULT_ZOOM_DELIBERATE: f64 = 2.0;

/// Zoom regime boundary between deliberate and heavy zooming.
pub const DEFAULT_ZOOM_HEAVY: f64 = 4.0;

/// Extra range implied by a deliberate (2x-4x) zoom.
pub const DEFAULT_DELIBERATE_ZOOM_FACTOR: f64 = 1.25;

/// Extra range implied by a heavy (above 4x) zoom.
pub const DEFAULT_HEAVY_ZOOM_FACTOR: f64 = 1.6;

/// Errors rejected by the distance estimator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DistanceError {
    /// An input was NaN or infinite.
    #[error("Non-finite value for {0}")]
    NonFinite(&'static str),

    /// Zoom factor must be a positive finite number.
    #[error("Invalid zoom factor {0} (must be > 0)")]
    InvalidZoom(f64),

    /// Field of view must be a positive finite number of degrees.
    #[error("Invalid field of view {0} (must be > 0 degrees)")]
    InvalidFov(f64),

    /// Coverage must be in (0, 100] percent of frame height.
    #[error("Invalid frame coverage {0} (must be in (0, 100] percent)")]
    InvalidCoverage(f64),
}

/// The distance estimation policy table.
///
/// `Default` gives the calibrated values; every field is plain data so a
/// caller can carry its own calibration.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceModel {
    /// Distance for an unzoomed capture at the reference FOV and coverage.
    pub base_distance_m: f64,
    /// Field of view the base distance was calibrated at.
    pub reference_fov_deg: f64,
    /// Floor applied to the FOV multiplier.
    pub min_fov_multiplier: f64,
    /// Frame coverage the base distance was calibrated at.
    pub reference_coverage_pct: f64,
    /// Floor applied to reported coverage before use.
    pub min_coverage_pct: f64,
    /// Zoom above which framing counts as deliberate.
    pub zoom_deliberate: f64,
    /// Zoom above which framing counts as heavy.
    pub zoom_heavy: f64,
    /// Extra range implied by a deliberate zoom.
    pub deliberate_zoom_factor: f64,
    /// Extra range implied by a heavy zoom.
    pub heavy_zoom_factor: f64,
}

impl Default for DistanceModel {
    fn default() -> Self {
        Self {
            base_distance_m: DEFAULT_BASE_DISTANCE_M,
            reference_fov_deg: DEFAULT_REFERENCE_FOV_DEG,
            min_fov_multiplier: DEFAULT_MIN_FOV_MULTIPLIER,
            reference_coverage_pct: DEFAULT_REFERENCE_COVERAGE_PCT,
            min_coverage_pct: DEFAULT_MIN_COVERAGE_PCT,
            zoom_deliberate: DEFAULT_ZOOM_DELIBERATE,
            zoom_heavy: DEFAULT_ZOOM_HEAVY,
            deliberate_zoom_factor: DEFAULT_DELIBERATE_ZOOM_FACTOR,
            heavy_zoom_factor: DEFAULT_HEAVY_ZOOM_FACTOR,
        }
    }
}

impl DistanceModel {
    /// Estimates the distance to the framed target in meters.
    ///
    /// The estimate is `base x zoom-multiplier x fov-multiplier x
    /// coverage-multiplier`:
    ///
    /// - zoom multiplier: the regime table above;
    /// - FOV multiplier: `sqrt(reference_fov / fov)`, floored at
    ///   [`DistanceModel::min_fov_multiplier`] (narrower FOV means the user
    ///   zoomed in on something farther away);
    /// - coverage multiplier: `reference_coverage / coverage` (a target
    ///   filling less of the frame is farther), 1.0 when coverage is
    ///   unknown.
    ///
    /// With the default table an unzoomed capture at 68 degrees FOV and 50%
    /// coverage estimates roughly 122 m.
    ///
    /// # Errors
    ///
    /// Rejects non-positive or non-finite zoom and FOV, and coverage
    /// outside (0, 100].
    pub fn estimate(
        &self,
        zoom: f64,
        fov_deg: f64,
        coverage_pct: Option<f64>,
    ) -> Result<f64, DistanceError> {
        if !zoom.is_finite() || zoom <= 0.0 {
            return Err(DistanceError::InvalidZoom(zoom));
        }
        if !fov_deg.is_finite() || fov_deg <= 0.0 {
            return Err(DistanceError::InvalidFov(fov_deg));
        }
        if let Some(coverage) = coverage_pct {
            if !coverage.is_finite() {
                return Err(DistanceError::NonFinite("coverage_pct"));
            }
            if coverage <= 0.0 || coverage > 100.0 {
                return Err(DistanceError::InvalidCoverage(coverage));
            }
        }

        let zoom_multiplier = if zoom < self.zoom_deliberate {
            zoom
        } else if zoom <= self.zoom_heavy {
            zoom * self.deliberate_zoom_factor
        } else {
            zoom * self.heavy_zoom_factor
        };

        let fov_multiplier = (self.reference_fov_deg / fov_deg)
            .sqrt()
            .max(self.min_fov_multiplier);

        let coverage_multiplier = match coverage_pct {
            Some(coverage) => {
                self.reference_coverage_pct / coverage.max(self.min_coverage_pct)
            }
            None => 1.0,
        };

        Ok(self.base_distance_m * zoom_multiplier * fov_multiplier * coverage_multiplier)
    }
}

/// Picks between a heuristic estimate and the GPS-derived distance.
///
/// The heuristic wins while it stays plausible, meaning positive and at most
/// `bound_factor` times the GPS distance; beyond that the optics are judged
/// to have been misread and the GPS distance is used instead.
pub fn bounded(heuristic_m: f64, gps_m: f64, bound_factor: f64) -> f64 {
    if heuristic_m > 0.0 && heuristic_m <= bound_factor * gps_m {
        heuristic_m
    } else {
        gps_m
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documented_example() {
        // Unzoomed, 68 degree FOV, target filling half the frame.
        let model = DistanceModel::default();
        let estimate = model.estimate(1.0, 68.0, Some(50.0)).unwrap();

        let expected = 130.0 * (60.0_f64 / 68.0).sqrt();
        assert!((estimate - expected).abs() < 1e-9);
        assert!((estimate - 122.1137).abs() < 1e-3);
        assert!(estimate > 100.0 && estimate < 150.0);
    }

    #[test]
    fn test_missing_coverage_uses_unit_multiplier() {
        let model = DistanceModel::default();
        let with = model.estimate(1.0, 60.0, Some(50.0)).unwrap();
        let without = model.estimate(1.0, 60.0, None).unwrap();
        assert!((with - without).abs() < 1e-9);
        assert!((without - 130.0).abs() < 1e-9);
    }

    #[test]
    fn test_smaller_coverage_means_farther() {
        let model = DistanceModel::default();
        let half = model.estimate(1.0, 60.0, Some(50.0)).unwrap();
        let tenth = model.estimate(1.0, 60.0, Some(10.0)).unwrap();
        assert!(tenth > half);
        assert!((tenth - 650.0).abs() < 1e-9);
    }

    #[test]
    fn test_tiny_coverage_clamped_to_floor() {
        let model = DistanceModel::default();
        let at_floor = model.estimate(1.0, 60.0, Some(5.0)).unwrap();
        let below_floor = model.estimate(1.0, 60.0, Some(1.0)).unwrap();
        assert!((at_floor - below_floor).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_regimes_monotonic() {
        let model = DistanceModel::default();
        let mut previous = 0.0;
        for zoom in [0.5, 1.0, 1.9, 2.0, 3.0, 4.0, 4.1, 8.0] {
            let estimate = model.estimate(zoom, 60.0, None).unwrap();
            assert!(
                estimate >= previous,
                "zoom {} estimate {} dropped below {}",
                zoom,
                estimate,
                previous
            );
            previous = estimate;
        }
    }

    #[test]
    fn test_deliberate_zoom_multiplier() {
        let model = DistanceModel::default();
        // 3x sits in the deliberate regime: 130 * 3 * 1.25.
        let estimate = model.estimate(3.0, 60.0, None).unwrap();
        assert!((estimate - 487.5).abs() < 1e-9);
    }

    #[test]
    fn test_heavy_zoom_multiplier() {
        let model = DistanceModel::default();
        // 5x sits in the heavy regime: 130 * 5 * 1.6.
        let estimate = model.estimate(5.0, 60.0, None).unwrap();
        assert!((estimate - 1040.0).abs() < 1e-9);
    }

    #[test]
    fn test_custom_zoom_table() {
        let model = DistanceModel {
            zoom_deliberate: 1.5,
            deliberate_zoom_factor: 2.0,
            ..DistanceModel::default()
        };
        // 1.6x now counts as deliberate: 130 * 1.6 * 2.0.
        let estimate = model.estimate(1.6, 60.0, None).unwrap();
        assert!((estimate - 416.0).abs() < 1e-9);
    }

    #[test]
    fn test_wide_fov_multiplier_floored() {
        let model = DistanceModel::default();
        // sqrt(60/150) ~ 0.632, below the 0.7 floor.
        let estimate = model.estimate(1.0, 150.0, None).unwrap();
        assert!((estimate - 130.0 * 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_invalid_inputs() {
        let model = DistanceModel::default();
        assert_eq!(
            model.estimate(0.0, 60.0, None),
            Err(DistanceError::InvalidZoom(0.0))
        );
        assert_eq!(
            model.estimate(1.0, -5.0, None),
            Err(DistanceError::InvalidFov(-5.0))
        );
        assert!(matches!(
            model.estimate(f64::NAN, 60.0, None),
            Err(DistanceError::InvalidZoom(_))
        ));
        assert_eq!(
            model.estimate(1.0, 60.0, Some(0.0)),
            Err(DistanceError::InvalidCoverage(0.0))
        );
        assert_eq!(
            model.estimate(1.0, 60.0, Some(120.0)),
            Err(DistanceError::InvalidCoverage(120.0))
        );
        assert_eq!(
            model.estimate(1.0, 60.0, Some(f64::NAN)),
            Err(DistanceError::NonFinite("coverage_pct"))
        );
    }

    #[test]
    fn test_bounded_prefers_plausible_heuristic() {
        assert_eq!(bounded(150.0, 100.0, 2.0), 150.0);
        assert_eq!(bounded(200.0, 100.0, 2.0), 200.0); // exactly at the bound
    }

    #[test]
    fn test_bounded_falls_back_to_gps() {
        assert_eq!(bounded(250.0, 100.0, 2.0), 100.0);
        assert_eq!(bounded(0.0, 100.0, 2.0), 100.0);
        assert_eq!(bounded(-5.0, 100.0, 2.0), 100.0);
    }
}
