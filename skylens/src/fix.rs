//! Target fix computation.
//!
//! A fix is the geodetic answer to "where was the user aiming": the point
//! reached by travelling the estimated distance along the tap bearing from
//! the camera, plus a confidence score for the capture conditions.

use std::fmt;

use thiserror::Error;

use crate::capture::CaptureMetadata;
use crate::confidence;
use crate::geo::{destination, normalize_bearing, GeoPoint};

/// Errors computing a target fix.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FixError {
    /// Bearing was not a finite number
    #[error("bearing must be finite, got {0}")]
    NonFiniteBearing(f64),

    /// Distance was not finite and positive
    #[error("distance must be positive and finite, got {0} m")]
    InvalidDistance(f64),
}

/// A resolved aim point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetFix {
    /// Estimated target position.
    pub position: GeoPoint,
    /// Bearing from the camera to the target, normalized to [0, 360).
    pub bearing_deg: f64,
    /// Estimated camera-to-target distance in meters.
    pub distance_m: f64,
    /// Heuristic confidence in (0.0, 1.0].
    pub confidence: f64,
}

impl fmt::Display for TargetFix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.6}, {:.6}) at {:.0} m, bearing {:.1}, confidence {:.2}",
            self.position.latitude(),
            self.position.longitude(),
            self.distance_m,
            self.bearing_deg,
            self.confidence
        )
    }
}

/// Projects the aim point from a capture.
///
/// The bearing is normalized before use; the distance must be positive.
/// Confidence is scored from the capture's zoom, altitude, and field of
/// view together with the distance, see [`confidence::score`].
pub fn compute_target_fix(
    metadata: &CaptureMetadata,
    bearing_deg: f64,
    distance_m: f64,
) -> Result<TargetFix, FixError> {
    if !bearing_deg.is_finite() {
        return Err(FixError::NonFiniteBearing(bearing_deg));
    }
    if !distance_m.is_finite() || distance_m <= 0.0 {
        return Err(FixError::InvalidDistance(distance_m));
    }

    let bearing_deg = normalize_bearing(bearing_deg);
    let position = destination(metadata.position(), bearing_deg, distance_m);
    let confidence = confidence::score(
        distance_m,
        metadata.zoom(),
        metadata.altitude_m(),
        metadata.fov_deg(),
    );

    Ok(TargetFix {
        position,
        bearing_deg,
        distance_m,
        confidence,
    })
}
