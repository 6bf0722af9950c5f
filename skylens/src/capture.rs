//! Capture metadata - the immutable per-capture sensor snapshot.
//!
//! A [`CaptureMetadata`] value records everything the camera and location
//! subsystems knew at the moment a frame was captured: position, altitude,
//! compass heading, device tilt, optical zoom, field of view, GPS accuracy,
//! and frame geometry. It is created once per capture and never mutated;
//! later enrichment (for example a declination-corrected heading) produces a
//! new value via the `with_*` methods.
//!
//! Validation happens at construction so that every `CaptureMetadata` held
//! anywhere in the crate is known to carry finite, in-range sensor values.

use std::time::SystemTime;

use thiserror::Error;

use crate::geo::{normalize_bearing, GeoError, GeoPoint};

/// Pixel dimensions of a captured frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSize {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
}

impl FrameSize {
    /// Creates a frame size.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns true if either dimension is zero.
    ///
    /// Degenerate frames carry no usable geometry and are rejected at the
    /// capture and projection boundaries.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A point in frame-pixel space, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TapPoint {
    /// Horizontal pixel coordinate.
    pub x: f64,
    /// Vertical pixel coordinate.
    pub y: f64,
}

impl TapPoint {
    /// Creates a tap point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns true if either coordinate is NaN or infinite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Errors rejected when constructing or enriching capture metadata.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CaptureError {
    /// Invalid capture position.
    #[error("Invalid capture position: {0}")]
    Position(#[from] GeoError),

    /// A sensor value was NaN or infinite.
    #[error("Non-finite value for {0}")]
    NonFinite(&'static str),

    /// Field of view outside (0, 180] degrees.
    #[error("Invalid field of view {0} (must be in (0, 180] degrees)")]
    InvalidFov(f64),

    /// Zoom factor not a positive finite number.
    #[error("Invalid zoom factor {0} (must be > 0)")]
    InvalidZoom(f64),

    /// GPS accuracy must be a non-negative finite number of meters.
    #[error("Invalid position accuracy {0} (must be >= 0 meters)")]
    InvalidAccuracy(f64),

    /// Frame has a zero dimension.
    #[error("Degenerate frame size (zero width or height)")]
    DegenerateFrame,
}

/// Immutable snapshot of camera and location sensors at capture time.
///
/// Headings are true north; magnetic-declination correction is the capture
/// subsystem's responsibility and should happen before (or by enriching)
/// this snapshot. Altitude is meters above mean sea level, matching the
/// datum used for aerial candidate altitudes.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureMetadata {
    position: GeoPoint,
    altitude_m: f64,
    heading_deg: f64,
    pitch_deg: f64,
    roll_deg: f64,
    fov_deg: f64,
    zoom: f64,
    accuracy_m: f64,
    frame: FrameSize,
    captured_at: SystemTime,
}

impl CaptureMetadata {
    /// Creates a validated capture snapshot, timestamped now.
    ///
    /// # Arguments
    ///
    /// * `position` - Camera position (already range-validated)
    /// * `altitude_m` - Camera altitude, meters above sea level
    /// * `heading_deg` - Compass heading, true north (normalized to [0, 360))
    /// * `pitch_deg` - Device tilt from horizontal, positive looking up
    /// * `roll_deg` - Device roll from level
    /// * `fov_deg` - Horizontal field of view at the current zoom, (0, 180]
    /// * `zoom` - Optical zoom factor, > 0
    /// * `accuracy_m` - Reported GPS accuracy in meters, >= 0
    /// * `frame` - Captured frame dimensions, non-degenerate
    ///
    /// # Errors
    ///
    /// Returns a [`CaptureError`] if any sensor value is non-finite or out
    /// of its physical range.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        position: GeoPoint,
        altitude_m: f64,
        heading_deg: f64,
        pitch_deg: f64,
        roll_deg: f64,
        fov_deg: f64,
        zoom: f64,
        accuracy_m: f64,
        frame: FrameSize,
    ) -> Result<Self, CaptureError> {
        if !altitude_m.is_finite() {
            return Err(CaptureError::NonFinite("altitude_m"));
        }
        if !heading_deg.is_finite() {
            return Err(CaptureError::NonFinite("heading_deg"));
        }
        if !pitch_deg.is_finite() {
            return Err(CaptureError::NonFinite("pitch_deg"));
        }
        if !roll_deg.is_finite() {
            return Err(CaptureError::NonFinite("roll_deg"));
        }
        if !fov_deg.is_finite() || fov_deg <= 0.0 || fov_deg > 180.0 {
            return Err(CaptureError::InvalidFov(fov_deg));
        }
        if !zoom.is_finite() || zoom <= 0.0 {
            return Err(CaptureError::InvalidZoom(zoom));
        }
        if !accuracy_m.is_finite() || accuracy_m < 0.0 {
            return Err(CaptureError::InvalidAccuracy(accuracy_m));
        }
        if frame.is_degenerate() {
            return Err(CaptureError::DegenerateFrame);
        }

        Ok(Self {
            position,
            altitude_m,
            heading_deg: normalize_bearing(heading_deg),
            pitch_deg,
            roll_deg,
            fov_deg,
            zoom,
            accuracy_m,
            frame,
            captured_at: SystemTime::now(),
        })
    }

    /// Returns a copy with a corrected heading (e.g. after declination
    /// correction), normalized to [0, 360).
    pub fn with_heading(&self, heading_deg: f64) -> Result<Self, CaptureError> {
        if !heading_deg.is_finite() {
            return Err(CaptureError::NonFinite("heading_deg"));
        }
        Ok(Self {
            heading_deg: normalize_bearing(heading_deg),
            ..self.clone()
        })
    }

    /// Returns a copy with a refined GPS accuracy estimate.
    pub fn with_accuracy(&self, accuracy_m: f64) -> Result<Self, CaptureError> {
        if !accuracy_m.is_finite() || accuracy_m < 0.0 {
            return Err(CaptureError::InvalidAccuracy(accuracy_m));
        }
        Ok(Self {
            accuracy_m,
            ..self.clone()
        })
    }

    /// Returns a copy carrying an externally supplied capture timestamp.
    ///
    /// Used when replaying a previously captured scene, where "now" would
    /// misrepresent the capture moment.
    pub fn with_captured_at(&self, captured_at: SystemTime) -> Self {
        Self {
            captured_at,
            ..self.clone()
        }
    }

    /// Camera position.
    #[inline]
    pub fn position(&self) -> GeoPoint {
        self.position
    }

    /// Camera altitude in meters above sea level.
    #[inline]
    pub fn altitude_m(&self) -> f64 {
        self.altitude_m
    }

    /// Compass heading in [0, 360) degrees, true north.
    #[inline]
    pub fn heading_deg(&self) -> f64 {
        self.heading_deg
    }

    /// Device pitch from horizontal in degrees, positive looking up.
    #[inline]
    pub fn pitch_deg(&self) -> f64 {
        self.pitch_deg
    }

    /// Device roll from level in degrees.
    #[inline]
    pub fn roll_deg(&self) -> f64 {
        self.roll_deg
    }

    /// Horizontal field of view at the current zoom, in degrees.
    #[inline]
    pub fn fov_deg(&self) -> f64 {
        self.fov_deg
    }

    /// Optical zoom factor.
    #[inline]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Reported GPS accuracy in meters.
    #[inline]
    pub fn accuracy_m(&self) -> f64 {
        self.accuracy_m
    }

    /// Captured frame dimensions.
    #[inline]
    pub fn frame(&self) -> FrameSize {
        self.frame
    }

    /// When the frame was captured.
    #[inline]
    pub fn captured_at(&self) -> SystemTime {
        self.captured_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_position() -> GeoPoint {
        GeoPoint::new(37.7749, -122.4194).unwrap()
    }

    fn sample_metadata() -> CaptureMetadata {
        CaptureMetadata::new(
            sample_position(),
            16.0,
            90.0,
            2.0,
            0.0,
            68.0,
            1.0,
            5.0,
            FrameSize::new(4032, 3024),
        )
        .unwrap()
    }

    #[test]
    fn test_capture_metadata_valid_construction() {
        let metadata = sample_metadata();
        assert_eq!(metadata.heading_deg(), 90.0);
        assert_eq!(metadata.fov_deg(), 68.0);
        assert_eq!(metadata.zoom(), 1.0);
        assert_eq!(metadata.frame(), FrameSize::new(4032, 3024));
    }

    #[test]
    fn test_heading_normalized_at_construction() {
        let metadata = CaptureMetadata::new(
            sample_position(),
            0.0,
            -90.0,
            0.0,
            0.0,
            68.0,
            1.0,
            5.0,
            FrameSize::new(100, 100),
        )
        .unwrap();
        assert_eq!(metadata.heading_deg(), 270.0);
    }

    #[test]
    fn test_rejects_non_finite_sensor_values() {
        let result = CaptureMetadata::new(
            sample_position(),
            f64::NAN,
            90.0,
            0.0,
            0.0,
            68.0,
            1.0,
            5.0,
            FrameSize::new(100, 100),
        );
        assert_eq!(result, Err(CaptureError::NonFinite("altitude_m")));

        let result = CaptureMetadata::new(
            sample_position(),
            0.0,
            90.0,
            f64::INFINITY,
            0.0,
            68.0,
            1.0,
            5.0,
            FrameSize::new(100, 100),
        );
        assert_eq!(result, Err(CaptureError::NonFinite("pitch_deg")));
    }

    #[test]
    fn test_rejects_invalid_fov() {
        for fov in [0.0, -10.0, 180.1, f64::NAN] {
            let result = CaptureMetadata::new(
                sample_position(),
                0.0,
                90.0,
                0.0,
                0.0,
                fov,
                1.0,
                5.0,
                FrameSize::new(100, 100),
            );
            assert!(matches!(result, Err(CaptureError::InvalidFov(_))), "fov {}", fov);
        }
    }

    #[test]
    fn test_rejects_invalid_zoom() {
        for zoom in [0.0, -1.0, f64::NAN] {
            let result = CaptureMetadata::new(
                sample_position(),
                0.0,
                90.0,
                0.0,
                0.0,
                68.0,
                zoom,
                5.0,
                FrameSize::new(100, 100),
            );
            assert!(matches!(result, Err(CaptureError::InvalidZoom(_))), "zoom {}", zoom);
        }
    }

    #[test]
    fn test_rejects_degenerate_frame() {
        let result = CaptureMetadata::new(
            sample_position(),
            0.0,
            90.0,
            0.0,
            0.0,
            68.0,
            1.0,
            5.0,
            FrameSize::new(0, 3024),
        );
        assert_eq!(result, Err(CaptureError::DegenerateFrame));
    }

    #[test]
    fn test_with_heading_produces_new_value() {
        let metadata = sample_metadata();
        let corrected = metadata.with_heading(413.0).unwrap();

        assert_eq!(corrected.heading_deg(), 53.0);
        // Original unchanged
        assert_eq!(metadata.heading_deg(), 90.0);
        // Everything else carried over
        assert_eq!(corrected.fov_deg(), metadata.fov_deg());
        assert_eq!(corrected.captured_at(), metadata.captured_at());
    }

    #[test]
    fn test_with_heading_rejects_non_finite() {
        let metadata = sample_metadata();
        assert!(metadata.with_heading(f64::NAN).is_err());
    }

    #[test]
    fn test_with_accuracy_produces_new_value() {
        let metadata = sample_metadata();
        let refined = metadata.with_accuracy(2.5).unwrap();

        assert_eq!(refined.accuracy_m(), 2.5);
        assert_eq!(metadata.accuracy_m(), 5.0);
        assert!(refined.with_accuracy(-1.0).is_err());
    }

    #[test]
    fn test_frame_size_degenerate() {
        assert!(FrameSize::new(0, 100).is_degenerate());
        assert!(FrameSize::new(100, 0).is_degenerate());
        assert!(!FrameSize::new(1, 1).is_degenerate());
    }

    #[test]
    fn test_tap_point_finite() {
        assert!(TapPoint::new(10.0, 20.0).is_finite());
        assert!(!TapPoint::new(f64::NAN, 20.0).is_finite());
        assert!(!TapPoint::new(10.0, f64::NEG_INFINITY).is_finite());
    }
}
