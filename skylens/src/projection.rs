//! Tap-to-bearing projection.
//!
//! Maps a tap on the captured frame to an absolute compass bearing by
//! treating the horizontal field of view as spread linearly across the
//! frame width. A tap on the left edge looks `fov / 2` degrees left of the
//! camera heading, the right edge `fov / 2` degrees right, and the center
//! straight down the heading.

use thiserror::Error;

use crate::capture::{FrameSize, TapPoint};
use crate::geo::normalize_bearing;

/// Errors from projecting a tap into a bearing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectionError {
    /// Frame has a zero dimension, no geometry to project against.
    #[error("Cannot project against a degenerate frame (zero width or height)")]
    DegenerateFrame,

    /// Tap coordinates were NaN or infinite.
    #[error("Tap point has non-finite coordinates")]
    NonFiniteTap,
}

/// Projects an optional tap point to an absolute bearing in [0, 360).
///
/// With no tap the camera heading itself is the bearing (the user is
/// aiming the whole frame at the target). Taps outside the frame bounds
/// are clamped to the nearest edge rather than rejected, since a drag
/// gesture can legitimately end a few pixels out of frame.
///
/// `heading_deg` is the capture heading (true north) and `fov_deg` the
/// horizontal field of view at the capture's zoom level.
///
/// # Errors
///
/// Returns [`ProjectionError::DegenerateFrame`] if the frame has a zero
/// dimension and [`ProjectionError::NonFiniteTap`] for NaN or infinite
/// tap coordinates.
pub fn tap_to_bearing(
    tap: Option<TapPoint>,
    frame: FrameSize,
    heading_deg: f64,
    fov_deg: f64,
) -> Result<f64, ProjectionError> {
    let tap = match tap {
        Some(tap) => tap,
        None => return Ok(normalize_bearing(heading_deg)),
    };

    if frame.is_degenerate() {
        return Err(ProjectionError::DegenerateFrame);
    }
    if !tap.is_finite() {
        return Err(ProjectionError::NonFiniteTap);
    }

    // Signed offset from frame center as a fraction of the width,
    // clamped to the frame edges.
    let fraction = (tap.x / f64::from(frame.width) - 0.5).clamp(-0.5, 0.5);
    let offset_deg = fraction * fov_deg;

    Ok(normalize_bearing(heading_deg + offset_deg))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: FrameSize = FrameSize {
        width: 4000,
        height: 3000,
    };

    #[test]
    fn test_no_tap_uses_heading() {
        let bearing = tap_to_bearing(None, FRAME, 123.4, 68.0).unwrap();
        assert_eq!(bearing, 123.4);
    }

    #[test]
    fn test_no_tap_normalizes_heading() {
        let bearing = tap_to_bearing(None, FRAME, 370.0, 68.0).unwrap();
        assert_eq!(bearing, 10.0);
    }

    #[test]
    fn test_center_tap_matches_heading() {
        let tap = TapPoint::new(2000.0, 1500.0);
        let bearing = tap_to_bearing(Some(tap), FRAME, 90.0, 68.0).unwrap();
        assert!((bearing - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_left_edge_tap_offsets_half_fov_left() {
        let tap = TapPoint::new(0.0, 1500.0);
        let bearing = tap_to_bearing(Some(tap), FRAME, 90.0, 68.0).unwrap();
        assert!((bearing - 56.0).abs() < 1e-9);
    }

    #[test]
    fn test_right_edge_tap_offsets_half_fov_right() {
        let tap = TapPoint::new(4000.0, 1500.0);
        let bearing = tap_to_bearing(Some(tap), FRAME, 90.0, 68.0).unwrap();
        assert!((bearing - 124.0).abs() < 1e-9);
    }

    #[test]
    fn test_quarter_tap_offsets_quarter_fov() {
        // Tap at 25% of width sits at -fov/4 from the heading.
        let tap = TapPoint::new(1000.0, 1500.0);
        let bearing = tap_to_bearing(Some(tap), FRAME, 180.0, 60.0).unwrap();
        assert!((bearing - 165.0).abs() < 1e-9);
    }

    #[test]
    fn test_result_wraps_past_north() {
        let tap = TapPoint::new(0.0, 0.0);
        let bearing = tap_to_bearing(Some(tap), FRAME, 10.0, 68.0).unwrap();
        assert!((bearing - 336.0).abs() < 1e-9);
    }

    #[test]
    fn test_out_of_frame_tap_clamps_to_edge() {
        let inside = tap_to_bearing(Some(TapPoint::new(4000.0, 0.0)), FRAME, 90.0, 68.0).unwrap();
        let outside = tap_to_bearing(Some(TapPoint::new(9999.0, 0.0)), FRAME, 90.0, 68.0).unwrap();
        assert_eq!(inside, outside);

        let left = tap_to_bearing(Some(TapPoint::new(-500.0, 0.0)), FRAME, 90.0, 68.0).unwrap();
        assert!((left - 56.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_frame_rejected() {
        let tap = TapPoint::new(10.0, 10.0);
        let result = tap_to_bearing(Some(tap), FrameSize::new(0, 100), 90.0, 68.0);
        assert_eq!(result, Err(ProjectionError::DegenerateFrame));
    }

    #[test]
    fn test_non_finite_tap_rejected() {
        let tap = TapPoint::new(f64::NAN, 10.0);
        let result = tap_to_bearing(Some(tap), FRAME, 90.0, 68.0);
        assert_eq!(result, Err(ProjectionError::NonFiniteTap));
    }
}
