//! Confidence scoring for target fixes.
//!
//! The score is a coarse multiplicative heuristic over capture conditions,
//! not a calibrated probability. It starts at full confidence and applies
//! one factor per condition band, capped at 1.0.

/// Targets beyond this distance take the strongest penalty.
pub const FAR_DISTANCE_M: f64 = 1_000.0;

/// Penalty factor for targets beyond [`FAR_DISTANCE_M`].
pub const FAR_DISTANCE_FACTOR: f64 = 0.7;

/// Mid-range distance threshold.
pub const MID_DISTANCE_M: f64 = 500.0;

/// Penalty factor for targets beyond [`MID_DISTANCE_M`].
pub const MID_DISTANCE_FACTOR: f64 = 0.85;

/// Near-range distance threshold; closer targets take no distance penalty.
pub const NEAR_DISTANCE_M: f64 = 100.0;

/// Penalty factor for targets beyond [`NEAR_DISTANCE_M`].
pub const NEAR_DISTANCE_FACTOR: f64 = 0.95;

/// Zoom above this level signals strong deliberate framing.
pub const STRONG_ZOOM: f64 = 3.0;

/// Boost factor for zoom above [`STRONG_ZOOM`].
pub const STRONG_ZOOM_FACTOR: f64 = 1.1;

/// Zoom above this level signals moderate deliberate framing.
pub const MODERATE_ZOOM: f64 = 2.0;

/// Boost factor for zoom above [`MODERATE_ZOOM`].
pub const MODERATE_ZOOM_FACTOR: f64 = 1.05;

/// Camera altitude above this suggests an elevated, harder shot.
pub const HIGH_ALTITUDE_M: f64 = 100.0;

/// Penalty factor for captures above [`HIGH_ALTITUDE_M`].
pub const HIGH_ALTITUDE_FACTOR: f64 = 0.9;

/// Field of view below this means the subject fills the frame.
pub const NARROW_FOV_DEG: f64 = 30.0;

/// Boost factor for fields of view below [`NARROW_FOV_DEG`].
pub const NARROW_FOV_FACTOR: f64 = 1.1;

/// Field of view above this means a wide, ambiguous shot.
pub const WIDE_FOV_DEG: f64 = 60.0;

/// Penalty factor for fields of view above [`WIDE_FOV_DEG`].
pub const WIDE_FOV_FACTOR: f64 = 0.9;

/// Scores a fix from the capture conditions, in (0.0, 1.0].
///
/// Distance penalizes in three bands, zoom and a narrow field of view boost
/// (the user framed something on purpose), altitude and a wide field of
/// view penalize. Boosts cannot push the score past 1.0.
pub fn score(distance_m: f64, zoom: f64, altitude_m: f64, fov_deg: f64) -> f64 {
    let mut score = 1.0;

    if distance_m > FAR_DISTANCE_M {
        score *= FAR_DISTANCE_FACTOR;
    } else if distance_m > MID_DISTANCE_M {
        score *= MID_DISTANCE_FACTOR;
    } else if distance_m > NEAR_DISTANCE_M {
        score *= NEAR_DISTANCE_FACTOR;
    }

    if zoom > STRONG_ZOOM {
        score *= STRONG_ZOOM_FACTOR;
    } else if zoom > MODERATE_ZOOM {
        score *= MODERATE_ZOOM_FACTOR;
    }

    if altitude_m > HIGH_ALTITUDE_M {
        score *= HIGH_ALTITUDE_FACTOR;
    }

    if fov_deg < NARROW_FOV_DEG {
        score *= NARROW_FOV_FACTOR;
    } else if fov_deg > WIDE_FOV_DEG {
        score *= WIDE_FOV_FACTOR;
    }

    score.min(1.0)
}
