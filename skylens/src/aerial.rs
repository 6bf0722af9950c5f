//! Elevation-angle filter for aerial targets.
//!
//! When the camera pitches well above the horizon the user is pointing at
//! something in the sky, and a reported aircraft only makes sense as the
//! target if it actually sits near that line of sight vertically. This
//! filter compares the camera pitch against the elevation angle to each
//! mobile candidate and drops the ones outside a fixed tolerance.

use crate::candidate::{Candidate, CandidateKind};
use crate::geo::{great_circle_distance, GeoPoint};

/// Below this absolute pitch the camera is treated as level and the filter
/// does not run; ground-level targets routinely sit a few degrees off the
/// horizon.
pub const MIN_PITCH_DEG: f64 = 5.0;

/// Maximum allowed gap between camera pitch and a candidate's elevation
/// angle.
pub const ELEVATION_TOLERANCE_DEG: f64 = 15.0;

/// Elevation angle from the camera to a target, in degrees.
///
/// Positive when the target is above the camera. A zero ground distance
/// yields +/-90 degrees rather than dividing by zero.
pub fn elevation_angle_deg(
    camera_altitude_m: f64,
    target_altitude_m: f64,
    ground_distance_m: f64,
) -> f64 {
    (target_altitude_m - camera_altitude_m)
        .atan2(ground_distance_m)
        .to_degrees()
}

/// Drops mobile candidates whose elevation angle disagrees with the camera
/// pitch by more than [`ELEVATION_TOLERANCE_DEG`].
///
/// Runs only when `|pitch_deg|` exceeds [`MIN_PITCH_DEG`]; otherwise the
/// input passes through unchanged. Stationary candidates are never dropped
/// here.
///
/// Returns the kept candidates (original order) and the number dropped.
pub fn filter_by_elevation(
    pitch_deg: f64,
    camera_altitude_m: f64,
    origin: GeoPoint,
    candidates: Vec<Candidate>,
) -> (Vec<Candidate>, usize) {
    if pitch_deg.abs() <= MIN_PITCH_DEG {
        return (candidates, 0);
    }

    let before = candidates.len();
    let kept: Vec<Candidate> = candidates
        .into_iter()
        .filter(|candidate| match candidate.kind() {
            CandidateKind::Stationary { .. } => true,
            CandidateKind::Mobile { altitude_m, .. } => {
                let ground_distance = great_circle_distance(origin, candidate.position());
                let elevation =
                    elevation_angle_deg(camera_altitude_m, *altitude_m, ground_distance);
                (pitch_deg - elevation).abs() <= ELEVATION_TOLERANCE_DEG
            }
        })
        .collect();

    let dropped = before - kept.len();
    (kept, dropped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::{LandmarkCategory, Provenance};
    use crate::geo::destination;

    fn origin() -> GeoPoint {
        GeoPoint::new(37.7749, -122.4194).unwrap()
    }

    fn aircraft_at(name: &str, distance_m: f64, altitude_m: f64) -> Candidate {
        Candidate::mobile(
            name,
            name,
            destination(origin(), 45.0, distance_m),
            Provenance::Registry,
            altitude_m,
            None,
            None,
        )
    }

    #[test]
    fn test_elevation_angle_above_and_below() {
        assert!((elevation_angle_deg(0.0, 1000.0, 1000.0) - 45.0).abs() < 1e-9);
        assert!((elevation_angle_deg(1000.0, 0.0, 1000.0) + 45.0).abs() < 1e-9);
        assert!(elevation_angle_deg(0.0, 0.0, 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_ground_distance_is_straight_up() {
        assert!((elevation_angle_deg(0.0, 500.0, 0.0) - 90.0).abs() < 1e-9);
        assert!((elevation_angle_deg(500.0, 0.0, 0.0) + 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_candidate_near_line_of_sight_kept() {
        // atan(625 / 1000) = 32.0 degrees; camera pitch 30 leaves a 2 degree
        // gap, inside tolerance.
        let aircraft = aircraft_at("icao:1", 1000.0, 625.0);

        let (kept, dropped) = filter_by_elevation(30.0, 0.0, origin(), vec![aircraft]);

        assert_eq!(dropped, 0);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_candidate_far_from_line_of_sight_dropped() {
        // atan(87.5 / 1000) = 5.0 degrees; camera pitch 30 leaves a 25
        // degree gap.
        let aircraft = aircraft_at("icao:1", 1000.0, 87.5);

        let (kept, dropped) = filter_by_elevation(30.0, 0.0, origin(), vec![aircraft]);

        assert_eq!(dropped, 1);
        assert!(kept.is_empty());
    }

    #[test]
    fn test_level_camera_skips_filter() {
        // Same geometry that fails at pitch 30 passes untouched when the
        // camera is near level.
        let aircraft = aircraft_at("icao:1", 1000.0, 87.5);

        let (kept, dropped) = filter_by_elevation(4.0, 0.0, origin(), vec![aircraft]);

        assert_eq!(dropped, 0);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_stationary_candidates_never_dropped() {
        let landmark = Candidate::stationary(
            "place:1",
            "Coit Tower",
            destination(origin(), 45.0, 1000.0),
            Provenance::Registry,
            Some(64.0),
            Some(1933),
            LandmarkCategory::Tower,
        );

        let (kept, dropped) = filter_by_elevation(30.0, 0.0, origin(), vec![landmark]);

        assert_eq!(dropped, 0);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_camera_altitude_shifts_elevation() {
        // From a 625 m rooftop the same aircraft sits on the horizon, 30
        // degrees away from the pitch.
        let aircraft = aircraft_at("icao:1", 1000.0, 625.0);

        let (kept, dropped) = filter_by_elevation(30.0, 625.0, origin(), vec![aircraft]);

        assert_eq!(dropped, 1);
        assert!(kept.is_empty());
    }

    #[test]
    fn test_downward_pitch_filters_symmetrically() {
        // Looking down 30 degrees from altitude at an aircraft below.
        let below = aircraft_at("icao:1", 1000.0, 100.0);
        let elevation = elevation_angle_deg(700.0, 100.0, 1000.0);
        assert!(elevation < -MIN_PITCH_DEG);

        let (kept, dropped) = filter_by_elevation(-30.0, 700.0, origin(), vec![below]);

        assert_eq!(dropped, 0);
        assert_eq!(kept.len(), 1);
    }
}
