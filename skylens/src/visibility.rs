//! Line-of-sight filter for stationary candidates.
//!
//! A tall landmark close to the camera hides a shorter one behind it on
//! nearly the same bearing. This filter suppresses such hidden candidates
//! using a look-angle comparison: the angle subtended by a blocker's top
//! edge must reach at least as high as the farther candidate's.
//!
//! The model is a documented approximation: obstacles are points with a
//! height, terrain is flat, and no 3D visibility is computed. It exists to
//! keep obviously-hidden results out of the ranked list, not to be a
//! renderer.

use crate::candidate::Candidate;
use crate::geo::{angular_difference, initial_bearing, GeoPoint};

/// Two candidates within this bearing gap sit on "the same line" from the
/// camera for occlusion purposes.
pub const OCCLUSION_BEARING_WINDOW_DEG: f64 = 2.0;

/// Nominal height assumed for a candidate with no recorded height when it
/// defends against occlusion. A blocker with no recorded height never
/// occludes; the asymmetry means missing data can only keep candidates,
/// never hide them.
pub const DEFAULT_DEFENDED_HEIGHT_M: f64 = 10.0;

/// Suppresses stationary candidates hidden behind closer, taller ones.
///
/// `candidates` must be annotated with distances and sorted ascending by
/// distance; a candidate is only ever occluded by an already-kept,
/// strictly-closer one. Mobile candidates and candidates without a distance
/// pass through untouched and never act as blockers.
///
/// Returns the kept candidates (original order) and the number dropped.
pub fn filter_line_of_sight(
    origin: GeoPoint,
    candidates: Vec<Candidate>,
) -> (Vec<Candidate>, usize) {
    // Bearing, look-angle, and distance of each kept candidate that can
    // block; None for kept candidates that cannot (mobile, no height, no
    // distance).
    let mut blockers: Vec<Option<(f64, f64, f64)>> = Vec::with_capacity(candidates.len());
    let mut kept: Vec<Candidate> = Vec::with_capacity(candidates.len());
    let mut dropped = 0;

    for candidate in candidates {
        if candidate.is_mobile() {
            blockers.push(None);
            kept.push(candidate);
            continue;
        }

        let distance = match candidate.distance_m() {
            Some(distance) => distance,
            None => {
                blockers.push(None);
                kept.push(candidate);
                continue;
            }
        };

        let bearing = initial_bearing(origin, candidate.position());
        let defended_height = candidate.height_m().unwrap_or(DEFAULT_DEFENDED_HEIGHT_M);
        let defended_look_angle = defended_height.atan2(distance).to_degrees();

        let occluded = blockers.iter().flatten().any(|&(b_bearing, b_look, b_dist)| {
            b_dist < distance
                && angular_difference(bearing, b_bearing) < OCCLUSION_BEARING_WINDOW_DEG
                && b_look >= defended_look_angle
        });

        if occluded {
            dropped += 1;
            continue;
        }

        blockers.push(
            candidate
                .height_m()
                .map(|height| (bearing, height.atan2(distance).to_degrees(), distance)),
        );
        kept.push(candidate);
    }

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

    /// A stationary candidate placed at the given bearing and distance,
    /// annotated with that distance.
    fn placed(name: &str, bearing_deg: f64, distance_m: f64, height_m: Option<f64>) -> Candidate {
        let position = destination(origin(), bearing_deg, distance_m);
        Candidate::stationary(
            name,
            name,
            position,
            Provenance::Catalog,
            height_m,
            None,
            LandmarkCategory::Building,
        )
        .with_distance(distance_m)
    }

    #[test]
    fn test_tall_close_blocker_suppresses_short_far_candidate() {
        let blocker = placed("Tall Tower", 10.0, 200.0, Some(300.0));
        let hidden = placed("Short Shed", 11.0, 800.0, Some(50.0));

        let (kept, dropped) = filter_line_of_sight(origin(), vec![blocker, hidden]);

        assert_eq!(dropped, 1);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].name(), "Tall Tower");
    }

    #[test]
    fn test_bearing_gap_prevents_occlusion() {
        let blocker = placed("Tall Tower", 10.0, 200.0, Some(300.0));
        let aside = placed("Short Shed", 40.0, 800.0, Some(50.0));

        let (kept, dropped) = filter_line_of_sight(origin(), vec![blocker, aside]);

        assert_eq!(dropped, 0);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_equal_height_closer_blocks_farther() {
        // Same height, same bearing: the closer one subtends the larger
        // look-angle and wins.
        let close = placed("Front Building", 90.0, 300.0, Some(40.0));
        let behind = placed("Back Building", 90.5, 900.0, Some(40.0));

        let (kept, dropped) = filter_line_of_sight(origin(), vec![close, behind]);

        assert_eq!(dropped, 1);
        assert_eq!(kept[0].name(), "Front Building");
    }

    #[test]
    fn test_blocker_without_height_cannot_occlude() {
        let unknown = placed("Mystery Structure", 10.0, 200.0, None);
        let behind = placed("Short Shed", 10.5, 800.0, Some(50.0));

        let (kept, dropped) = filter_line_of_sight(origin(), vec![unknown, behind]);

        assert_eq!(dropped, 0);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_candidate_without_height_defends_with_nominal() {
        // atan(10 / 800) = 0.72 degrees; a 300 m blocker at 200 m reaches
        // 56 degrees and still wins.
        let blocker = placed("Tall Tower", 10.0, 200.0, Some(300.0));
        let anonymous = placed("Unknown Height", 11.0, 800.0, None);

        let (kept, dropped) = filter_line_of_sight(origin(), vec![blocker, anonymous]);
        assert_eq!(dropped, 1);
        assert_eq!(kept.len(), 1);

        // A very low blocker does not clear even the nominal defense:
        // atan(1 / 200) = 0.29 degrees < atan(10 / 800) = 0.72 degrees.
        let low_blocker = placed("Curb", 10.0, 200.0, Some(1.0));
        let anonymous = placed("Unknown Height", 11.0, 800.0, None);

        let (kept, dropped) = filter_line_of_sight(origin(), vec![low_blocker, anonymous]);
        assert_eq!(dropped, 0);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_mobile_candidates_pass_through() {
        let blocker = placed("Tall Tower", 10.0, 200.0, Some(300.0));
        let aircraft = Candidate::mobile(
            "icao:1",
            "UAL839",
            destination(origin(), 10.5, 800.0),
            Provenance::Registry,
            3200.0,
            None,
            None,
        )
        .with_distance(800.0);

        let (kept, dropped) = filter_line_of_sight(origin(), vec![blocker, aircraft]);

        assert_eq!(dropped, 0);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_empty_input() {
        let (kept, dropped) = filter_line_of_sight(origin(), Vec::new());
        assert!(kept.is_empty());
        assert_eq!(dropped, 0);
    }
}
