//! Vision recognizer source.
//!
//! The on-device recognizer runs outside this crate and hands over a scored
//! list of objects it found in the captured frame. [`VisionSource`] adapts
//! that list to the [`CandidateSource`] interface so recognizer output
//! fuses with positional lookups like any other source.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::types::{CandidateSource, SourceError, SourceQuery};
use crate::candidate::{Candidate, LandmarkCategory, Provenance};
use crate::geo::{great_circle_distance, GeoPoint};

/// One recognized object as produced by the external recognizer.
///
/// This mirrors the recognizer's JSON output; it is decoupled from
/// [`Candidate`] so recognizer format changes stay at this boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizedObject {
    /// Recognizer-assigned identifier, if it produces one.
    #[serde(default)]
    pub id: Option<String>,
    /// Recognized name.
    pub name: String,
    /// Recognizer confidence in [0, 1].
    pub confidence: f64,
    /// Geo-anchored latitude of the recognized object.
    pub latitude: f64,
    /// Geo-anchored longitude of the recognized object.
    pub longitude: f64,
    /// Category label, when the recognizer classifies.
    #[serde(default)]
    pub category: Option<String>,
    /// Known structure height in meters, when available.
    #[serde(default)]
    pub height_m: Option<f64>,
}

/// Candidate source backed by a recognizer result list.
///
/// Conversion happens once at construction; records with out-of-range
/// coordinates are logged and skipped. Recognizer ordering (descending
/// confidence) is preserved through `search`.
pub struct VisionSource {
    candidates: Vec<Candidate>,
}

impl VisionSource {
    /// Creates a vision source from recognizer output.
    pub fn new(objects: Vec<RecognizedObject>) -> Self {
        let candidates = objects
            .into_iter()
            .enumerate()
            .filter_map(|(index, object)| {
                let position = match GeoPoint::new(object.latitude, object.longitude) {
                    Ok(position) => position,
                    Err(e) => {
                        warn!(
                            name = %object.name,
                            error = %e,
                            "Skipping recognized object with invalid coordinates"
                        );
                        return None;
                    }
                };

                let id = object
                    .id
                    .unwrap_or_else(|| format!("vision:{}", index));
                let category = object
                    .category
                    .as_deref()
                    .map(LandmarkCategory::from_label)
                    .unwrap_or(LandmarkCategory::Other);

                Some(Candidate::stationary(
                    id,
                    object.name,
                    position,
                    Provenance::Vision,
                    object.height_m,
                    None,
                    category,
                ))
            })
            .collect();

        Self { candidates }
    }

    /// Number of usable recognized objects.
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// True when the recognizer found nothing usable.
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

impl CandidateSource for VisionSource {
    async fn search(&self, query: &SourceQuery) -> Result<Vec<Candidate>, SourceError> {
        let results = self
            .candidates
            .iter()
            .filter(|candidate| {
                great_circle_distance(query.origin, candidate.position()) <= query.radius_m
            })
            .take(query.limit)
            .cloned()
            .collect();

        Ok(results)
    }

    fn name(&self) -> &str {
        "Vision"
    }

    fn provenance(&self) -> Provenance {
        Provenance::Vision
    }
}
