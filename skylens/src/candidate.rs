//! Candidate value objects.
//!
//! A [`Candidate`] is one possible answer to "what is the camera pointed
//! at": a named thing with a position, tagged with the source family it
//! came from. Candidates are immutable; the fusion engine annotates them
//! with derived data (distance, address) by producing new copies.

use std::fmt;

use crate::geo::GeoPoint;

/// Which family of source produced a candidate.
///
/// Provenance fixes both the fusion priority (lower value merges first and
/// wins dedup ties) and the bearing-window leniency each family gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provenance {
    /// On-device recognizer output for the captured frame.
    Vision,
    /// Live remote lookup (place registry, aircraft feed).
    Registry,
    /// Local offline catalog.
    Catalog,
}

impl Provenance {
    /// Fusion merge priority. Lower merges first.
    ///
    /// Vision results are anchored to the actual frame contents, so they
    /// outrank positional lookups when dedup collapses near-identical names.
    pub fn priority(&self) -> u8 {
        match self {
            Self::Vision => 0,
            Self::Registry => 1,
            Self::Catalog => 2,
        }
    }

    /// Multiplier applied to the bearing tolerance for this family.
    ///
    /// Vision candidates were recognized in the frame itself and need no
    /// extra slack; positional lookups get 1.5x to absorb GPS and database
    /// coordinate error.
    pub fn tolerance_factor(&self) -> f64 {
        match self {
            Self::Vision => 1.0,
            Self::Registry | Self::Catalog => 1.5,
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vision => write!(f, "Vision"),
            Self::Registry => write!(f, "Registry"),
            Self::Catalog => write!(f, "Catalog"),
        }
    }
}

/// Broad category of a stationary landmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LandmarkCategory {
    Building,
    Bridge,
    Monument,
    Museum,
    Stadium,
    Tower,
    Park,
    Other,
}

impl LandmarkCategory {
    /// Maps a free-form source label onto a category.
    ///
    /// Matching is case-insensitive on the labels the registry and catalog
    /// formats actually emit; anything unrecognized lands in `Other`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "building" => Self::Building,
            "bridge" => Self::Bridge,
            "monument" | "memorial" => Self::Monument,
            "museum" => Self::Museum,
            "stadium" | "arena" => Self::Stadium,
            "tower" => Self::Tower,
            "park" | "garden" => Self::Park,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for LandmarkCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Building => write!(f, "building"),
            Self::Bridge => write!(f, "bridge"),
            Self::Monument => write!(f, "monument"),
            Self::Museum => write!(f, "museum"),
            Self::Stadium => write!(f, "stadium"),
            Self::Tower => write!(f, "tower"),
            Self::Park => write!(f, "park"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Kind-specific candidate data.
#[derive(Debug, Clone, PartialEq)]
pub enum CandidateKind {
    /// A fixed landmark.
    Stationary {
        /// Structure height in meters, when the source knows it.
        height_m: Option<f64>,
        /// Construction year, when the source knows it.
        year_built: Option<u16>,
        /// Broad category.
        category: LandmarkCategory,
    },
    /// A moving aerial target.
    Mobile {
        /// Altitude in meters above sea level, same datum as the capture.
        altitude_m: f64,
        /// Track heading in degrees, when reported.
        heading_deg: Option<f64>,
        /// Ground speed in meters per second, when reported.
        ground_speed_mps: Option<f64>,
    },
}

/// One possible identification of the targeted object.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    id: String,
    name: String,
    position: GeoPoint,
    provenance: Provenance,
    kind: CandidateKind,
    distance_m: Option<f64>,
    address: Option<String>,
}

impl Candidate {
    /// Creates a stationary landmark candidate.
    pub fn stationary(
        id: impl Into<String>,
        name: impl Into<String>,
        position: GeoPoint,
        provenance: Provenance,
        height_m: Option<f64>,
        year_built: Option<u16>,
        category: LandmarkCategory,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            position,
            provenance,
            kind: CandidateKind::Stationary {
                height_m,
                year_built,
                category,
            },
            distance_m: None,
            address: None,
        }
    }

    /// Creates a mobile aerial candidate.
    pub fn mobile(
        id: impl Into<String>,
        name: impl Into<String>,
        position: GeoPoint,
        provenance: Provenance,
        altitude_m: f64,
        heading_deg: Option<f64>,
        ground_speed_mps: Option<f64>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            position,
            provenance,
            kind: CandidateKind::Mobile {
                altitude_m,
                heading_deg,
                ground_speed_mps,
            },
            distance_m: None,
            address: None,
        }
    }

    /// Returns a copy annotated with a distance from the camera.
    pub fn with_distance(&self, distance_m: f64) -> Self {
        Self {
            distance_m: Some(distance_m),
            ..self.clone()
        }
    }

    /// Returns a copy annotated with a resolved street address.
    pub fn with_address(&self, address: impl Into<String>) -> Self {
        Self {
            address: Some(address.into()),
            ..self.clone()
        }
    }

    /// Source-scoped identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Human-readable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Candidate position.
    pub fn position(&self) -> GeoPoint {
        self.position
    }

    /// Which source family produced this candidate.
    pub fn provenance(&self) -> Provenance {
        self.provenance
    }

    /// Kind-specific data.
    pub fn kind(&self) -> &CandidateKind {
        &self.kind
    }

    /// Distance from the camera in meters, once the fusion engine has
    /// annotated it.
    pub fn distance_m(&self) -> Option<f64> {
        self.distance_m
    }

    /// Resolved street address, if any.
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    /// True for mobile (aerial) candidates.
    pub fn is_mobile(&self) -> bool {
        matches!(self.kind, CandidateKind::Mobile { .. })
    }

    /// Structure height for stationary candidates, `None` for mobile ones
    /// or when the source did not report a height.
    pub fn height_m(&self) -> Option<f64> {
        match self.kind {
            CandidateKind::Stationary { height_m, .. } => height_m,
            CandidateKind::Mobile { .. } => None,
        }
    }

    /// The name normalized for duplicate detection: trimmed, lowercased,
    /// inner whitespace collapsed to single spaces.
    pub fn similarity_key(&self) -> String {
        self.name
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.distance_m {
            Some(distance) => write!(
                f,
                "{} [{}] at {} ({:.0}m)",
                self.name, self.provenance, self.position, distance
            ),
            None => write!(f, "{} [{}] at {}", self.name, self.provenance, self.position),
        }
    }
}
