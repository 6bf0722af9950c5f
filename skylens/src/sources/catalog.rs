//! Local landmark catalog source.
//!
//! An offline fallback for identification without connectivity: a JSON file
//! of landmarks bundled with the application (or produced by an earlier
//! sync), loaded into memory and searched by radius.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use super::types::{CandidateSource, SourceError, SourceQuery};
use crate::candidate::{Candidate, LandmarkCategory, Provenance};
use crate::geo::{great_circle_distance, GeoPoint};

/// One catalog record as stored on disk.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntry {
    /// Catalog identifier, if assigned.
    #[serde(default)]
    pub id: Option<String>,
    /// Landmark name.
    pub name: String,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Structure height in meters, when known.
    #[serde(default)]
    pub height_m: Option<f64>,
    /// Construction year, when known.
    #[serde(default)]
    pub year_built: Option<u16>,
    /// Category label, when classified.
    #[serde(default)]
    pub category: Option<String>,
    /// Street address, when known.
    #[serde(default)]
    pub address: Option<String>,
}

/// Errors loading a catalog file.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Could not read the catalog file
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    /// Catalog file is not valid JSON
    #[error("Failed to parse catalog file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Candidate source backed by an in-memory landmark catalog.
pub struct LocalCatalog {
    candidates: Vec<Candidate>,
}

impl LocalCatalog {
    /// Creates a catalog from already-loaded entries.
    ///
    /// Entries with out-of-range coordinates are logged and skipped.
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Self {
        let candidates = entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| {
                let position = match GeoPoint::new(entry.latitude, entry.longitude) {
                    Ok(position) => position,
                    Err(e) => {
                        warn!(
                            name = %entry.name,
                            error = %e,
                            "Skipping catalog entry with invalid coordinates"
                        );
                        return None;
                    }
                };

                let id = entry.id.unwrap_or_else(|| format!("catalog:{}", index));
                let category = entry
                    .category
                    .as_deref()
                    .map(LandmarkCategory::from_label)
                    .unwrap_or(LandmarkCategory::Other);

                let candidate = Candidate::stationary(
                    id,
                    entry.name,
                    position,
                    Provenance::Catalog,
                    entry.height_m,
                    entry.year_built,
                    category,
                );

                Some(match entry.address {
                    Some(address) => candidate.with_address(address),
                    None => candidate,
                })
            })
            .collect();

        Self { candidates }
    }

    /// Loads a catalog from a JSON file holding an array of entries.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Io`] if the file cannot be read and
    /// [`CatalogError::Parse`] if it is not a valid entry array.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let data = std::fs::read(path)?;
        let entries: Vec<CatalogEntry> = serde_json::from_slice(&data)?;
        Ok(Self::from_entries(entries))
    }

    /// Number of usable catalog entries.
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// True when the catalog holds no usable entries.
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

impl CandidateSource for LocalCatalog {
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
        "LocalCatalog"
    }

    fn provenance(&self) -> Provenance {
        Provenance::Catalog
    }
}
