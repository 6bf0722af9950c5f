//! Source types and the candidate source trait.

use std::future::Future;

use thiserror::Error;

use crate::candidate::{Candidate, Provenance};
use crate::geo::GeoPoint;

/// The spatial window a source is asked to fill.
///
/// Sources answer purely positionally; bearing filtering happens in the
/// fusion engine, which knows each source family's tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceQuery {
    /// Camera position at capture time.
    pub origin: GeoPoint,
    /// Search radius around the origin in meters.
    pub radius_m: f64,
    /// Upper bound on results the source should return.
    pub limit: usize,
}

impl SourceQuery {
    /// Creates a query window.
    pub fn new(origin: GeoPoint, radius_m: f64, limit: usize) -> Self {
        Self {
            origin,
            radius_m,
            limit,
        }
    }
}

/// Errors a source can fail with.
///
/// The fusion engine catches these per source, logs them, and treats the
/// source as an empty contribution; they never abort an identification.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SourceError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(String),

    /// The remote service rejected the request for quota reasons
    #[error("Rate limited by remote service")]
    RateLimited,

    /// Response data could not be interpreted
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The source cannot serve queries right now
    #[error("Source unavailable: {0}")]
    Unavailable(String),
}

/// Trait for candidate sources.
///
/// Implementors answer a positional query with candidate identifications
/// from one backing dataset (recognizer output, remote registry, local
/// catalog, live feed).
pub trait CandidateSource: Send + Sync {
    /// Searches the source for candidates inside the query window.
    ///
    /// # Arguments
    ///
    /// * `query` - Origin, radius, and result limit
    ///
    /// # Returns
    ///
    /// Candidates inside the radius, at most `query.limit` of them.
    fn search(
        &self,
        query: &SourceQuery,
    ) -> impl Future<Output = Result<Vec<Candidate>, SourceError>> + Send;

    /// Returns the source's name for logging and identification.
    fn name(&self) -> &str;

    /// Returns the provenance tag this source's candidates carry.
    fn provenance(&self) -> Provenance;
}
