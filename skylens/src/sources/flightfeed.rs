//! Live aircraft feed source.
//!
//! Queries a live flight state feed for aircraft near a position and adapts
//! fresh records into mobile candidates. Feed records carry a `last_seen`
//! RFC 3339 timestamp; records older than the staleness bound describe
//! where an aircraft was, not where it is, and are skipped.
//!
//! # URL Pattern
//!
//! `{base}/states?lat={lat}&lon={lon}&radius={m}`

use std::time::Duration;

use serde::Deserialize;
use tracing::{trace, warn};

use super::http::AsyncHttpClient;
use super::types::{CandidateSource, SourceError, SourceQuery};
use crate::candidate::{Candidate, Provenance};
use crate::geo::GeoPoint;

/// Default bound on feed record age.
pub const DEFAULT_MAX_STALE: Duration = Duration::from_secs(60);

/// One aircraft state as returned by the feed.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedAircraft {
    /// Feed identifier (typically the ICAO 24-bit address).
    pub id: String,
    /// Flight callsign, when broadcast.
    #[serde(default)]
    pub callsign: Option<String>,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Altitude in meters above sea level.
    pub altitude_m: f64,
    /// Track heading in degrees, when reported.
    #[serde(default)]
    pub heading_deg: Option<f64>,
    /// Ground speed in meters per second, when reported.
    #[serde(default)]
    pub ground_speed_mps: Option<f64>,
    /// When the feed last heard from this aircraft (RFC 3339).
    pub last_seen: String,
}

/// Top-level feed response envelope.
#[derive(Debug, Deserialize)]
struct FeedResponse {
    states: Vec<FeedAircraft>,
}

/// Candidate source backed by a live aircraft state feed.
pub struct FlightFeedSource<C: AsyncHttpClient> {
    http_client: C,
    base_url: String,
    max_stale: Duration,
}

impl<C: AsyncHttpClient> FlightFeedSource<C> {
    /// Creates a new flight feed source.
    ///
    /// # Arguments
    ///
    /// * `http_client` - HTTP client for making requests
    /// * `base_url` - Feed base URL, without a trailing slash
    /// * `max_stale` - Oldest `last_seen` age still treated as live
    pub fn new(http_client: C, base_url: impl Into<String>, max_stale: Duration) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
            max_stale,
        }
    }

    /// Builds the states URL for the given query window.
    fn build_url(&self, query: &SourceQuery) -> String {
        format!(
            "{}/states?lat={:.6}&lon={:.6}&radius={:.0}",
            self.base_url,
            query.origin.latitude(),
            query.origin.longitude(),
            query.radius_m
        )
    }
}

/// Converts one feed record to a mobile candidate.
///
/// Returns `None` for stale records, malformed timestamps, and out-of-range
/// coordinates; the rest of the response still converts.
fn convert_state(state: FeedAircraft, max_stale: Duration) -> Option<Candidate> {
    let last_seen = match chrono::DateTime::parse_from_rfc3339(&state.last_seen) {
        Ok(last_seen) => last_seen,
        Err(e) => {
            warn!(
                id = %state.id,
                error = %e,
                "Skipping aircraft with malformed last_seen timestamp"
            );
            return None;
        }
    };

    let age = chrono::Utc::now()
        .signed_duration_since(last_seen)
        .to_std()
        .unwrap_or(Duration::ZERO);

    if age > max_stale {
        trace!(
            id = %state.id,
            age_secs = age.as_secs(),
            max_secs = max_stale.as_secs(),
            "Skipping stale aircraft state"
        );
        return None;
    }

    let position = match GeoPoint::new(state.latitude, state.longitude) {
        Ok(position) => position,
        Err(e) => {
            warn!(
                id = %state.id,
                error = %e,
                "Skipping aircraft with invalid coordinates"
            );
            return None;
        }
    };

    let name = state
        .callsign
        .as_deref()
        .map(str::trim)
        .filter(|callsign| !callsign.is_empty())
        .unwrap_or(&state.id)
        .to_string();

    Some(Candidate::mobile(
        state.id,
        name,
        position,
        Provenance::Registry,
        state.altitude_m,
        state.heading_deg,
        state.ground_speed_mps,
    ))
}

impl<C: AsyncHttpClient> CandidateSource for FlightFeedSource<C> {
    async fn search(&self, query: &SourceQuery) -> Result<Vec<Candidate>, SourceError> {
        let url = self.build_url(query);
        let body = self.http_client.get(&url).await?;

        let response: FeedResponse = serde_json::from_slice(&body)
            .map_err(|e| SourceError::InvalidResponse(format!("Malformed feed JSON: {}", e)))?;

        let candidates = response
            .states
            .into_iter()
            .filter_map(|state| convert_state(state, self.max_stale))
            .take(query.limit)
            .collect();

        Ok(candidates)
    }

    fn name(&self) -> &str {
        "FlightFeed"
    }

    fn provenance(&self) -> Provenance {
        Provenance::Registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::CandidateKind;
    use crate::sources::MockAsyncHttpClient;

    fn state(id: &str, callsign: Option<&str>, last_seen: String) -> FeedAircraft {
        FeedAircraft {
            id: id.to_string(),
            callsign: callsign.map(|s| s.to_string()),
            latitude: 37.7125,
            longitude: -122.2197,
            altitude_m: 3200.0,
            heading_deg: Some(285.0),
            ground_speed_mps: Some(210.0),
            last_seen,
        }
    }

    fn feed_body(states: &[(&str, &str)]) -> Vec<u8> {
        let now = chrono::Utc::now().to_rfc3339();
        let entries: Vec<String> = states
            .iter()
            .map(|(id, callsign)| {
                format!(
                    r#"{{"id":"{}","callsign":"{}","latitude":37.7125,"longitude":-122.2197,"altitude_m":3200.0,"heading_deg":285.0,"ground_speed_mps":210.0,"last_seen":"{}"}}"#,
                    id, callsign, now
                )
            })
            .collect();
        format!(r#"{{"states":[{}]}}"#, entries.join(",")).into_bytes()
    }

    fn sample_query() -> SourceQuery {
        SourceQuery::new(GeoPoint::new(37.7749, -122.4194).unwrap(), 30_000.0, 10)
    }

    #[test]
    fn test_convert_fresh_state() {
        let now = chrono::Utc::now().to_rfc3339();
        let candidate = convert_state(state("a1b2c3", Some("UAL839"), now), DEFAULT_MAX_STALE)
            .expect("fresh state should convert");

        assert_eq!(candidate.id(), "a1b2c3");
        assert_eq!(candidate.name(), "UAL839");
        assert!(candidate.is_mobile());
        assert!(matches!(
            candidate.kind(),
            CandidateKind::Mobile {
                altitude_m,
                heading_deg: Some(heading),
                ground_speed_mps: Some(speed),
            } if *altitude_m == 3200.0 && *heading == 285.0 && *speed == 210.0
        ));
    }

    #[test]
    fn test_convert_stale_state_skipped() {
        let old = (chrono::Utc::now() - chrono::Duration::seconds(120)).to_rfc3339();
        assert!(convert_state(state("a1b2c3", Some("UAL839"), old), DEFAULT_MAX_STALE).is_none());
    }

    #[test]
    fn test_convert_malformed_timestamp_skipped() {
        let broken = state("a1b2c3", Some("UAL839"), "not-a-timestamp".to_string());
        assert!(convert_state(broken, DEFAULT_MAX_STALE).is_none());
    }

    #[test]
    fn test_blank_callsign_falls_back_to_id() {
        let now = chrono::Utc::now().to_rfc3339();
        let candidate =
            convert_state(state("a1b2c3", Some("   "), now.clone()), DEFAULT_MAX_STALE).unwrap();
        assert_eq!(candidate.name(), "a1b2c3");

        let candidate = convert_state(state("a1b2c3", None, now), DEFAULT_MAX_STALE).unwrap();
        assert_eq!(candidate.name(), "a1b2c3");
    }

    #[tokio::test]
    async fn test_search_parses_feed() {
        let mock = MockAsyncHttpClient {
            response: Ok(feed_body(&[("a1", "UAL839"), ("b2", "SWA123")])),
        };
        let source = FlightFeedSource::new(mock, "https://feed.test", DEFAULT_MAX_STALE);

        let results = source.search(&sample_query()).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].name(), "UAL839");
        assert_eq!(results[0].provenance(), Provenance::Registry);
    }

    #[tokio::test]
    async fn test_search_honors_limit() {
        let mock = MockAsyncHttpClient {
            response: Ok(feed_body(&[("a1", "UAL839"), ("b2", "SWA123"), ("c3", "DAL456")])),
        };
        let source = FlightFeedSource::new(mock, "https://feed.test", DEFAULT_MAX_STALE);

        let mut query = sample_query();
        query.limit = 2;
        let results = source.search(&query).await.unwrap();
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn test_search_malformed_json() {
        let mock = MockAsyncHttpClient {
            response: Ok(b"<html>downtime</html>".to_vec()),
        };
        let source = FlightFeedSource::new(mock, "https://feed.test", DEFAULT_MAX_STALE);

        let result = source.search(&sample_query()).await;
        assert!(matches!(result, Err(SourceError::InvalidResponse(_))));
    }

    #[test]
    fn test_url_construction() {
        let mock = MockAsyncHttpClient {
            response: Ok(vec![]),
        };
        let source = FlightFeedSource::new(mock, "https://feed.test/v2", DEFAULT_MAX_STALE);

        let url = source.build_url(&sample_query());
        assert_eq!(
            url,
            "https://feed.test/v2/states?lat=37.774900&lon=-122.419400&radius=30000"
        );
    }
}
