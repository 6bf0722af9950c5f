//! Session-wide fusion metrics tracking.
//!
//! Provides thread-safe accumulation of identification metrics across all
//! fusion requests during a session.

use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe session-wide fusion metrics.
///
/// Counters can be safely updated from concurrent identification requests
/// and read for periodic logging.
///
/// # Example
///
/// ```
/// use skylens::metrics::FusionMetrics;
///
/// let metrics = FusionMetrics::new();
///
/// metrics.record_sources_queried(3);
/// metrics.record_source_failed();
///
/// let snapshot = metrics.snapshot();
/// println!("Queried: {} sources", snapshot.sources_queried);
/// ```
#[derive(Debug)]
pub struct FusionMetrics {
    /// Identification requests started
    identifications: AtomicU64,
    /// Source queries issued
    sources_queried: AtomicU64,
    /// Source queries that failed with an error
    sources_failed: AtomicU64,
    /// Source queries that hit the per-source timeout
    sources_timed_out: AtomicU64,
    /// Candidates surviving the bearing window across all sources
    candidates_merged: AtomicU64,
    /// Candidates dropped as fuzzy-name duplicates
    duplicates_dropped: AtomicU64,
    /// Candidates dropped by the line-of-sight filter
    occlusions_dropped: AtomicU64,
    /// Candidates dropped by the aerial elevation filter
    elevation_dropped: AtomicU64,
}

/// Snapshot of fusion metrics at a point in time.
#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    /// Identification requests started
    pub identifications: u64,
    /// Source queries issued
    pub sources_queried: u64,
    /// Source queries that failed with an error
    pub sources_failed: u64,
    /// Source queries that hit the per-source timeout
    pub sources_timed_out: u64,
    /// Candidates surviving the bearing window across all sources
    pub candidates_merged: u64,
    /// Candidates dropped as fuzzy-name duplicates
    pub duplicates_dropped: u64,
    /// Candidates dropped by the line-of-sight filter
    pub occlusions_dropped: u64,
    /// Candidates dropped by the aerial elevation filter
    pub elevation_dropped: u64,
}

impl FusionMetrics {
    /// Create a new metrics tracker.
    pub fn new() -> Self {
        Self {
            identifications: AtomicU64::new(0),
            sources_queried: AtomicU64::new(0),
            sources_failed: AtomicU64::new(0),
            sources_timed_out: AtomicU64::new(0),
            candidates_merged: AtomicU64::new(0),
            duplicates_dropped: AtomicU64::new(0),
            occlusions_dropped: AtomicU64::new(0),
            elevation_dropped: AtomicU64::new(0),
        }
    }

    /// Record the start of an identification request.
    pub fn record_identification(&self) {
        self.identifications.fetch_add(1, Ordering::Relaxed);
    }

    /// Record source queries being issued.
    pub fn record_sources_queried(&self, count: usize) {
        self.sources_queried
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Record a source query failing with an error.
    pub fn record_source_failed(&self) {
        self.sources_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a source query hitting the per-source timeout.
    pub fn record_source_timed_out(&self) {
        self.sources_timed_out.fetch_add(1, Ordering::Relaxed);
    }

    /// Record candidates surviving the bearing window.
    pub fn record_candidates_merged(&self, count: usize) {
        self.candidates_merged
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Record candidates dropped as duplicates.
    pub fn record_duplicates_dropped(&self, count: usize) {
        self.duplicates_dropped
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Record candidates dropped by the line-of-sight filter.
    pub fn record_occlusions_dropped(&self, count: usize) {
        self.occlusions_dropped
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Record candidates dropped by the aerial elevation filter.
    pub fn record_elevation_dropped(&self, count: usize) {
        self.elevation_dropped
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Get a snapshot of current metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            identifications: self.identifications.load(Ordering::Relaxed),
            sources_queried: self.sources_queried.load(Ordering::Relaxed),
            sources_failed: self.sources_failed.load(Ordering::Relaxed),
            sources_timed_out: self.sources_timed_out.load(Ordering::Relaxed),
            candidates_merged: self.candidates_merged.load(Ordering::Relaxed),
            duplicates_dropped: self.duplicates_dropped.load(Ordering::Relaxed),
            occlusions_dropped: self.occlusions_dropped.load(Ordering::Relaxed),
            elevation_dropped: self.elevation_dropped.load(Ordering::Relaxed),
        }
    }
}

impl Default for FusionMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_metrics_are_zero() {
        let metrics = FusionMetrics::new();
        let snapshot = metrics.snapshot();

        assert_eq!(snapshot.identifications, 0);
        assert_eq!(snapshot.sources_queried, 0);
        assert_eq!(snapshot.sources_failed, 0);
        assert_eq!(snapshot.sources_timed_out, 0);
        assert_eq!(snapshot.candidates_merged, 0);
        assert_eq!(snapshot.duplicates_dropped, 0);
        assert_eq!(snapshot.occlusions_dropped, 0);
        assert_eq!(snapshot.elevation_dropped, 0);
    }

    #[test]
    fn test_record_and_snapshot() {
        let metrics = FusionMetrics::new();

        metrics.record_identification();
        metrics.record_sources_queried(3);
        metrics.record_source_failed();
        metrics.record_source_timed_out();
        metrics.record_candidates_merged(7);
        metrics.record_duplicates_dropped(2);
        metrics.record_occlusions_dropped(1);
        metrics.record_elevation_dropped(4);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.identifications, 1);
        assert_eq!(snapshot.sources_queried, 3);
        assert_eq!(snapshot.sources_failed, 1);
        assert_eq!(snapshot.sources_timed_out, 1);
        assert_eq!(snapshot.candidates_merged, 7);
        assert_eq!(snapshot.duplicates_dropped, 2);
        assert_eq!(snapshot.occlusions_dropped, 1);
        assert_eq!(snapshot.elevation_dropped, 4);
    }

    #[test]
    fn test_thread_safety() {
        use std::sync::Arc;
        use std::thread;

        let metrics = Arc::new(FusionMetrics::new());
        let mut handles = vec![];

        for _ in 0..10 {
            let metrics = Arc::clone(&metrics);
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    metrics.record_sources_queried(1);
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(metrics.snapshot().sources_queried, 1000);
    }

    #[test]
    fn test_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FusionMetrics>();
    }
}
