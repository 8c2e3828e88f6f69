// Workflow metrics module
//
// Lightweight counters for discovery calls, runs and state updates

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Workflow metrics
///
/// Uses atomic operations for thread-safe tracking without locks.
/// The coordinator records into one shared instance; the summary is
/// logged on shutdown.
#[derive(Debug)]
pub struct Metrics {
    /// Discovery calls that produced a ready slot
    pub discoveries_succeeded: AtomicU64,

    /// Discovery calls that left a slot failed
    pub discoveries_failed: AtomicU64,

    /// Discovery or run responses dropped because they were superseded
    pub stale_responses: AtomicU64,

    /// Comparison requests submitted
    pub runs_started: AtomicU64,

    pub runs_succeeded: AtomicU64,

    pub runs_failed: AtomicU64,

    /// Total time spent waiting on comparison requests, in milliseconds
    pub total_run_time_ms: AtomicU64,

    /// Number of state change events emitted
    pub state_updates: AtomicU64,

    start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            discoveries_succeeded: AtomicU64::new(0),
            discoveries_failed: AtomicU64::new(0),
            stale_responses: AtomicU64::new(0),
            runs_started: AtomicU64::new(0),
            runs_succeeded: AtomicU64::new(0),
            runs_failed: AtomicU64::new(0),
            total_run_time_ms: AtomicU64::new(0),
            state_updates: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_discovery_succeeded(&self) {
        self.discoveries_succeeded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_discovery_failed(&self) {
        self.discoveries_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_stale_response(&self) {
        self.stale_responses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_run_started(&self) {
        self.runs_started.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_run_succeeded(&self) {
        self.runs_succeeded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_run_failed(&self) {
        self.runs_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record how long one comparison request took
    pub fn record_run_time(&self, duration: Duration) {
        self.total_run_time_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    /// Record the events emitted by one state update
    pub fn record_state_updates(&self, count: usize) {
        self.state_updates.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Average comparison request time in milliseconds
    pub fn avg_run_time_ms(&self) -> f64 {
        let total = self.total_run_time_ms.load(Ordering::Relaxed);
        let count = self.runs_started.load(Ordering::Relaxed);
        if count > 0 {
            total as f64 / count as f64
        } else {
            0.0
        }
    }

    /// Log metrics summary
    pub fn log_summary(&self) {
        tracing::info!("=== Workflow Metrics Summary ===");
        tracing::info!("Uptime: {:.2}s", self.uptime().as_secs_f64());
        tracing::info!(
            "Discoveries: {} ready, {} failed",
            self.discoveries_succeeded.load(Ordering::Relaxed),
            self.discoveries_failed.load(Ordering::Relaxed)
        );
        tracing::info!(
            "Runs: {} started, {} succeeded, {} failed (avg: {:.2}ms per run)",
            self.runs_started.load(Ordering::Relaxed),
            self.runs_succeeded.load(Ordering::Relaxed),
            self.runs_failed.load(Ordering::Relaxed),
            self.avg_run_time_ms()
        );
        tracing::info!(
            "State updates: {}, stale responses dropped: {}",
            self.state_updates.load(Ordering::Relaxed),
            self.stale_responses.load(Ordering::Relaxed)
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
