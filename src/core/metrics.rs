//! Logger metrics for observability
//!
//! Counters for lines written, lines suppressed by a transport's policy,
//! sink failures and diagnostic warnings.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics shared by every logger of one manager
///
/// # Example
///
/// ```
/// use rust_redacting_logger::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
///
/// metrics.record_emitted();
/// metrics.record_suppressed();
///
/// assert_eq!(metrics.total_emitted(), 1);
/// assert_eq!(metrics.suppressed(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Lines handed to a sink
    total_emitted: AtomicU64,

    /// Renders suppressed by level limit or redact-all policy
    suppressed: AtomicU64,

    /// Sink writes that failed or panicked
    sink_failures: AtomicU64,

    /// Diagnostic warnings reported
    warnings: AtomicU64,
}

impl LoggerMetrics {
    pub const fn new() -> Self {
        Self {
            total_emitted: AtomicU64::new(0),
            suppressed: AtomicU64::new(0),
            sink_failures: AtomicU64::new(0),
            warnings: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn total_emitted(&self) -> u64 {
        self.total_emitted.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn suppressed(&self) -> u64 {
        self.suppressed.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn sink_failures(&self) -> u64 {
        self.sink_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn warnings(&self) -> u64 {
        self.warnings.load(Ordering::Relaxed)
    }

    /// Record a line written to a sink; returns the previous count
    #[inline]
    pub fn record_emitted(&self) -> u64 {
        self.total_emitted.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_suppressed(&self) -> u64 {
        self.suppressed.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_sink_failure(&self) -> u64 {
        self.sink_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_warning(&self) -> u64 {
        self.warnings.fetch_add(1, Ordering::Relaxed)
    }

    /// Suppressed renders as a percentage (0.0 - 100.0) of all renders
    ///
    /// Returns 0.0 if nothing has been rendered.
    pub fn suppression_rate(&self) -> f64 {
        let suppressed = self.suppressed() as f64;
        let total = self.total_emitted() as f64 + suppressed;
        if total == 0.0 {
            0.0
        } else {
            (suppressed / total) * 100.0
        }
    }

    pub fn reset(&self) {
        self.total_emitted.store(0, Ordering::Relaxed);
        self.suppressed.store(0, Ordering::Relaxed);
        self.sink_failures.store(0, Ordering::Relaxed);
        self.warnings.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            total_emitted: AtomicU64::new(self.total_emitted()),
            suppressed: AtomicU64::new(self.suppressed()),
            sink_failures: AtomicU64::new(self.sink_failures()),
            warnings: AtomicU64::new(self.warnings()),
        }
    }
}
