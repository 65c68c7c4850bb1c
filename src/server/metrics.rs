use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Counters for `/submit` outcomes, shared by every handler.
#[derive(Debug, Clone, Default)]
pub struct SubmissionMetrics {
    received: Arc<AtomicU64>,
    saved: Arc<AtomicU64>,
    rejected: Arc<AtomicU64>, // 4xx
    failed: Arc<AtomicU64>,   // 5xx
}

/// Point-in-time copy of [`SubmissionMetrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub received: u64,
    pub saved: u64,
    pub rejected: u64,
    pub failed: u64,
}

impl SubmissionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_received(&self) {
        self.received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_saved(&self) {
        self.saved.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            received: self.received.load(Ordering::Relaxed),
            saved: self.saved.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_counters() {
        let metrics = SubmissionMetrics::new();
        let handle = metrics.clone();

        metrics.increment_received();
        handle.increment_received();
        handle.increment_saved();
        metrics.increment_rejected();

        assert_eq!(
            metrics.snapshot(),
            MetricsSnapshot {
                received: 2,
                saved: 1,
                rejected: 1,
                failed: 0,
            }
        );
    }
}
