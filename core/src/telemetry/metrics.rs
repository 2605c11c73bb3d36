use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Per-batch outcome counts, in videos.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.succeeded + self.skipped + self.failed
    }
}

pub struct MetricsRecorder {
    inner: Mutex<BatchSummary>,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(BatchSummary::default()),
        }
    }

    pub fn record_succeeded(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.succeeded += 1;
        }
    }

    pub fn record_skipped(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.skipped += 1;
        }
    }

    pub fn record_failed(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.failed += 1;
        }
    }

    pub fn snapshot(&self) -> BatchSummary {
        if let Ok(metrics) = self.inner.lock() {
            *metrics
        } else {
            BatchSummary::default()
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
