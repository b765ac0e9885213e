use crate::processing::Label;
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing prediction activity.
#[derive(Default)]
pub struct PredictionMetrics {
    documents_received: AtomicU64,
    spam_detected: AtomicU64,
    ham_detected: AtomicU64,
    extraction_failures: AtomicU64,
    empty_documents: AtomicU64,
}

impl PredictionMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a document entering the prediction path.
    pub fn record_received(&self) {
        self.documents_received.fetch_add(1, Ordering::Relaxed);
    }

    /// Record the label assigned to a successfully classified document.
    pub fn record_label(&self, label: Label) {
        let counter = match label {
            Label::Spam => &self.spam_detected,
            Label::Ham => &self.ham_detected,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a document whose first page could not be read.
    pub fn record_extraction_failure(&self) {
        self.extraction_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a document that produced no usable tokens.
    pub fn record_empty_document(&self) {
        self.empty_documents.fetch_add(1, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            documents_received: self.documents_received.load(Ordering::Relaxed),
            spam_detected: self.spam_detected.load(Ordering::Relaxed),
            ham_detected: self.ham_detected.load(Ordering::Relaxed),
            extraction_failures: self.extraction_failures.load(Ordering::Relaxed),
            empty_documents: self.empty_documents.load(Ordering::Relaxed),
        }
    }
}

/// Immutable view of prediction counters used for reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct MetricsSnapshot {
    /// Documents submitted for classification since startup.
    pub documents_received: u64,
    /// Documents labelled spam.
    pub spam_detected: u64,
    /// Documents labelled ham.
    pub ham_detected: u64,
    /// Documents rejected because the PDF could not be read.
    pub extraction_failures: u64,
    /// Documents whose first page held no usable text.
    pub empty_documents: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_labels_and_failures() {
        let metrics = PredictionMetrics::new();
        for _ in 0..4 {
            metrics.record_received();
        }
        metrics.record_label(Label::Spam);
        metrics.record_label(Label::Ham);
        metrics.record_extraction_failure();
        metrics.record_empty_document();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.documents_received, 4);
        assert_eq!(snapshot.spam_detected, 1);
        assert_eq!(snapshot.ham_detected, 1);
        assert_eq!(snapshot.extraction_failures, 1);
        assert_eq!(snapshot.empty_documents, 1);
    }

    #[test]
    fn snapshot_starts_at_zero() {
        assert_eq!(PredictionMetrics::new().snapshot(), MetricsSnapshot::default());
    }
}
