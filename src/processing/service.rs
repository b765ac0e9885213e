//! Prediction service coordinating extraction, preprocessing, and classification.

use crate::{
    extraction::{LopdfExtractor, PdfTextExtractor},
    metrics::{MetricsSnapshot, PredictionMetrics},
    processing::{
        normalize::normalize,
        pipeline::SpamPipeline,
        types::{Prediction, PredictionError, PredictionResult},
    },
};
use async_trait::async_trait;
use bytes::Bytes;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::Instrument;

/// Abstraction over the prediction pipeline used by external surfaces (HTTP, CLI).
#[async_trait]
pub trait PredictionApi: Send + Sync {
    /// Classify the first page of an uploaded PDF.
    async fn classify_document(&self, document: Bytes) -> Result<Prediction, PredictionError>;

    /// Retrieve the current metrics snapshot for diagnostics.
    fn metrics_snapshot(&self) -> MetricsSnapshot;

    /// Describe the loaded model.
    fn model_summary(&self) -> ModelSummary;
}

/// Static description of the loaded model, reported by health checks.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ModelSummary {
    /// Vectorizer kind (`count` / `tfidf`).
    pub vectorizer: &'static str,
    /// Classifier kind (`multinomial_nb` / `linear`).
    pub classifier: &'static str,
    /// Vocabulary size.
    pub features: usize,
}

/// Runs the full document → prediction flow.
///
/// The service owns shared handles to the extractor, the immutable pipeline, and the metrics
/// registry. Cloning is cheap; construct it once near process start.
#[derive(Clone)]
pub struct PredictionService {
    extractor: Arc<dyn PdfTextExtractor>,
    pipeline: Arc<SpamPipeline>,
    metrics: Arc<PredictionMetrics>,
}

impl PredictionService {
    /// Build a service over `pipeline` using the `lopdf` extractor.
    pub fn new(pipeline: Arc<SpamPipeline>) -> Self {
        Self::with_extractor(pipeline, Arc::new(LopdfExtractor::new()))
    }

    /// Build a service with a custom extraction backend.
    pub fn with_extractor(pipeline: Arc<SpamPipeline>, extractor: Arc<dyn PdfTextExtractor>) -> Self {
        Self {
            extractor,
            pipeline,
            metrics: Arc::new(PredictionMetrics::new()),
        }
    }

    /// Classify a document and fold the outcome into the caller-facing record.
    pub fn predict_from_document(&self, document: &[u8]) -> PredictionResult {
        self.classify_bytes(document).into()
    }

    /// Classify a document, returning typed errors.
    pub fn classify_bytes(&self, document: &[u8]) -> Result<Prediction, PredictionError> {
        self.metrics.record_received();
        let text = self.extractor.first_page_text(document).inspect_err(|err| {
            self.metrics.record_extraction_failure();
            tracing::warn!(error = %err, "PDF extraction failed");
        })?;
        self.classify_text(&text)
    }

    /// Classify text already extracted from a first page.
    pub fn classify_text(&self, text: &str) -> Result<Prediction, PredictionError> {
        let processed = self
            .pipeline
            .preprocess(&[text])
            .pop()
            .map(|joined| normalize(&joined))
            .unwrap_or_default();
        if processed.is_empty() {
            self.metrics.record_empty_document();
            tracing::info!(raw_chars = text.chars().count(), "No usable text on first page");
            return Err(PredictionError::EmptyContent);
        }

        let label = self
            .pipeline
            .predict(&[processed.as_str()])?
            .pop()
            .ok_or(PredictionError::EmptyContent)?;
        self.metrics.record_label(label);

        let prediction = Prediction::new(label, &processed);
        tracing::info!(
            label = %prediction.label,
            text_length = prediction.text_length,
            "Document classified"
        );
        Ok(prediction)
    }

    /// Return the current prediction metrics snapshot.
    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Describe the loaded model.
    pub fn model_summary(&self) -> ModelSummary {
        let model = self.pipeline.model();
        ModelSummary {
            vectorizer: model.vectorizer.kind_name(),
            classifier: model.classifier.kind_name(),
            features: model.vectorizer.n_features(),
        }
    }
}

#[async_trait]
impl PredictionApi for PredictionService {
    async fn classify_document(&self, document: Bytes) -> Result<Prediction, PredictionError> {
        let span = tracing::info_span!(
            "classify_document",
            request_id = %uuid::Uuid::new_v4(),
            bytes = document.len(),
            sha256 = %document_digest(&document),
        );
        let service = self.clone();
        let blocking_span = span.clone();
        tokio::task::spawn_blocking(move || {
            let _entered = blocking_span.enter();
            service.classify_bytes(&document)
        })
        .instrument(span)
        .await
        .map_err(|err| PredictionError::Worker(err.to_string()))?
    }

    fn metrics_snapshot(&self) -> MetricsSnapshot {
        PredictionService::metrics_snapshot(self)
    }

    fn model_summary(&self) -> ModelSummary {
        PredictionService::model_summary(self)
    }
}

/// First 16 hex characters of the SHA-256 of `document`, used to correlate log lines.
fn document_digest(document: &[u8]) -> String {
    let digest = Sha256::digest(document);
    hex::encode(&digest[..8])
}
