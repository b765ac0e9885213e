//! Preprocessing + vectorize + classify pipeline over a loaded model artifact.

use super::normalize::normalize;
use super::reduce::DictionaryLemmatizer;
use super::tokenize::Tokenizer;
use super::types::{Label, ReduceMode};
use crate::model::{ModelArtifact, ModelError, ModelLoadError};
use std::path::Path;

/// Immutable text pipeline shared across requests.
///
/// Built once at startup from the model artifact; every method takes `&self`, so one instance
/// behind an `Arc` serves any number of concurrent callers.
pub struct SpamPipeline {
    tokenizer: Tokenizer,
    reduce_mode: ReduceMode,
    model: ModelArtifact,
}

impl SpamPipeline {
    /// Pipeline over an already-validated artifact, stemming tokens.
    pub fn new(model: ModelArtifact) -> Self {
        Self {
            tokenizer: Tokenizer::default(),
            reduce_mode: ReduceMode::Stem,
            model,
        }
    }

    /// Load the artifact at `path`. Failures are fatal for the caller.
    pub fn load(path: &Path) -> Result<Self, ModelLoadError> {
        let model = ModelArtifact::load(path)?;
        tracing::info!(
            path = %path.display(),
            vectorizer = model.vectorizer.kind_name(),
            classifier = model.classifier.kind_name(),
            features = model.vectorizer.n_features(),
            "Loaded spam model"
        );
        Ok(Self::new(model))
    }

    /// Switch the token reduction strategy.
    pub fn with_reduce_mode(mut self, mode: ReduceMode) -> Self {
        self.reduce_mode = mode;
        self
    }

    /// Replace the lemmatizer used when reducing in [`ReduceMode::Lemmatize`].
    pub fn with_lemmatizer(mut self, lemmatizer: DictionaryLemmatizer) -> Self {
        self.tokenizer = Tokenizer::new(lemmatizer);
        self
    }

    /// Active token reduction strategy.
    pub fn reduce_mode(&self) -> ReduceMode {
        self.reduce_mode
    }

    /// Loaded model artifact.
    pub fn model(&self) -> &ModelArtifact {
        &self.model
    }

    /// Normalize, tokenize, and re-join each text. Output order and length match the input.
    pub fn preprocess<S: AsRef<str>>(&self, texts: &[S]) -> Vec<String> {
        texts
            .iter()
            .map(|text| {
                self.tokenizer
                    .tokenize(&normalize(text.as_ref()), self.reduce_mode)
                    .join(" ")
            })
            .collect()
    }

    /// Preprocess, vectorize, and classify each text, returning one label per input.
    pub fn predict<S: AsRef<str>>(&self, texts: &[S]) -> Result<Vec<Label>, ModelError> {
        self.preprocess(texts)
            .iter()
            .map(|processed| self.model.predict_one(processed))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODEL: &str = r#"{
        "format_version": 1,
        "vectorizer": {
            "kind": "tfidf",
            "vocabulary": { "win": 0, "free": 1, "meet": 2, "report": 3 },
            "idf": [1.0, 1.0, 1.0, 1.0],
            "norm": "l2"
        },
        "classifier": {
            "kind": "linear",
            "classes": [0, 1],
            "coef": [2.0, 2.0, -2.0, -2.0],
            "intercept": -0.1
        }
    }"#;

    fn pipeline() -> SpamPipeline {
        SpamPipeline::new(ModelArtifact::from_json(MODEL).expect("model"))
    }

    #[test]
    fn preprocess_keeps_order_and_length() {
        let texts = ["  Winning\nFREE offers!! ", "", "Meeting   reports attached."];
        let processed = pipeline().preprocess(&texts);
        assert_eq!(processed, vec!["win free offer", "", "meet report attach"]);
    }

    #[test]
    fn predict_returns_label_per_input() {
        let labels = pipeline()
            .predict(&["You WIN a free cruise", "Meeting report for Q3", ""])
            .expect("labels");
        assert_eq!(labels, vec![Label::Spam, Label::Ham, Label::Ham]);
    }

    #[test]
    fn lemmatize_mode_changes_reduction() {
        let pipeline = pipeline().with_reduce_mode(ReduceMode::Lemmatize);
        assert_eq!(pipeline.reduce_mode(), ReduceMode::Lemmatize);
        assert_eq!(pipeline.preprocess(&["Children's meetings"]), vec![
            "child meeting"
        ]);
    }
}
