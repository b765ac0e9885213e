//! Core data types and error definitions for the prediction pipeline.

use crate::extraction::ExtractionError;
use crate::model::ModelError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of characters of processed text echoed back in a preview.
pub const PREVIEW_CHARS: usize = 200;
/// Marker appended to a preview when the processed text was truncated.
pub const ELLIPSIS: &str = "...";

/// Strategy used to reduce tokens to a canonical form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReduceMode {
    /// Rule-based suffix stripping.
    #[default]
    Stem,
    /// Dictionary-based base-form lookup.
    Lemmatize,
}

impl std::str::FromStr for ReduceMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "stem" => Ok(Self::Stem),
            "lemmatize" | "lemma" => Ok(Self::Lemmatize),
            _ => Err(()),
        }
    }
}

/// Binary classification outcome with a fixed integer correspondence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Label {
    /// Legitimate content, class `0`.
    Ham = 0,
    /// Spam content, class `1`.
    Spam = 1,
}

impl Label {
    /// Integer class value used by the classifier.
    pub const fn as_class(self) -> u8 {
        self as u8
    }

    /// Upper-case display name (`HAM` / `SPAM`).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ham => "HAM",
            Self::Spam => "SPAM",
        }
    }
}

impl TryFrom<i64> for Label {
    type Error = i64;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Ham),
            1 => Ok(Self::Spam),
            other => Err(other),
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Successful classification of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    /// Integer class (`0` ham, `1` spam).
    pub prediction: u8,
    /// Label matching `prediction`.
    pub label: Label,
    /// Character length of the processed text.
    pub text_length: usize,
    /// First characters of the processed text, ellipsized when truncated.
    pub preview: String,
}

impl Prediction {
    /// Build a prediction record for `processed` text classified as `label`.
    pub fn new(label: Label, processed: &str) -> Self {
        Self {
            prediction: label.as_class(),
            label,
            text_length: processed.chars().count(),
            preview: build_preview(processed),
        }
    }
}

/// First [`PREVIEW_CHARS`] characters of `processed`, with [`ELLIPSIS`] iff truncated.
pub fn build_preview(processed: &str) -> String {
    let mut chars = processed.chars();
    let mut preview: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        preview.push_str(ELLIPSIS);
    }
    preview
}

/// Result record handed to callers: exactly one of the success or error shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PredictionResult {
    /// Classification completed.
    Success(Prediction),
    /// Classification could not be performed.
    Failure {
        /// Human-readable reason.
        error: String,
    },
}

impl PredictionResult {
    /// Build the error shape from any displayable reason.
    pub fn failure(reason: impl std::fmt::Display) -> Self {
        Self::Failure {
            error: reason.to_string(),
        }
    }
}

impl From<Result<Prediction, PredictionError>> for PredictionResult {
    fn from(result: Result<Prediction, PredictionError>) -> Self {
        match result {
            Ok(prediction) => Self::Success(prediction),
            Err(error) => Self::failure(error),
        }
    }
}

/// Errors emitted while classifying a single document.
#[derive(Debug, Error)]
pub enum PredictionError {
    /// The first page could not be read from the upload.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    /// The first page held no text that survived preprocessing.
    #[error("No valid text extracted from PDF")]
    EmptyContent,
    /// The loaded model rejected the processed text.
    #[error("Classification failed: {0}")]
    Model(#[from] ModelError),
    /// The blocking worker running the classification did not complete.
    #[error("Prediction worker failed: {0}")]
    Worker(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_keeps_integer_correspondence() {
        assert_eq!(Label::Ham.as_class(), 0);
        assert_eq!(Label::Spam.as_class(), 1);
        assert_eq!(Label::try_from(1), Ok(Label::Spam));
        assert_eq!(Label::try_from(0), Ok(Label::Ham));
        assert_eq!(Label::try_from(7), Err(7));
    }

    #[test]
    fn preview_is_untouched_up_to_limit() {
        let text = "a".repeat(PREVIEW_CHARS);
        assert_eq!(build_preview(&text), text);
        assert_eq!(build_preview(""), "");
    }

    #[test]
    fn preview_is_ellipsized_past_limit() {
        let text = "é".repeat(PREVIEW_CHARS + 1);
        let preview = build_preview(&text);
        assert!(preview.ends_with(ELLIPSIS));
        assert_eq!(preview.chars().count(), PREVIEW_CHARS + ELLIPSIS.len());
    }

    #[test]
    fn text_length_counts_characters() {
        let prediction = Prediction::new(Label::Ham, "café menu");
        assert_eq!(prediction.text_length, 9);
        assert_eq!(prediction.prediction, 0);
    }

    #[test]
    fn serializes_both_shapes() {
        let success = PredictionResult::Success(Prediction::new(Label::Spam, "buy now"));
        let value = serde_json::to_value(&success).expect("json");
        assert_eq!(
            value,
            serde_json::json!({
                "prediction": 1,
                "label": "SPAM",
                "text_length": 7,
                "preview": "buy now"
            })
        );

        let failure = PredictionResult::from(Err(PredictionError::EmptyContent));
        let value = serde_json::to_value(&failure).expect("json");
        assert_eq!(
            value,
            serde_json::json!({ "error": "No valid text extracted from PDF" })
        );
    }

    #[test]
    fn reduce_mode_parses_case_insensitively() {
        assert_eq!("STEM".parse::<ReduceMode>(), Ok(ReduceMode::Stem));
        assert_eq!("lemma".parse::<ReduceMode>(), Ok(ReduceMode::Lemmatize));
        assert!("snip".parse::<ReduceMode>().is_err());
    }
}
