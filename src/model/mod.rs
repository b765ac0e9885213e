//! Serialized vectorizer + classifier artifact.
//!
//! The artifact is a JSON document produced offline by the training tooling:
//!
//! ```json
//! {
//!   "format_version": 1,
//!   "vectorizer": { "kind": "count", "vocabulary": { "buy": 0, "free": 1 } },
//!   "classifier": {
//!     "kind": "multinomial_nb",
//!     "classes": [0, 1],
//!     "class_log_prior": [-0.69, -0.69],
//!     "feature_log_prob": [[-2.3, -2.3], [-0.1, -0.1]]
//!   }
//! }
//! ```
//!
//! It is loaded once at startup and never mutated. Any defect in it is fatal.

mod classifier;
mod vectorizer;

pub use classifier::Classifier;
pub use vectorizer::{Norm, TextVectorizer, VectorizerKind};

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Artifact layout version understood by this build.
pub const SUPPORTED_FORMAT_VERSION: u32 = 1;

/// Errors raised while loading the model artifact. All of them abort startup.
#[derive(Debug, Error)]
pub enum ModelLoadError {
    /// The artifact file could not be read.
    #[error("failed to read model artifact {path}: {source}")]
    Io {
        /// Location that was read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The artifact is not valid JSON for the expected layout.
    #[error("failed to parse model artifact: {0}")]
    Parse(#[from] serde_json::Error),
    /// The artifact was written for a different layout version.
    #[error(
        "unsupported model format version {found} (expected {})",
        SUPPORTED_FORMAT_VERSION
    )]
    UnsupportedVersion {
        /// Version recorded in the artifact.
        found: u32,
    },
    /// The artifact parsed but its parts disagree with each other.
    #[error("invalid model artifact: {0}")]
    Invalid(String),
}

/// Errors raised while scoring a document with a loaded model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// Feature vector width disagrees with the classifier.
    #[error("feature dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Width the classifier was fitted on.
        expected: usize,
        /// Width of the supplied vector.
        actual: usize,
    },
    /// The classifier produced a class with no label.
    #[error("classifier produced unknown class {0}")]
    UnknownClass(i64),
}

/// Sparse numeric representation of a document.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    /// Total number of features (vocabulary size).
    pub dimension: usize,
    /// Non-zero `(feature index, weight)` pairs sorted by index.
    pub entries: Vec<(usize, f64)>,
}

impl FeatureVector {
    /// Dot product against a dense weight row.
    pub fn dot(&self, weights: &[f64]) -> f64 {
        self.entries
            .iter()
            .filter_map(|&(index, value)| weights.get(index).map(|weight| weight * value))
            .sum()
    }
}

/// Fitted vectorizer and classifier pair.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelArtifact {
    /// Layout version, see [`SUPPORTED_FORMAT_VERSION`].
    pub format_version: u32,
    /// Text → feature vector transform.
    pub vectorizer: TextVectorizer,
    /// Feature vector → label model.
    pub classifier: Classifier,
}

impl ModelArtifact {
    /// Read, parse, and validate an artifact from disk.
    pub fn load(path: &Path) -> Result<Self, ModelLoadError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ModelLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }

    /// Parse and validate an artifact from its JSON text.
    pub fn from_json(contents: &str) -> Result<Self, ModelLoadError> {
        let artifact: Self = serde_json::from_str(contents)?;
        artifact.validate()?;
        Ok(artifact)
    }

    /// Check version and cross-component dimensions.
    pub fn validate(&self) -> Result<(), ModelLoadError> {
        if self.format_version != SUPPORTED_FORMAT_VERSION {
            return Err(ModelLoadError::UnsupportedVersion {
                found: self.format_version,
            });
        }
        self.vectorizer.validate()?;
        self.classifier.validate(self.vectorizer.n_features())
    }

    /// Vectorize and classify one preprocessed document.
    pub fn predict_one(&self, document: &str) -> Result<crate::processing::Label, ModelError> {
        let features = self.vectorizer.transform(document);
        self.classifier.predict(&features)
    }
}
