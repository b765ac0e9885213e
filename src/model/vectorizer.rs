//! Fitted text vectorizers (term counts and TF-IDF).

use super::{FeatureVector, ModelLoadError};
use regex::Regex;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::LazyLock;

static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("token pattern must compile"));

/// Weighting scheme applied to raw term counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VectorizerKind {
    /// Raw (or binary) term counts.
    Count,
    /// Term counts scaled by inverse document frequency.
    Tfidf,
}

/// Row normalization applied after weighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    /// Scale to unit Euclidean length.
    L2,
    /// Scale so absolute weights sum to one.
    L1,
}

/// Vocabulary-based vectorizer fitted offline.
#[derive(Debug, Clone, Deserialize)]
pub struct TextVectorizer {
    /// Weighting scheme.
    pub kind: VectorizerKind,
    /// Term → feature index.
    pub vocabulary: HashMap<String, usize>,
    /// Inclusive n-gram lengths used when the vocabulary was fitted.
    #[serde(default = "unigrams")]
    pub ngram_range: (usize, usize),
    /// Clamp every non-zero count to one.
    #[serde(default)]
    pub binary: bool,
    /// Per-feature inverse document frequency, TF-IDF only.
    #[serde(default)]
    pub idf: Option<Vec<f64>>,
    /// Replace `tf` with `1 + ln(tf)`, TF-IDF only.
    #[serde(default)]
    pub sublinear_tf: bool,
    /// Optional row normalization.
    #[serde(default)]
    pub norm: Option<Norm>,
}

fn unigrams() -> (usize, usize) {
    (1, 1)
}

impl TextVectorizer {
    /// Number of features produced per document.
    pub fn n_features(&self) -> usize {
        self.vocabulary.len()
    }

    /// Short identifier for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            VectorizerKind::Count => "count",
            VectorizerKind::Tfidf => "tfidf",
        }
    }

    /// Check internal consistency of the fitted state.
    pub fn validate(&self) -> Result<(), ModelLoadError> {
        let n_features = self.n_features();
        if n_features == 0 {
            return Err(ModelLoadError::Invalid("vectorizer vocabulary is empty".into()));
        }
        let mut seen = HashSet::with_capacity(n_features);
        for (term, &index) in &self.vocabulary {
            if index >= n_features || !seen.insert(index) {
                return Err(ModelLoadError::Invalid(format!(
                    "vocabulary index {index} for term '{term}' is out of range or duplicated"
                )));
            }
        }
        let (min_n, max_n) = self.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(ModelLoadError::Invalid(format!(
                "invalid ngram_range ({min_n}, {max_n})"
            )));
        }
        match (self.kind, &self.idf) {
            (VectorizerKind::Tfidf, None) => Err(ModelLoadError::Invalid(
                "tfidf vectorizer is missing idf weights".into(),
            )),
            (VectorizerKind::Tfidf, Some(idf)) if idf.len() != n_features => {
                Err(ModelLoadError::Invalid(format!(
                    "idf has {} weights for {n_features} features",
                    idf.len()
                )))
            }
            _ => Ok(()),
        }
    }

    /// Map preprocessed text to a sparse feature vector.
    pub fn transform(&self, document: &str) -> FeatureVector {
        let lowered = document.to_lowercase();
        let words: Vec<&str> = TOKEN_PATTERN
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .collect();

        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        let (min_n, max_n) = self.ngram_range;
        for n in min_n..=max_n {
            for window in words.windows(n) {
                let term = window.join(" ");
                if let Some(&index) = self.vocabulary.get(&term) {
                    *counts.entry(index).or_default() += 1.0;
                }
            }
        }

        let mut entries: Vec<(usize, f64)> = counts.into_iter().collect();
        if self.binary {
            entries.iter_mut().for_each(|(_, value)| *value = 1.0);
        }
        if let (VectorizerKind::Tfidf, Some(idf)) = (self.kind, &self.idf) {
            for (index, value) in entries.iter_mut() {
                if self.sublinear_tf {
                    *value = 1.0 + value.ln();
                }
                *value *= idf[*index];
            }
        }
        match self.norm {
            Some(Norm::L2) => scale(&mut entries, |values| {
                values.iter().map(|v| v * v).sum::<f64>().sqrt()
            }),
            Some(Norm::L1) => scale(&mut entries, |values| {
                values.iter().map(|v| v.abs()).sum::<f64>()
            }),
            None => {}
        }

        FeatureVector {
            dimension: self.n_features(),
            entries,
        }
    }
}

fn scale<F>(entries: &mut [(usize, f64)], norm: F)
where
    F: Fn(&[f64]) -> f64,
{
    let values: Vec<f64> = entries.iter().map(|(_, v)| *v).collect();
    let denominator = norm(&values);
    if denominator > 0.0 {
        entries.iter_mut().for_each(|(_, v)| *v /= denominator);
    }
}
