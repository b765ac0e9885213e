//! Fitted classifiers mapping feature vectors to labels.

use super::{FeatureVector, ModelError, ModelLoadError};
use crate::processing::Label;
use serde::Deserialize;

/// Classifier state restored from the model artifact.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Classifier {
    /// Multinomial naive Bayes.
    MultinomialNb {
        /// Class values in column order.
        classes: Vec<i64>,
        /// Log prior per class.
        class_log_prior: Vec<f64>,
        /// Log likelihood per class (rows) and feature (columns).
        feature_log_prob: Vec<Vec<f64>>,
    },
    /// Binary linear decision function (logistic regression, linear SVM).
    Linear {
        /// Negative and positive class values.
        classes: Vec<i64>,
        /// Weight per feature.
        coef: Vec<f64>,
        /// Bias term.
        intercept: f64,
    },
}

impl Classifier {
    /// Short identifier for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::MultinomialNb { .. } => "multinomial_nb",
            Self::Linear { .. } => "linear",
        }
    }

    fn classes(&self) -> &[i64] {
        match self {
            Self::MultinomialNb { classes, .. } | Self::Linear { classes, .. } => classes,
        }
    }

    /// Check that every dimension agrees with `n_features` and every class maps to a label.
    pub fn validate(&self, n_features: usize) -> Result<(), ModelLoadError> {
        let classes = self.classes();
        if classes.len() < 2 {
            return Err(ModelLoadError::Invalid(format!(
                "classifier needs at least two classes, found {}",
                classes.len()
            )));
        }
        if let Some(&unknown) = classes.iter().find(|&&class| Label::try_from(class).is_err()) {
            return Err(ModelLoadError::Invalid(format!(
                "class value {unknown} has no label (expected 0 or 1)"
            )));
        }

        match self {
            Self::MultinomialNb {
                classes,
                class_log_prior,
                feature_log_prob,
            } => {
                if class_log_prior.len() != classes.len() || feature_log_prob.len() != classes.len()
                {
                    return Err(ModelLoadError::Invalid(
                        "naive Bayes priors and likelihoods must have one row per class".into(),
                    ));
                }
                if let Some(row) = feature_log_prob.iter().find(|row| row.len() != n_features) {
                    return Err(ModelLoadError::Invalid(format!(
                        "naive Bayes likelihood row has {} columns for {n_features} features",
                        row.len()
                    )));
                }
            }
            Self::Linear { classes, coef, .. } => {
                if classes.len() != 2 {
                    return Err(ModelLoadError::Invalid(
                        "linear classifier must be binary".into(),
                    ));
                }
                if coef.len() != n_features {
                    return Err(ModelLoadError::Invalid(format!(
                        "linear classifier has {} weights for {n_features} features",
                        coef.len()
                    )));
                }
            }
        }
        Ok(())
    }

    /// Predict the label of a single feature vector.
    pub fn predict(&self, features: &FeatureVector) -> Result<Label, ModelError> {
        let class = match self {
            Self::MultinomialNb {
                classes,
                class_log_prior,
                feature_log_prob,
            } => {
                check_dimension(feature_log_prob.first().map_or(0, Vec::len), features)?;
                let mut best = 0;
                let mut best_score = f64::NEG_INFINITY;
                for (class_index, (prior, row)) in
                    class_log_prior.iter().zip(feature_log_prob).enumerate()
                {
                    let score = prior + features.dot(row);
                    if score > best_score {
                        best = class_index;
                        best_score = score;
                    }
                }
                classes[best]
            }
            Self::Linear {
                classes,
                coef,
                intercept,
            } => {
                check_dimension(coef.len(), features)?;
                let score = intercept + features.dot(coef);
                if score > 0.0 { classes[1] } else { classes[0] }
            }
        };
        Label::try_from(class).map_err(ModelError::UnknownClass)
    }
}

fn check_dimension(expected: usize, features: &FeatureVector) -> Result<(), ModelError> {
    if features.dimension == expected {
        Ok(())
    } else {
        Err(ModelError::DimensionMismatch {
            expected,
            actual: features.dimension,
        })
    }
}
