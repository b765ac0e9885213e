//! Document classification pipeline: normalization, tokenization, and model orchestration.

pub mod normalize;
mod pipeline;
pub mod reduce;
mod service;
pub mod tokenize;
pub mod types;

pub use normalize::normalize;
pub use pipeline::SpamPipeline;
pub use reduce::{DictionaryLemmatizer, Reducer, SnowballStemmer};
pub use service::{ModelSummary, PredictionApi, PredictionService};
pub use tokenize::{Tokenizer, tokenize_with};
pub use types::{
    ELLIPSIS, Label, PREVIEW_CHARS, Prediction, PredictionError, PredictionResult, ReduceMode,
    build_preview,
};
