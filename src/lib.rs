#![deny(missing_docs)]

//! Core library for the PDF spam detector.

/// HTTP routing and REST handlers.
pub mod api;
/// HTTP client for the prediction endpoint.
pub mod client;
/// Environment-driven configuration management.
pub mod config;
/// PDF first-page text extraction.
pub mod extraction;
/// Structured logging and tracing setup.
pub mod logging;
/// Prediction metrics helpers.
pub mod metrics;
/// Serialized vectorizer and classifier artifact.
pub mod model;
/// Text preprocessing and prediction pipeline.
pub mod processing;
