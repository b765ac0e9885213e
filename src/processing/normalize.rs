//! Whitespace normalization for extracted page text.

/// Collapse every run of whitespace into a single space and trim both ends.
///
/// Total over all inputs: the empty string and whitespace-only strings normalize to `""`.
pub fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
