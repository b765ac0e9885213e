//! First-page text extraction from PDF documents.

use lopdf::Document;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use thiserror::Error;

/// Errors raised while reading text from a PDF.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The upload carried no bytes at all.
    #[error("Failed to read PDF: document is empty")]
    EmptyInput,
    /// The file on disk could not be read.
    #[error("Failed to read PDF: {0}")]
    Io(#[from] std::io::Error),
    /// The bytes are not a parseable PDF.
    #[error("Failed to read PDF: {0}")]
    Parse(String),
    /// The document parsed but has no pages.
    #[error("Failed to read PDF: document has no pages")]
    NoPages,
    /// The first page exists but its text could not be decoded.
    #[error("Failed to read PDF: {0}")]
    Page(String),
}

/// Interface implemented by PDF text backends.
pub trait PdfTextExtractor: Send + Sync {
    /// Return the text of the first page of `document`. Pages without a text layer yield `""`.
    fn first_page_text(&self, document: &[u8]) -> Result<String, ExtractionError>;

    /// Read `path` and return the text of its first page.
    fn first_page_text_from_path(&self, path: &Path) -> Result<String, ExtractionError> {
        let bytes = std::fs::read(path)?;
        self.first_page_text(&bytes)
    }
}

/// Extractor backed by `lopdf`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfExtractor;

impl LopdfExtractor {
    /// Construct the extractor.
    pub const fn new() -> Self {
        Self
    }
}

impl PdfTextExtractor for LopdfExtractor {
    fn first_page_text(&self, document: &[u8]) -> Result<String, ExtractionError> {
        if document.is_empty() {
            return Err(ExtractionError::EmptyInput);
        }

        // lopdf can panic on some malformed inputs instead of returning an error.
        match panic::catch_unwind(AssertUnwindSafe(|| read_first_page(document))) {
            Ok(result) => result,
            Err(_) => Err(ExtractionError::Parse(
                "PDF parser panicked (malformed document)".into(),
            )),
        }
    }
}

fn read_first_page(document: &[u8]) -> Result<String, ExtractionError> {
    let doc = Document::load_mem(document).map_err(|err| ExtractionError::Parse(err.to_string()))?;
    let pages = doc.get_pages();
    let Some(&first) = pages.keys().next() else {
        return Err(ExtractionError::NoPages);
    };
    tracing::debug!(page_count = pages.len(), first_page = first, "Parsed PDF");
    doc.extract_text(&[first])
        .map_err(|err| ExtractionError::Page(err.to_string()))
}
