//! Error types for the docsort-core library.

use thiserror::Error;

/// Main error type for the docsort library.
#[derive(Error, Debug)]
pub enum DocsortError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// A numeric field that could not be read as an amount.
    #[error("amount error: {0}")]
    Parse(#[from] ParseError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON in a configuration or override file.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted with a non-empty password.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// The OCR fallback could not recognize the document.
    #[error("OCR fallback failed: {0}")]
    Ocr(String),
}

/// A numeric substring that does not read as a decimal after locale normalization.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("not a valid amount: {raw:?}")]
pub struct ParseError {
    /// The input as it was handed to the parser.
    pub raw: String,
}

impl ParseError {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }
}

/// Result type for the docsort library.
pub type Result<T> = std::result::Result<T, DocsortError>;
