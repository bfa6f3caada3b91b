//! PDF text source.

mod extractor;

pub use extractor::PdfTextSource;

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Recognizes text in a PDF with no text layer. No engine ships with this
/// crate; callers plug one in.
pub trait OcrFallback: Send + Sync {
    fn recognize(&self, pdf: &[u8]) -> Result<String>;
}

/// Text pulled from a PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfText {
    pub text: String,
    /// Pages in the file, not pages read.
    pub pages: usize,
    pub used_ocr: bool,
}

impl PdfText {
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}
