//! PDF text extraction using lopdf and pdf-extract.

use lopdf::Document;
use std::path::Path;
use tracing::{debug, trace};

use super::{OcrFallback, PdfText, Result};
use crate::error::PdfError;

/// A loaded PDF, decrypted when it only carries an empty password.
pub struct PdfTextSource {
    document: Document,
    raw_data: Vec<u8>,
    max_pages: usize,
}

impl PdfTextSource {
    pub const DEFAULT_MAX_PAGES: usize = 3;

    /// Load a PDF from bytes.
    pub fn load(data: &[u8]) -> Result<Self> {
        let mut document = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        let raw_data = if document.is_encrypted() {
            if document.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            // pdf-extract reads bytes, so hand it the decrypted copy
            let mut decrypted = Vec::new();
            document
                .save_to(&mut decrypted)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            decrypted
        } else {
            data.to_vec()
        };

        let page_count = document.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }
        debug!("Loaded PDF with {} pages", page_count);

        Ok(Self {
            document,
            raw_data,
            max_pages: Self::DEFAULT_MAX_PAGES,
        })
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read(path.as_ref())
            .map_err(|e| PdfError::Parse(format!("{}: {}", path.as_ref().display(), e)))?;
        Self::load(&data)
    }

    /// Read at most `max_pages` pages. Zero reads them all.
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    fn pages_to_read(&self) -> usize {
        let count = self.page_count();
        if self.max_pages == 0 {
            count
        } else {
            count.min(self.max_pages)
        }
    }

    /// Text of the leading pages via pdf-extract.
    ///
    /// pdf-extract has no page API, so the page cut is approximated by
    /// splitting its output into equal line spans.
    fn pdf_extract_text(&self) -> Result<String> {
        let full_text = pdf_extract::extract_text_from_mem(&self.raw_data)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))?;

        let count = self.page_count();
        let reading = self.pages_to_read();
        if reading >= count {
            return Ok(full_text);
        }

        let lines: Vec<&str> = full_text.lines().collect();
        let end = lines.len() * reading / count;
        Ok(lines[..end].join("\n"))
    }

    /// Text of the leading pages via lopdf's own text operator walk.
    fn lopdf_text(&self) -> Result<String> {
        let pages: Vec<u32> = self
            .document
            .get_pages()
            .keys()
            .take(self.pages_to_read())
            .copied()
            .collect();
        self.document
            .extract_text(&pages)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))
    }

    /// Text layer of the leading pages. Empty when the file has none.
    pub fn text(&self) -> String {
        match self.pdf_extract_text() {
            Ok(text) if !text.trim().is_empty() => return text,
            Ok(_) => trace!("pdf-extract found no text"),
            Err(e) => debug!("pdf-extract failed: {}", e),
        }
        match self.lopdf_text() {
            Ok(text) => text,
            Err(e) => {
                debug!("lopdf text extraction failed: {}", e);
                String::new()
            }
        }
    }

    /// Text layer, or the OCR fallback's output when the layer is blank.
    pub fn extract(&self, ocr: Option<&dyn OcrFallback>) -> Result<PdfText> {
        let text = self.text();
        let pages = self.page_count();
        if !text.trim().is_empty() {
            return Ok(PdfText {
                text,
                pages,
                used_ocr: false,
            });
        }

        match ocr {
            Some(engine) => {
                debug!("No text layer, running OCR fallback");
                let text = engine.recognize(&self.raw_data)?;
                Ok(PdfText {
                    text,
                    pages,
                    used_ocr: true,
                })
            }
            None => Ok(PdfText {
                text,
                pages,
                used_ocr: false,
            }),
        }
    }
}
