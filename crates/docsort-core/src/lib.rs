//! Core library for back-office mail and invoice sorting.
//!
//! This crate provides:
//! - Locale-aware amount parsing and currency conversion
//! - Sender classification into business categories
//! - Invoice document classification into tabs, with per-tab field extraction
//! - Per-tab de-duplication and batch views
//! - Order and invoice mention scanning over mail messages
//! - PDF text extraction (feature `native`)

pub mod entity;
pub mod error;
pub mod invoice;
pub mod mail;
pub mod models;
#[cfg(feature = "native")]
pub mod pdf;
pub mod report;
pub mod text;

pub use entity::{Classification, EntityClassifier, EntityDirectory, EntityRules};
pub use error::{DocsortError, ParseError, PdfError, Result};
pub use invoice::{DedupBy, DedupSet, DocumentExtractor, InvoiceExtractor, TabBatch, TabRules};
pub use mail::MailMessage;
pub use models::config::DocsortConfig;
pub use models::document::{
    Currency, DocumentKind, EditedAmount, ExtractedInvoice, ManualOverrides, RawDocument, Tab,
};
pub use models::entity::{Category, CategoryOverrides, EntityRecord};
pub use text::{parse_locale_amount, to_search_text, AmountBounds, ExchangeRates};

#[cfg(feature = "native")]
pub use pdf::{OcrFallback, PdfText, PdfTextSource};
