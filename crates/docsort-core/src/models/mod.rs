//! Data models for documents, extracted invoices, sender entities and configuration.

pub mod config;
pub mod document;
pub mod entity;

pub use config::{DocsortConfig, ExtractionConfig};
pub use document::{
    Currency, DocumentKind, EditedAmount, ExtractedInvoice, ManualOverrides, RawDocument, Tab,
};
pub use entity::{Category, CategoryOverrides, EntityRecord};
