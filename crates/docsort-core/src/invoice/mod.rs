//! Invoice document classification and field extraction.

mod batch;
mod dedup;
mod extractor;
pub mod rules;
pub mod tabs;

pub use batch::{BatchEntry, TabBatch, TabView};
pub use dedup::{DedupBy, DedupSet};
pub use extractor::DocumentExtractor;
pub use tabs::{Marker, MarkerScope, NumberRange, TabRule, TabRules};

use crate::models::document::{ExtractedInvoice, ManualOverrides, RawDocument, Tab};

/// Trait for invoice field extractors.
pub trait InvoiceExtractor {
    /// Classify a document into a tab and extract its fields.
    fn extract(&self, doc: &RawDocument) -> ExtractedInvoice;

    /// Extract fields using a given tab's rules, skipping classification.
    fn extract_as(&self, doc: &RawDocument, tab: Tab) -> ExtractedInvoice;

    /// Extract with the reviewer's overrides applied. An assigned tab replaces
    /// classification; edited fields replace extracted ones.
    fn extract_with_overrides(
        &self,
        doc: &RawDocument,
        overrides: &ManualOverrides,
    ) -> ExtractedInvoice {
        let mut invoice = match overrides.assigned_tab {
            Some(tab) => {
                let mut invoice = self.extract_as(doc, tab);
                invoice.manually_assigned = true;
                invoice
            }
            None => self.extract(doc),
        };
        overrides.apply(&mut invoice);
        invoice
    }
}
