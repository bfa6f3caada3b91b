//! Per-tab de-duplication.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::models::document::{ExtractedInvoice, Tab};

/// What identifies a document within a tab.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupBy {
    #[default]
    Filename,
    /// Catches one invoice re-sent under different filenames.
    InvoiceNumber,
}

impl DedupBy {
    /// Key for `invoice`. Records without a number fall back to their filename.
    /// `None` when neither is present, e.g. a document built from a mail body.
    pub fn key(&self, invoice: &ExtractedInvoice) -> Option<String> {
        match (self, invoice.invoice_number.as_deref()) {
            (DedupBy::InvoiceNumber, Some(number)) if !number.is_empty() => Some(format!("#{number}")),
            _ if invoice.source_filename.is_empty() => None,
            _ => Some(invoice.source_filename.clone()),
        }
    }
}

/// Keys already admitted, owned by the caller and threaded across a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DedupSet {
    seen: BTreeSet<(Tab, String)>,
}

impl DedupSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `invoice` in its tab. Returns `false` when an earlier record had the same key.
    /// Records without a key are always admitted.
    pub fn admit(&mut self, invoice: &ExtractedInvoice, by: DedupBy) -> bool {
        match by.key(invoice) {
            Some(key) => self.seen.insert((invoice.tab, key)),
            None => true,
        }
    }

    pub fn contains(&self, invoice: &ExtractedInvoice, by: DedupBy) -> bool {
        by.key(invoice)
            .is_some_and(|key| self.seen.contains(&(invoice.tab, key)))
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    pub fn clear(&mut self) {
        self.seen.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invoice(tab: Tab, filename: &str, number: Option<&str>) -> ExtractedInvoice {
        let mut inv = ExtractedInvoice::empty(filename);
        inv.tab = tab;
        inv.invoice_number = number.map(str::to_string);
        inv
    }

    #[test]
    fn test_filename_key_is_per_tab() {
        let mut seen = DedupSet::new();
        assert!(seen.admit(&invoice(Tab::Jtape, "a.pdf", None), DedupBy::Filename));
        assert!(!seen.admit(&invoice(Tab::Jtape, "a.pdf", Some("9")), DedupBy::Filename));
        assert!(seen.admit(&invoice(Tab::Amba, "a.pdf", None), DedupBy::Filename));
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn test_invoice_number_key() {
        let mut seen = DedupSet::new();
        assert!(seen.admit(&invoice(Tab::Dfw, "first.pdf", Some("63")), DedupBy::InvoiceNumber));
        assert!(!seen.admit(&invoice(Tab::Dfw, "resent.pdf", Some("63")), DedupBy::InvoiceNumber));
        assert!(seen.admit(&invoice(Tab::Dfw, "63", None), DedupBy::InvoiceNumber));
        assert!(seen.contains(&invoice(Tab::Dfw, "x.pdf", Some("63")), DedupBy::InvoiceNumber));
    }

    #[test]
    fn test_keyless_records_always_admitted() {
        let mut seen = DedupSet::new();
        assert!(seen.admit(&invoice(Tab::Jtape, "", None), DedupBy::Filename));
        assert!(seen.admit(&invoice(Tab::Jtape, "", Some("J1")), DedupBy::Filename));
        assert!(seen.admit(&invoice(Tab::Dfw, "", None), DedupBy::InvoiceNumber));
        assert!(!seen.contains(&invoice(Tab::Jtape, "", None), DedupBy::Filename));
        assert!(seen.is_empty());

        assert!(seen.admit(&invoice(Tab::Dfw, "", Some("8")), DedupBy::InvoiceNumber));
        assert!(!seen.admit(&invoice(Tab::Dfw, "", Some("8")), DedupBy::InvoiceNumber));
    }

    #[test]
    fn test_set_survives_serde() {
        let mut seen = DedupSet::new();
        seen.admit(&invoice(Tab::Supplier, "ΤΙΜ1.pdf", Some("ΤΙΜ1")), DedupBy::InvoiceNumber);

        let json = serde_json::to_string(&seen).unwrap();
        let mut back: DedupSet = serde_json::from_str(&json).unwrap();
        assert!(!back.admit(&invoice(Tab::Supplier, "copy.pdf", Some("ΤΙΜ1")), DedupBy::InvoiceNumber));
    }
}
