//! Per-tab views over an ordered batch of documents.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use super::dedup::{DedupBy, DedupSet};
use super::tabs::TabRules;
use super::InvoiceExtractor;
use crate::models::document::{ExtractedInvoice, ManualOverrides, RawDocument, Tab};

/// A document and its persisted human layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchEntry {
    pub document: RawDocument,
    #[serde(default)]
    pub overrides: ManualOverrides,
}

impl BatchEntry {
    pub fn new(document: RawDocument) -> Self {
        Self {
            document,
            overrides: ManualOverrides::default(),
        }
    }

    pub fn with_overrides(mut self, overrides: ManualOverrides) -> Self {
        self.overrides = overrides;
        self
    }
}

/// Documents filed under one tab, in batch order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TabView {
    pub tab: Tab,
    pub invoices: Vec<ExtractedInvoice>,
    /// Later copies dropped by dedup.
    pub duplicates: usize,
}

impl TabView {
    fn new(tab: Tab) -> Self {
        Self {
            tab,
            invoices: Vec::new(),
            duplicates: 0,
        }
    }
}

/// Builds tab views. Records must be pushed in batch order for
/// first-occurrence-wins to hold.
#[derive(Debug, Clone)]
pub struct TabBatch {
    dedup_by: BTreeMap<Tab, DedupBy>,
    seen: DedupSet,
    views: BTreeMap<Tab, TabView>,
    hidden: usize,
}

impl TabBatch {
    pub fn new(rules: &TabRules) -> Self {
        Self::with_dedup(rules, DedupSet::new())
    }

    /// Continue from a dedup set carried over from an earlier run.
    pub fn with_dedup(rules: &TabRules, seen: DedupSet) -> Self {
        Self {
            dedup_by: rules.iter().map(|rule| (rule.tab, rule.dedup)).collect(),
            seen,
            views: BTreeMap::new(),
            hidden: 0,
        }
    }

    /// Extract every entry in order and push it.
    pub fn run<'a, E: InvoiceExtractor + ?Sized>(
        extractor: &E,
        rules: &TabRules,
        entries: impl IntoIterator<Item = &'a BatchEntry>,
    ) -> Self {
        let mut batch = Self::new(rules);
        for entry in entries {
            if entry.overrides.hidden {
                batch.push_hidden();
                continue;
            }
            let invoice = extractor.extract_with_overrides(&entry.document, &entry.overrides);
            batch.push(invoice);
        }
        batch
    }

    /// File one record. Returns `false` when it duplicates an earlier one.
    pub fn push(&mut self, invoice: ExtractedInvoice) -> bool {
        let by = self.dedup_by.get(&invoice.tab).copied().unwrap_or_default();
        let view = self
            .views
            .entry(invoice.tab)
            .or_insert_with(|| TabView::new(invoice.tab));

        if self.seen.admit(&invoice, by) {
            view.invoices.push(invoice);
            true
        } else {
            debug!(tab = %invoice.tab, filename = %invoice.source_filename, "dropping duplicate");
            view.duplicates += 1;
            false
        }
    }

    /// Count a document the reviewer hid.
    pub fn push_hidden(&mut self) {
        self.hidden += 1;
    }

    pub fn hidden(&self) -> usize {
        self.hidden
    }

    pub fn view(&self, tab: Tab) -> Option<&TabView> {
        self.views.get(&tab)
    }

    /// Views in tab order, unclassified last.
    pub fn views(&self) -> impl Iterator<Item = &TabView> {
        self.views.values()
    }

    pub fn dedup_set(&self) -> &DedupSet {
        &self.seen
    }

    pub fn into_parts(self) -> (Vec<TabView>, DedupSet) {
        (self.views.into_values().collect(), self.seen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::DocumentExtractor;
    use crate::models::document::Currency;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    fn entries() -> Vec<BatchEntry> {
        vec![
            BatchEntry::new(RawDocument::new("JTAPE order Total: 100,00", "jt-1.pdf")),
            BatchEntry::new(RawDocument::new("JTAPE order Total: 999,00", "jt-1.pdf")),
            BatchEntry::new(RawDocument::new("INVOICE No 5 DFW PROFESSIONAL", "a.pdf")),
            BatchEntry::new(RawDocument::new("INVOICE No 5 DFW PROFESSIONAL", "a-resent.pdf")),
            BatchEntry::new(RawDocument::new("JTAPE hidden copy", "jt-2.pdf"))
                .with_overrides(ManualOverrides::hidden()),
            BatchEntry::new(RawDocument::new("misc scan", "misc.pdf"))
                .with_overrides(ManualOverrides::assign(Tab::Contrast)),
        ]
    }

    #[test]
    fn test_first_occurrence_wins() {
        let rules = TabRules::default();
        let extractor = DocumentExtractor::new(rules.clone());
        let entries = entries();
        let batch = TabBatch::run(&extractor, &rules, &entries);

        let jtape = batch.view(Tab::Jtape).unwrap();
        assert_eq!(jtape.invoices.len(), 1);
        assert_eq!(jtape.invoices[0].amount, Some(Decimal::new(100, 0)));
        assert_eq!(jtape.duplicates, 1);

        let dfw = batch.view(Tab::Dfw).unwrap();
        assert_eq!(dfw.invoices.len(), 1);
        assert_eq!(dfw.invoices[0].source_filename, "a.pdf");

        let contrast = batch.view(Tab::Contrast).unwrap();
        assert!(contrast.invoices[0].manually_assigned);
        assert_eq!(contrast.invoices[0].currency, Currency::Ron);

        assert_eq!(batch.hidden(), 1);
        assert!(batch
            .views()
            .flat_map(|v| v.invoices.iter())
            .all(|inv| inv.source_filename != "jt-2.pdf"));
    }

    #[test]
    fn test_bodies_without_filename_are_not_duplicates() {
        let rules = TabRules::default();
        let extractor = DocumentExtractor::new(rules.clone());
        let entries = vec![
            BatchEntry::new(RawDocument::new("JTAPE order J12345 Total: 100,00", "")),
            BatchEntry::new(RawDocument::new("JTAPE order J67890 Total: 250,00", "")),
        ];
        let batch = TabBatch::run(&extractor, &rules, &entries);

        let jtape = batch.view(Tab::Jtape).unwrap();
        assert_eq!(jtape.duplicates, 0);
        let numbers: Vec<_> = jtape
            .invoices
            .iter()
            .map(|inv| inv.invoice_number.as_deref())
            .collect();
        assert_eq!(numbers, vec![Some("J12345"), Some("J67890")]);
    }

    #[test]
    fn test_reprocessing_is_stable() {
        let rules = TabRules::default();
        let extractor = DocumentExtractor::new(rules.clone());
        let entries = entries();

        let (first, _) = TabBatch::run(&extractor, &rules, &entries).into_parts();
        let (second, _) = TabBatch::run(&extractor, &rules, &entries).into_parts();
        assert_eq!(first, second);
    }

    #[test]
    fn test_carried_dedup_set() {
        let rules = TabRules::default();
        let extractor = DocumentExtractor::new(rules.clone());
        let entries = entries();

        let (_, seen) = TabBatch::run(&extractor, &rules, &entries[..1]).into_parts();
        let mut next = TabBatch::with_dedup(&rules, seen);
        let again = extractor.extract(&entries[1].document);
        assert!(!next.push(again));
    }
}
