//! Tab classification and field extraction over one document.

use tracing::{debug, trace};

use super::rules::patterns::FILENAME_PO_TOKEN;
use super::rules::{self, FieldContext};
use super::tabs::{TabRule, TabRules, UpperDocument};
use super::InvoiceExtractor;
use crate::models::config::ExtractionConfig;
use crate::models::document::{DocumentKind, ExtractedInvoice, RawDocument, Tab};

/// Rule-driven extractor. Holds immutable rule values only, so one instance
/// can serve any number of threads.
#[derive(Debug, Clone, Default)]
pub struct DocumentExtractor {
    tabs: TabRules,
    config: ExtractionConfig,
}

impl DocumentExtractor {
    pub fn new(tabs: TabRules) -> Self {
        Self {
            tabs,
            config: ExtractionConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ExtractionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn tabs(&self) -> &TabRules {
        &self.tabs
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Tab a document would be filed under automatically.
    pub fn classify(&self, doc: &RawDocument) -> Tab {
        self.extract(doc).tab
    }

    fn extract_fields(&self, tab: Tab, doc: &RawDocument, upper: &UpperDocument) -> ExtractedInvoice {
        let ctx = FieldContext::new(&doc.text, &doc.filename);
        let default_currency = self.tabs.currency_for(tab);

        let invoice_number = rules::extract_invoice_number(tab, &ctx)
            .map(|m| m.value)
            .or_else(|| {
                doc.known_invoice_number
                    .as_deref()
                    .map(str::trim)
                    .filter(|n| !n.is_empty())
                    .map(str::to_string)
            });

        let (amount, currency) = match doc.known_amount {
            Some(amount) => (Some(amount), doc.known_currency.unwrap_or(default_currency)),
            None => match rules::extract_total(tab, &ctx, &self.config.amount_bounds) {
                Some(found) => {
                    trace!(source = %found.source, amount = %found.amount, "total found");
                    (
                        Some(found.amount),
                        doc.known_currency.or(found.currency).unwrap_or(default_currency),
                    )
                }
                None => (None, doc.known_currency.unwrap_or(default_currency)),
            },
        };

        ExtractedInvoice {
            tab,
            invoice_number,
            invoice_date: rules::extract_date(tab, &ctx).map(|m| m.value),
            amount,
            currency,
            source_filename: doc.filename.clone(),
            recipient: rules::extract_recipient(&doc.text, self.config.recipient_max_len),
            vendor: rules::extract_vendor(&doc.text, self.config.vendor_max_len),
            kind: document_kind(upper),
            manually_assigned: false,
            amount_edited: false,
        }
    }

    /// Run one tab's rule. `None` when the tab rejects the document.
    fn try_tab(&self, rule: &TabRule, doc: &RawDocument, upper: &UpperDocument) -> Option<ExtractedInvoice> {
        if let Some(needle) = rule.excluded_by(upper) {
            debug!(tab = %rule.tab, needle, filename = %doc.filename, "excluded from tab");
            return None;
        }
        if !rule.included(upper) {
            return None;
        }

        let mut invoice = self.extract_fields(rule.tab, doc, upper);
        if !rule.accepts_number(invoice.invoice_number.as_deref()) {
            debug!(
                tab = %rule.tab,
                number = ?invoice.invoice_number,
                filename = %doc.filename,
                "invoice number outside tab range"
            );
            return None;
        }
        if rule.number_range.is_some() {
            // ranged tabs key on the integer, so "063" and "63" are one invoice
            invoice.invoice_number = invoice
                .invoice_number
                .and_then(|n| n.trim().parse::<u32>().ok())
                .map(|n| n.to_string());
        }
        Some(invoice)
    }
}

/// Proforma, purchase order or plain invoice, from the wording.
fn document_kind(upper: &UpperDocument) -> DocumentKind {
    if upper.text.contains("PROFORMA") || upper.filename.contains("PROFORMA") {
        DocumentKind::Proforma
    } else if upper.text.contains("PURCHASE ORDER") || FILENAME_PO_TOKEN.is_match(&upper.filename) {
        DocumentKind::PurchaseOrder
    } else {
        DocumentKind::Invoice
    }
}

impl InvoiceExtractor for DocumentExtractor {
    fn extract(&self, doc: &RawDocument) -> ExtractedInvoice {
        let upper = UpperDocument::new(&doc.text, &doc.filename);
        for rule in self.tabs.iter() {
            if let Some(invoice) = self.try_tab(rule, doc, &upper) {
                debug!(tab = %invoice.tab, filename = %doc.filename, "classified document");
                return invoice;
            }
        }
        trace!(filename = %doc.filename, "no tab claimed document");
        self.extract_fields(Tab::None, doc, &upper)
    }

    fn extract_as(&self, doc: &RawDocument, tab: Tab) -> ExtractedInvoice {
        let upper = UpperDocument::new(&doc.text, &doc.filename);
        self.extract_fields(tab, doc, &upper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::{Currency, ManualOverrides};
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn extractor() -> DocumentExtractor {
        DocumentExtractor::new(TabRules::default())
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_dfw_invoice_end_to_end() {
        let doc = RawDocument::new(
            "INVOICE No 63 ... DFW PROFESSIONAL SRL ... TOTAL EUR €1.250,00",
            "invoice_63.pdf",
        );
        let invoice = extractor().extract(&doc);

        assert_eq!(invoice.tab, Tab::Dfw);
        assert_eq!(invoice.invoice_number.as_deref(), Some("63"));
        assert_eq!(invoice.amount, Some(dec("1250.00")));
        assert_eq!(invoice.currency, Currency::Eur);
        assert_eq!(invoice.source_filename, "invoice_63.pdf");
        assert_eq!(invoice.kind, DocumentKind::Invoice);
    }

    #[test]
    fn test_rohel_factura_unclassified() {
        let doc = RawDocument::new("FACTURA seria ROH nr 44 ... ROHEL TRANS ...", "");
        let invoice = extractor().extract(&doc);
        assert_eq!(invoice.tab, Tab::None);
        assert_eq!(invoice.invoice_number.as_deref(), Some("44"));

        let assigned =
            extractor().extract_with_overrides(&doc, &ManualOverrides::assign(Tab::Contrast));
        assert_eq!(assigned.tab, Tab::Contrast);
        assert!(assigned.manually_assigned);
        assert_eq!(assigned.currency, Currency::Ron);
    }

    #[test]
    fn test_exclusion_beats_inclusion() {
        let extractor = extractor();
        for rule in extractor.tabs().iter().filter(|r| !r.exclude.is_empty()) {
            for needle in &rule.exclude {
                let doc = RawDocument::new(
                    "INVOICE No 5 DFW PROFESSIONAL JTAPE AMBA CONTRAST ACCOUNTANCY",
                    format!("{} factura.pdf", needle),
                );
                assert_ne!(extractor.classify(&doc), rule.tab, "{} / {}", rule.tab, needle);
            }
        }
    }

    #[test]
    fn test_dfw_range_rejects_then_next_tab() {
        let doc = RawDocument::new("INVOICE No 120 DFW PROFESSIONAL for JTAPE Limited", "x.pdf");
        let extractor = extractor();
        let first = extractor.extract(&doc);
        let second = extractor.extract(&doc);

        assert_eq!(first.tab, Tab::Jtape);
        assert_eq!(first, second);
        assert_eq!(first.recipient, "JTAPE Limited");
    }

    #[test]
    fn test_dfw_number_normalized() {
        let doc = RawDocument::new("INVOICE No 007 DFW PROFESSIONAL", "x.pdf");
        let invoice = extractor().extract(&doc);
        assert_eq!(invoice.tab, Tab::Dfw);
        assert_eq!(invoice.invoice_number.as_deref(), Some("7"));
    }

    #[test]
    fn test_known_fields_win() {
        let doc = RawDocument::new("DFW PROFESSIONAL TOTAL EUR 99,00", "Invoice No 12.pdf")
            .with_known_amount(dec("4970"), Some(Currency::Ron))
            .with_known_invoice_number("77");
        let invoice = extractor().extract(&doc);
        assert_eq!(invoice.tab, Tab::Dfw);
        assert_eq!(invoice.amount, Some(dec("4970")));
        assert_eq!(invoice.currency, Currency::Ron);
        // extracted number first, known number only as fallback
        assert_eq!(invoice.invoice_number.as_deref(), Some("12"));
    }

    #[test]
    fn test_edited_amount_survives_reextraction() {
        let doc = RawDocument::new("JTAPE order. Total: 300,00", "jtape.pdf");
        let overrides = ManualOverrides::default().with_amount(dec("310"), Currency::Gbp);
        let extractor = extractor();

        for _ in 0..2 {
            let invoice = extractor.extract_with_overrides(&doc, &overrides);
            assert_eq!(invoice.tab, Tab::Jtape);
            assert_eq!(invoice.amount, Some(dec("310")));
            assert_eq!(invoice.currency, Currency::Gbp);
            assert!(invoice.amount_edited);
        }
    }

    #[test]
    fn test_unparseable_amount_keeps_other_fields() {
        let doc = RawDocument::new("PROFORMA No 15\nDate: 01/02/2024\nTotal: ,", "p.pdf");
        let invoice = extractor().extract(&doc);
        assert_eq!(invoice.tab, Tab::Proforma);
        assert_eq!(invoice.amount, None);
        assert_eq!(invoice.invoice_number.as_deref(), Some("15"));
        assert_eq!(invoice.invoice_date.as_deref(), Some("01/02/2024"));
        assert_eq!(invoice.kind, DocumentKind::Proforma);
    }

    #[test]
    fn test_supplier_greek_document() {
        let doc = RawDocument::new("Rotopak SA\nΚαθαρή Αξία: 1.200,50 €", "ΤΙΜ0042.pdf");
        let invoice = extractor().extract(&doc);
        assert_eq!(invoice.tab, Tab::Supplier);
        assert_eq!(invoice.invoice_number.as_deref(), Some("ΤΙΜ0042"));
        assert_eq!(invoice.amount, Some(dec("1200.50")));
        assert_eq!(invoice.currency, Currency::Eur);
    }

    #[test]
    fn test_contrast_total_in_euro() {
        let doc = RawDocument::new(
            "Furnizor: CONTRAST ACCOUNTANCY SRL\nTotal de plata: 1.250,00 EURO",
            "contrast.pdf",
        );
        let invoice = extractor().extract(&doc);
        assert_eq!(invoice.tab, Tab::Contrast);
        assert_eq!(invoice.amount, Some(dec("1250.00")));
        assert_eq!(invoice.currency, Currency::Eur);
        assert_eq!(invoice.vendor.as_deref(), Some("CONTRAST ACCOUNTANCY SRL"));
    }

    #[test]
    fn test_vendor_absent() {
        let invoice = extractor().extract(&RawDocument::new("INVOICE No 5 DFW PROFESSIONAL", "a.pdf"));
        assert_eq!(invoice.vendor, None);
    }

    #[test]
    fn test_purchase_order_kind() {
        let doc = RawDocument::new("AMBA GROUP LTD\nPURCHASE ORDER\nPO NO 4410", "amba.pdf");
        let invoice = extractor().extract(&doc);
        assert_eq!(invoice.tab, Tab::Amba);
        assert_eq!(invoice.kind, DocumentKind::PurchaseOrder);
        assert_eq!(invoice.invoice_number.as_deref(), Some("4410"));
    }
}
