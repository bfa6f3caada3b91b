//! Invoice number chains, one per tab.

use super::patterns::*;
use super::{group, group_digits, group_with_digit, ExtractionMatch, FieldContext, FieldExtractor, FirstMatch};
use crate::models::document::Tab;

/// Filename stems are cut to this many characters.
const STEM_LEN: usize = 20;

fn stem(caps: &regex::Captures<'_>) -> Option<String> {
    group(caps).map(|s| s.chars().take(STEM_LEN).collect())
}

/// `INVOICE No`, filename `Invoice No`, then `FACTURA ...` digits.
fn common_head() -> FirstMatch<String> {
    FirstMatch::new()
        .text(&INVOICE_NO, group)
        .filename(&FILENAME_INVOICE_NO, group)
        .text(&FACTURA_NO, group_digits)
}

/// Full ordered chain for a tab.
pub fn invoice_number_rules(tab: Tab) -> FirstMatch<String> {
    let fallbacks = match tab {
        Tab::Dfw => FirstMatch::new(),
        Tab::Jtape => FirstMatch::new()
            .rule(&JTAPE_PO, super::Scope::TextAndFilename, group)
            .text(&INVOICE_OR_PROFORMA_NO, group)
            .filename(&FIRST_DIGITS, group),
        Tab::Amba => FirstMatch::new()
            .text(&AMBA_PO_NO, group)
            .text(&AMBA_ORDER_NO, group)
            .text(&INVOICE_OR_PROFORMA_NO, group)
            .filename(&FIRST_DIGITS, group),
        Tab::Supplier => FirstMatch::new()
            .filename(&SUPPLIER_INVOICE, group)
            .filename(&SUPPLIER_DELIVERY, group)
            .text(&SUPPLIER_NUMBER, group)
            .filename(&FILENAME_STEM, stem),
        Tab::Contrast => FirstMatch::new()
            .text(&NR_FACTURA, group)
            .text(&SERIA_NR, group)
            .filename(&FILENAME_OSR, group)
            .filename(&FILENAME_FACTURA_NR, group)
            .filename(&FILENAME_FACTURA, group)
            .filename(&FIRST_DIGITS, group)
            .filename(&FILENAME_STEM, stem),
        Tab::Proforma => FirstMatch::new()
            .text(&PROFORMA_NO, group)
            .filename(&FILENAME_PROFORMA_NO, group)
            .filename(&FIRST_DIGITS, group)
            .filename(&FILENAME_STEM, stem),
        Tab::None => FirstMatch::new()
            .text(&GENERIC_INVOICE_REF, group_with_digit)
            .text(&GENERIC_NUMBER_REF, group_with_digit)
            .text(&GENERIC_DOCUMENT_REF, group_with_digit),
    };
    common_head().then(fallbacks)
}

/// Invoice number of a document under the given tab's rules.
pub fn extract_invoice_number(tab: Tab, ctx: &FieldContext<'_>) -> Option<ExtractionMatch<String>> {
    invoice_number_rules(tab).extract(ctx)
}
