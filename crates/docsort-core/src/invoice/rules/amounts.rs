//! Total amount extraction.

use regex::Captures;
use rust_decimal::Decimal;
use tracing::debug;

use super::patterns::*;
use super::{FieldContext, FieldExtractor, FirstMatch};
use crate::models::document::{Currency, Tab};
use crate::text::{currency_near, parse_locale_amount, AmountBounds};

/// A total picked out of the text, with the currency marked next to it.
#[derive(Debug, Clone, PartialEq)]
pub struct AmountMatch {
    pub amount: Decimal,
    pub currency: Option<Currency>,
    pub source: String,
}

/// Parse capture group 1 as a locale amount. A value that does not parse
/// declines the rule so the chain moves on.
fn locale_amount(caps: &Captures<'_>) -> Option<Decimal> {
    let raw = caps.get(1)?.as_str();
    match parse_locale_amount(raw) {
        Ok(amount) => Some(amount),
        Err(err) => {
            debug!(%err, label = &caps[0], "total label matched an unreadable number");
            None
        }
    }
}

/// Ordered total-label rules for a tab.
pub fn total_rules(tab: Tab) -> FirstMatch<Decimal> {
    match tab {
        Tab::Dfw => FirstMatch::new()
            .text(&TOTAL_EUR, locale_amount)
            .text(&TOTAL_PLAIN, locale_amount)
            .text(&AMOUNT_PLAIN, locale_amount)
            .text(&TOTAL_DE_PLATA, locale_amount)
            .text(&TOTAL_FACTURA, locale_amount)
            .text(&TOTAL_GENERAL, locale_amount)
            .text(&DE_PLATA, locale_amount),
        Tab::Jtape => FirstMatch::new().text(&TOTAL_POUND_OR_EURO, locale_amount),
        Tab::Amba => FirstMatch::new().text(&TOTAL_OPTIONAL_EUR, locale_amount),
        Tab::Supplier => FirstMatch::new()
            .text(&GREEK_NET_VALUE, locale_amount)
            .text(&GREEK_TOTAL, locale_amount)
            .text(&GREEK_VALUE_EUR, locale_amount),
        Tab::Contrast => FirstMatch::new().text(&TOTAL_ROMANIAN, locale_amount),
        Tab::Proforma => FirstMatch::new().text(&TOTAL_LABELED, locale_amount),
        Tab::None => FirstMatch::new()
            .text(&TOTAL_AMOUNT, locale_amount)
            .text(&TOTAL_LABELED, locale_amount)
            .text(&TOTAL_EUR, locale_amount)
            .text(&GRAND_TOTAL, locale_amount)
            .text(&AMOUNT_DUE, locale_amount)
            .text(&GREEK_TOTAL_LABEL, locale_amount)
            .text(&GREEK_NET_VALUE, locale_amount)
            .text(&AMOUNT_PARENTHESIZED, locale_amount),
    }
}

/// Currency-marked candidates scanned when no total label reads.
pub fn candidate_rules() -> FirstMatch<Decimal> {
    FirstMatch::new()
        .text(&CANDIDATE_LABELED, locale_amount)
        .text(&CANDIDATE_EUR_BEFORE, locale_amount)
        .text(&CANDIDATE_EUR_AFTER, locale_amount)
        .text(&CANDIDATE_RON_BEFORE, locale_amount)
        .text(&CANDIDATE_RON_AFTER, locale_amount)
}

/// Total of a document under the given tab's rules.
///
/// Labeled totals are taken as written. Unclassified documents fall back to
/// the first currency-marked candidate inside `bounds`.
pub fn extract_total(tab: Tab, ctx: &FieldContext<'_>, bounds: &AmountBounds) -> Option<AmountMatch> {
    let to_match = |found: super::ExtractionMatch<Decimal>| AmountMatch {
        amount: found.value,
        currency: found
            .position
            .and_then(|(start, end)| currency_near(ctx.text, start, end)),
        source: found.source,
    };

    if let Some(found) = total_rules(tab).extract(ctx) {
        return Some(to_match(found));
    }
    if tab != Tab::None {
        return None;
    }

    candidate_rules()
        .extract_all(ctx)
        .into_iter()
        .find(|found| bounds.contains(found.value))
        .map(to_match)
}
