//! Per-tab totals for review screens and summary exports.

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::invoice::{NumberRange, TabBatch, TabRules, TabView};
use crate::models::document::{Currency, Tab};
use crate::text::ExchangeRates;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TabTotals {
    pub tab: Tab,
    pub documents: usize,
    /// Documents that carry an amount.
    pub with_amount: usize,
    pub eur_total: Decimal,
    /// Amounts left out of `eur_total` for lack of a rate.
    pub unconverted: usize,
    pub by_currency: BTreeMap<Currency, Decimal>,
}

/// Totals over one tab view. Records are not modified.
pub fn tab_totals(view: &TabView, rates: &ExchangeRates) -> TabTotals {
    let mut totals = TabTotals {
        tab: view.tab,
        documents: view.invoices.len(),
        with_amount: 0,
        eur_total: Decimal::ZERO,
        unconverted: 0,
        by_currency: BTreeMap::new(),
    };

    for invoice in &view.invoices {
        let Some(amount) = invoice.amount else {
            continue;
        };
        totals.with_amount += 1;
        *totals.by_currency.entry(invoice.currency).or_default() += amount;
        match rates.to_eur(amount, invoice.currency) {
            Some(eur) => totals.eur_total += eur,
            None => totals.unconverted += 1,
        }
    }
    totals
}

/// Totals for every tab in a batch, in tab order.
pub fn summarize(batch: &TabBatch, rates: &ExchangeRates) -> Vec<TabTotals> {
    batch.views().map(|view| tab_totals(view, rates)).collect()
}

/// Numbers of a ranged tab that no filed document carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NumberGaps {
    pub tab: Tab,
    pub range: NumberRange,
    /// Distinct in-range numbers seen.
    pub found: usize,
    pub missing: Vec<u32>,
}

/// Every number in `range` absent from `view`. With no view, the whole range.
pub fn missing_numbers(view: Option<&TabView>, range: NumberRange) -> Vec<u32> {
    let found = found_numbers(view, range);
    (range.min..=range.max).filter(|n| !found.contains(n)).collect()
}

fn found_numbers(view: Option<&TabView>, range: NumberRange) -> BTreeSet<u32> {
    view.into_iter()
        .flat_map(|v| v.invoices.iter())
        .filter_map(|inv| inv.invoice_number.as_deref())
        .filter_map(|n| n.trim().parse::<u32>().ok())
        .filter(|n| range.contains(*n))
        .collect()
}

/// Gaps for every tab whose rule carries a number range.
pub fn number_gaps(batch: &TabBatch, rules: &TabRules) -> Vec<NumberGaps> {
    rules
        .iter()
        .filter_map(|rule| rule.number_range.map(|range| (rule.tab, range)))
        .map(|(tab, range)| {
            let view = batch.view(tab);
            NumberGaps {
                tab,
                range,
                found: found_numbers(view, range).len(),
                missing: missing_numbers(view, range),
            }
        })
        .collect()
}
