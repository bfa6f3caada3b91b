//! Currency markers and EUR conversion.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::document::Currency;

/// Markers in priority order. Alphabetic codes must stand alone as a word.
const MARKERS: [(Currency, &[&str]); 4] = [
    (Currency::Eur, &["€", "EUR", "EURO", "EUROS"]),
    (Currency::Ron, &["RON", "LEI", "LEU"]),
    (Currency::Gbp, &["£", "GBP"]),
    (Currency::Usd, &["$", "USD"]),
];

/// Characters looked at on each side of a matched number.
const WINDOW: usize = 12;

fn contains_marker(haystack: &str, marker: &str) -> bool {
    if !marker.chars().all(|c| c.is_ascii_alphabetic()) {
        return haystack.contains(marker);
    }
    haystack.match_indices(marker).any(|(i, m)| {
        let before = haystack[..i].chars().next_back();
        let after = haystack[i + m.len()..].chars().next();
        !before.is_some_and(char::is_alphabetic) && !after.is_some_and(char::is_alphabetic)
    })
}

fn first_marker(haystack: &str) -> Option<Currency> {
    let upper = haystack.to_uppercase();
    MARKERS
        .iter()
        .find(|(_, markers)| markers.iter().any(|m| contains_marker(&upper, m)))
        .map(|(currency, _)| *currency)
}

/// Currency marked next to the number at `start..end`, on the same line.
pub fn currency_near(text: &str, start: usize, end: usize) -> Option<Currency> {
    if start > end || end > text.len() || !text.is_char_boundary(start) || !text.is_char_boundary(end)
    {
        return None;
    }

    let line_start = text[..start].rfind('\n').map_or(0, |i| i + 1);
    let line_end = text[end..].find('\n').map_or(text.len(), |i| end + i);

    let from = text[line_start..start]
        .char_indices()
        .rev()
        .nth(WINDOW - 1)
        .map_or(line_start, |(i, _)| line_start + i);
    let to = text[end..line_end]
        .char_indices()
        .nth(WINDOW)
        .map_or(line_end, |(i, _)| end + i);

    first_marker(&text[from..to])
}

/// First currency marked anywhere in `text`, by marker priority.
pub fn detect_document_currency(text: &str) -> Option<Currency> {
    first_marker(text)
}

/// Units of each currency per euro, for reporting-time conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeRates {
    pub per_eur: BTreeMap<Currency, Decimal>,
}

impl Default for ExchangeRates {
    fn default() -> Self {
        let mut per_eur = BTreeMap::new();
        per_eur.insert(Currency::Ron, Decimal::new(497, 2));
        Self { per_eur }
    }
}

impl ExchangeRates {
    pub fn with_rate(mut self, currency: Currency, per_eur: Decimal) -> Self {
        self.per_eur.insert(currency, per_eur);
        self
    }

    /// Convert to EUR, rounded to cents. `None` when no usable rate is configured.
    pub fn to_eur(&self, amount: Decimal, currency: Currency) -> Option<Decimal> {
        if currency == Currency::Eur {
            return Some(amount);
        }
        let rate = self.per_eur.get(&currency)?;
        if rate.is_zero() {
            return None;
        }
        Some((amount / rate).round_dp(2))
    }
}
