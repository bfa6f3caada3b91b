//! Locale-aware amount parsing.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::trace;

use crate::error::ParseError;

/// Shape of a numeric substring. Decides which separator is the decimal point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberShape {
    /// `1.234,56`: the last comma comes after the last period.
    EuropeanGrouped,
    /// `1,234.56`: the last period comes after the last comma.
    UsGrouped,
    /// `1234,56`: commas only, exactly two digits after the last one.
    DecimalComma,
    /// `4,070` or `1,234,567`: commas only, used for grouping.
    ThousandsComma,
    /// `1.234.567`: several periods and no comma.
    ThousandsPeriod,
    /// Anything else reads as a plain decimal.
    Plain,
}

impl NumberShape {
    pub fn of(s: &str) -> Self {
        match (s.rfind(','), s.rfind('.')) {
            (Some(comma), Some(period)) if comma > period => NumberShape::EuropeanGrouped,
            (Some(_), Some(_)) => NumberShape::UsGrouped,
            (Some(comma), None) => {
                let tail = &s[comma + 1..];
                if tail.len() == 2 && tail.bytes().all(|b| b.is_ascii_digit()) {
                    NumberShape::DecimalComma
                } else {
                    NumberShape::ThousandsComma
                }
            }
            (None, Some(_)) if s.matches('.').count() > 1 => NumberShape::ThousandsPeriod,
            _ => NumberShape::Plain,
        }
    }

    /// Rewrite `s` into a plain decimal literal.
    pub fn normalize(self, s: &str) -> String {
        match self {
            NumberShape::EuropeanGrouped => s.replace('.', "").replace(',', "."),
            NumberShape::UsGrouped | NumberShape::ThousandsComma => s.replace(',', ""),
            NumberShape::DecimalComma => match s.rsplit_once(',') {
                Some((head, tail)) => format!("{}.{}", head.replace(',', ""), tail),
                None => s.to_string(),
            },
            NumberShape::ThousandsPeriod => s.replace('.', ""),
            NumberShape::Plain => s.to_string(),
        }
    }
}

/// Drop whitespace, NBSP and apostrophe grouping, along with trailing
/// separators left over from sentence punctuation.
fn clean_amount(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\'' && *c != '\u{2019}')
        .collect();
    cleaned.trim_end_matches(['.', ',']).to_string()
}

/// The shape `parse_locale_amount` reads `raw` with.
pub fn amount_shape(raw: &str) -> NumberShape {
    NumberShape::of(&clean_amount(raw))
}

/// Parse a numeric substring written in European, US or plain notation.
pub fn parse_locale_amount(raw: &str) -> Result<Decimal, ParseError> {
    let cleaned = clean_amount(raw);
    let shape = NumberShape::of(&cleaned);
    let normalized = shape.normalize(&cleaned);
    trace!(raw, ?shape, normalized = %normalized, "parsed amount shape");

    Decimal::from_str(&normalized).map_err(|_| ParseError::new(raw))
}

/// Exclusive plausibility window for amounts picked out of free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountBounds {
    pub min: Decimal,
    pub max: Decimal,
}

impl Default for AmountBounds {
    fn default() -> Self {
        Self {
            min: Decimal::from(10),
            max: Decimal::from(10_000_000),
        }
    }
}

impl AmountBounds {
    pub fn contains(&self, amount: Decimal) -> bool {
        amount > self.min && amount < self.max
    }
}

/// First candidate that parses and falls inside `bounds`.
pub fn first_plausible<'a>(
    candidates: impl IntoIterator<Item = &'a str>,
    bounds: &AmountBounds,
) -> Option<Decimal> {
    candidates
        .into_iter()
        .filter_map(|raw| parse_locale_amount(raw).ok())
        .find(|amount| bounds.contains(*amount))
}

/// Format an amount in European style (`1.234,56`).
pub fn format_european(amount: Decimal) -> String {
    let s = format!("{:.2}", amount.round_dp(2));
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s.as_str()),
    };
    let Some((integer_part, decimal_part)) = digits.split_once('.') else {
        return s;
    };

    let chars: Vec<char> = integer_part.chars().collect();
    let mut grouped = String::with_capacity(chars.len() + chars.len() / 3);
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(*c);
    }

    format!("{sign}{grouped},{decimal_part}")
}
