//! Document, tab and invoice data models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::text::ExchangeRates;

/// Counterparty bucket a document is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    Dfw,
    Jtape,
    Amba,
    Supplier,
    Contrast,
    Proforma,
    /// Not claimed by any tab.
    None,
}

impl Tab {
    /// Tabs a document can be classified or assigned into, in evaluation order.
    pub const ASSIGNABLE: [Tab; 6] = [
        Tab::Dfw,
        Tab::Jtape,
        Tab::Amba,
        Tab::Supplier,
        Tab::Contrast,
        Tab::Proforma,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tab::Dfw => "dfw",
            Tab::Jtape => "jtape",
            Tab::Amba => "amba",
            Tab::Supplier => "supplier",
            Tab::Contrast => "contrast",
            Tab::Proforma => "proforma",
            Tab::None => "none",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dfw" => Ok(Tab::Dfw),
            "jtape" | "j-tape" => Ok(Tab::Jtape),
            "amba" => Ok(Tab::Amba),
            "supplier" | "suppliers" => Ok(Tab::Supplier),
            "contrast" => Ok(Tab::Contrast),
            "proforma" => Ok(Tab::Proforma),
            "none" | "" => Ok(Tab::None),
            other => Err(format!("unknown tab: {other}")),
        }
    }
}

/// Currency of an extracted amount.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Eur,
    Ron,
    Gbp,
    Usd,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Eur => "EUR",
            Currency::Ron => "RON",
            Currency::Gbp => "GBP",
            Currency::Usd => "USD",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "EUR" | "€" => Ok(Currency::Eur),
            "RON" | "LEI" => Ok(Currency::Ron),
            "GBP" | "£" => Ok(Currency::Gbp),
            "USD" | "$" => Ok(Currency::Usd),
            other => Err(format!("unknown currency: {other}")),
        }
    }
}

/// What kind of commercial document the text looks like.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    #[default]
    Invoice,
    Proforma,
    PurchaseOrder,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DocumentKind::Invoice => "invoice",
            DocumentKind::Proforma => "proforma",
            DocumentKind::PurchaseOrder => "purchase_order",
        })
    }
}

/// Input to one extraction pass: free text plus whatever the I/O layer already knows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawDocument {
    pub text: String,
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub known_amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub known_currency: Option<Currency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub known_invoice_number: Option<String>,
}

impl RawDocument {
    pub fn new(text: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            filename: filename.into(),
            ..Default::default()
        }
    }

    pub fn with_source_date(mut self, date: DateTime<Utc>) -> Self {
        self.source_date = Some(date);
        self
    }

    pub fn with_known_amount(mut self, amount: Decimal, currency: Option<Currency>) -> Self {
        self.known_amount = Some(amount);
        self.known_currency = currency;
        self
    }

    pub fn with_known_invoice_number(mut self, number: impl Into<String>) -> Self {
        self.known_invoice_number = Some(number.into());
        self
    }
}

/// Fields extracted from one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedInvoice {
    pub tab: Tab,
    pub invoice_number: Option<String>,
    /// Raw matched date string, not normalized.
    pub invoice_date: Option<String>,
    pub amount: Option<Decimal>,
    pub currency: Currency,
    pub source_filename: String,
    pub recipient: String,
    /// Issuer named in the text, when labeled.
    #[serde(default)]
    pub vendor: Option<String>,
    pub kind: DocumentKind,
    /// Set when the tab came from a manual assignment.
    #[serde(default)]
    pub manually_assigned: bool,
    /// Set when the amount came from a manual edit.
    #[serde(default)]
    pub amount_edited: bool,
}

impl ExtractedInvoice {
    /// An unclassified record with nothing extracted.
    pub fn empty(filename: impl Into<String>) -> Self {
        Self {
            tab: Tab::None,
            invoice_number: None,
            invoice_date: None,
            amount: None,
            currency: Currency::default(),
            source_filename: filename.into(),
            recipient: String::new(),
            vendor: None,
            kind: DocumentKind::default(),
            manually_assigned: false,
            amount_edited: false,
        }
    }

    /// Amount converted to EUR for aggregation. The record itself is left untouched.
    pub fn amount_in_eur(&self, rates: &ExchangeRates) -> Option<Decimal> {
        self.amount.and_then(|amount| rates.to_eur(amount, self.currency))
    }
}

/// A human-edited amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditedAmount {
    pub amount: Decimal,
    pub currency: Currency,
}

/// The persisted human layer for one document. Always wins over re-extraction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManualOverrides {
    pub assigned_tab: Option<Tab>,
    pub edited_amount: Option<EditedAmount>,
    pub edited_invoice_number: Option<String>,
    pub hidden: bool,
}

impl ManualOverrides {
    pub fn assign(tab: Tab) -> Self {
        Self {
            assigned_tab: Some(tab),
            ..Default::default()
        }
    }

    pub fn hidden() -> Self {
        Self {
            hidden: true,
            ..Default::default()
        }
    }

    pub fn with_amount(mut self, amount: Decimal, currency: Currency) -> Self {
        self.edited_amount = Some(EditedAmount { amount, currency });
        self
    }

    pub fn with_invoice_number(mut self, number: impl Into<String>) -> Self {
        self.edited_invoice_number = Some(number.into());
        self
    }

    pub fn amount_edited(&self) -> bool {
        self.edited_amount.is_some()
    }

    /// Apply edited fields on top of an extraction result.
    pub fn apply(&self, invoice: &mut ExtractedInvoice) {
        if let Some(edit) = self.edited_amount {
            invoice.amount = Some(edit.amount);
            invoice.currency = edit.currency;
            invoice.amount_edited = true;
        }
        if let Some(number) = &self.edited_invoice_number {
            invoice.invoice_number = Some(number.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_tab_round_trip_names() {
        for tab in Tab::ASSIGNABLE {
            assert_eq!(tab.as_str().parse::<Tab>(), Ok(tab));
        }
        assert_eq!("J-Tape".parse::<Tab>(), Ok(Tab::Jtape));
        assert!("rohel".parse::<Tab>().is_err());
    }

    #[test]
    fn test_currency_from_marker() {
        assert_eq!("€".parse::<Currency>(), Ok(Currency::Eur));
        assert_eq!("lei".parse::<Currency>(), Ok(Currency::Ron));
        assert_eq!("£".parse::<Currency>(), Ok(Currency::Gbp));
        assert_eq!(serde_json::to_string(&Currency::Ron).unwrap(), "\"RON\"");
    }

    #[test]
    fn test_overrides_apply_edits() {
        let mut invoice = ExtractedInvoice::empty("a.pdf");
        invoice.amount = Some(Decimal::new(100, 0));

        let overrides = ManualOverrides::default()
            .with_amount(Decimal::new(4970, 0), Currency::Ron)
            .with_invoice_number("12");
        overrides.apply(&mut invoice);

        assert!(overrides.amount_edited());
        assert_eq!(invoice.amount, Some(Decimal::new(4970, 0)));
        assert_eq!(invoice.currency, Currency::Ron);
        assert_eq!(invoice.invoice_number.as_deref(), Some("12"));
        assert!(invoice.amount_edited);
    }

    #[test]
    fn test_amount_in_eur_leaves_record() {
        let mut invoice = ExtractedInvoice::empty("a.pdf");
        invoice.amount = Some(Decimal::new(497, 0));
        invoice.currency = Currency::Ron;

        let eur = invoice.amount_in_eur(&ExchangeRates::default());
        assert_eq!(eur, Some(Decimal::new(100, 0)));
        assert_eq!(invoice.amount, Some(Decimal::new(497, 0)));
        assert_eq!(invoice.currency, Currency::Ron);
    }
}
