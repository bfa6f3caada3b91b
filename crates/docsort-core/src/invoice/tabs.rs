//! Tab inclusion and exclusion rules.

use serde::{Deserialize, Serialize};

use super::dedup::DedupBy;
use crate::models::document::{Currency, Tab};

/// Uppercased view of a document, built once per classification.
#[derive(Debug, Clone)]
pub struct UpperDocument {
    pub text: String,
    pub filename: String,
    /// Filename as given, for prefix markers on non-Latin scripts.
    pub raw_filename: String,
}

impl UpperDocument {
    pub fn new(text: &str, filename: &str) -> Self {
        Self {
            text: text.to_uppercase(),
            filename: filename.to_uppercase(),
            raw_filename: filename.to_string(),
        }
    }
}

/// Where a marker looks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerScope {
    Text,
    Filename,
    Either,
    FilenamePrefix,
}

/// Inclusion marker: every needle in `all` must be present, and none of `unless`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
    pub all: Vec<String>,
    pub scope: MarkerScope,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unless: Vec<String>,
}

impl Marker {
    pub fn new(scope: MarkerScope, all: &[&str]) -> Self {
        Self {
            all: all.iter().map(|s| (*s).to_string()).collect(),
            scope,
            unless: Vec::new(),
        }
    }

    pub fn text(needle: &str) -> Self {
        Self::new(MarkerScope::Text, &[needle])
    }

    pub fn filename(needle: &str) -> Self {
        Self::new(MarkerScope::Filename, &[needle])
    }

    pub fn either(needle: &str) -> Self {
        Self::new(MarkerScope::Either, &[needle])
    }

    pub fn filename_prefix(prefix: &str) -> Self {
        Self::new(MarkerScope::FilenamePrefix, &[prefix])
    }

    pub fn unless(mut self, needle: &str) -> Self {
        self.unless.push(needle.to_string());
        self
    }

    fn found(&self, needle: &str, doc: &UpperDocument) -> bool {
        let needle = needle.to_uppercase();
        match self.scope {
            MarkerScope::Text => doc.text.contains(&needle),
            MarkerScope::Filename => doc.filename.contains(&needle),
            MarkerScope::Either => doc.text.contains(&needle) || doc.filename.contains(&needle),
            MarkerScope::FilenamePrefix => {
                doc.raw_filename.starts_with(needle.as_str()) || doc.filename.starts_with(&needle)
            }
        }
    }

    pub fn matches(&self, doc: &UpperDocument) -> bool {
        !self.all.is_empty()
            && self.all.iter().all(|n| self.found(n, doc))
            && !self.unless.iter().any(|n| self.found(n, doc))
    }
}

/// Inclusive integer range an invoice number must fall in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberRange {
    pub min: u32,
    pub max: u32,
}

impl NumberRange {
    pub fn contains(&self, n: u32) -> bool {
        (self.min..=self.max).contains(&n)
    }
}

/// Rules for one tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabRule {
    pub tab: Tab,
    pub include: Vec<Marker>,
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub dedup: DedupBy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_range: Option<NumberRange>,
    #[serde(default)]
    pub default_currency: Currency,
}

impl TabRule {
    pub fn new(tab: Tab) -> Self {
        Self {
            tab,
            include: Vec::new(),
            exclude: Vec::new(),
            dedup: DedupBy::Filename,
            number_range: None,
            default_currency: Currency::Eur,
        }
    }

    pub fn include(mut self, marker: Marker) -> Self {
        self.include.push(marker);
        self
    }

    pub fn exclude(mut self, needles: &[&str]) -> Self {
        self.exclude.extend(needles.iter().map(|s| (*s).to_string()));
        self
    }

    pub fn dedup_by(mut self, dedup: DedupBy) -> Self {
        self.dedup = dedup;
        self
    }

    pub fn number_range(mut self, min: u32, max: u32) -> Self {
        self.number_range = Some(NumberRange { min, max });
        self
    }

    pub fn default_currency(mut self, currency: Currency) -> Self {
        self.default_currency = currency;
        self
    }

    /// The first exclusion needle present in the text or filename.
    pub fn excluded_by(&self, doc: &UpperDocument) -> Option<&str> {
        self.exclude
            .iter()
            .find(|needle| {
                let needle = needle.to_uppercase();
                doc.text.contains(&needle) || doc.filename.contains(&needle)
            })
            .map(String::as_str)
    }

    pub fn included(&self, doc: &UpperDocument) -> bool {
        self.include.iter().any(|marker| marker.matches(doc))
    }

    /// Range check on an extracted number. Tabs without a range accept anything.
    pub fn accepts_number(&self, number: Option<&str>) -> bool {
        match self.number_range {
            None => true,
            Some(range) => number
                .and_then(|n| n.trim().parse::<u32>().ok())
                .is_some_and(|n| range.contains(n)),
        }
    }
}

/// Ordered tab rules. Order is evaluation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabRules {
    pub rules: Vec<TabRule>,
}

const COURIER_EXCLUSIONS: [&str; 5] = ["PACKING LIST", "ROHEL TRANS", "CMR", "FEDEX", "DHL"];

impl Default for TabRules {
    fn default() -> Self {
        let rules = vec![
            TabRule::new(Tab::Dfw)
                .include(Marker::text("DFW PROFESSIONAL"))
                .exclude(&[
                    "PROFORMA",
                    "PRO-FORMA",
                    "PRO FORMA",
                    "ORDIN DE PLATA",
                    "ROHEL TRANS",
                    "ROTO BOP",
                    "INTERNATIONAL TRANS",
                    "CONTRACT DE TRANSPORT",
                    "PACKING LIST",
                    "DELIVERY NOTE",
                    "BILL OF LADING",
                    "PAYMENT_",
                    "TRANSACTION_",
                    "BONIFICO",
                ])
                .dedup_by(DedupBy::InvoiceNumber)
                .number_range(1, 90),
            TabRule::new(Tab::Jtape)
                .include(Marker::either("JTAPE"))
                .include(Marker::either("J-TAPE"))
                .exclude(&COURIER_EXCLUSIONS),
            TabRule::new(Tab::Amba)
                .include(Marker::either("AMBA"))
                .include(Marker::either("BAXT"))
                .exclude(&COURIER_EXCLUSIONS)
                .exclude(&["DTC5", "CDS IMPORT", "TRANSACTION CONFIRMATION"]),
            TabRule::new(Tab::Supplier)
                .include(Marker::filename_prefix("ΤΙΜ"))
                .include(Marker::filename_prefix("ΔΑ"))
                .dedup_by(DedupBy::InvoiceNumber),
            TabRule::new(Tab::Contrast)
                .include(Marker::text("CONTRAST ACCOUNTANCY"))
                .include(Marker::new(MarkerScope::Text, &["CONTRAST", "J40/9369/2015"]))
                .include(Marker::text("SMARTTAX"))
                .include(Marker::text("GITS TAX"))
                .include(Marker::filename("FACTURA").unless("ROH"))
                .include(Marker::filename("OSR"))
                .exclude(&["ROHEL"])
                .default_currency(Currency::Ron),
            TabRule::new(Tab::Proforma)
                .include(Marker::either("PROFORMA"))
                .include(Marker::either("PRO FORMA")),
        ];
        Self { rules }
    }
}

impl TabRules {
    pub fn get(&self, tab: Tab) -> Option<&TabRule> {
        self.rules.iter().find(|rule| rule.tab == tab)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TabRule> {
        self.rules.iter()
    }

    /// Dedup key kind for a tab; filename when the tab has no rule.
    pub fn dedup_for(&self, tab: Tab) -> DedupBy {
        self.get(tab).map_or(DedupBy::Filename, |rule| rule.dedup)
    }

    /// Default currency for a tab; EUR when the tab has no rule.
    pub fn currency_for(&self, tab: Tab) -> Currency {
        self.get(tab).map_or(Currency::Eur, |rule| rule.default_currency)
    }
}
