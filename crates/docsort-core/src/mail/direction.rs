//! Which way an invoice mail travels relative to the house mailboxes.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::MailMessage;

const INVOICE_WORDS: [&str; 2] = ["factura", "invoice"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceDirection {
    /// Issued by the house.
    Outgoing,
    /// Sent to the house.
    Incoming,
    /// From the house accountant.
    Accounting,
    /// From the tax service.
    TaxService,
    /// From a known supplier, about the house.
    Supplier,
}

impl InvoiceDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceDirection::Outgoing => "outgoing",
            InvoiceDirection::Incoming => "incoming",
            InvoiceDirection::Accounting => "accounting",
            InvoiceDirection::TaxService => "tax_service",
            InvoiceDirection::Supplier => "supplier",
        }
    }
}

impl fmt::Display for InvoiceDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Address and phrase tables, all lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionRules {
    /// Fragment naming the house, in addresses and in text.
    pub house: Vec<String>,
    /// Phrases that put the house in the issuer's seat.
    pub issuer_phrases: Vec<String>,
    pub accountants: Vec<String>,
    pub tax_services: Vec<String>,
    pub suppliers: Vec<String>,
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

impl Default for DirectionRules {
    fn default() -> Self {
        Self {
            house: owned(&["dfw"]),
            issuer_phrases: owned(&[
                "factura dfw",
                "invoice from dfw",
                "dfw invoice",
                "factura emisa",
            ]),
            accountants: owned(&["georgegologan"]),
            tax_services: owned(&["smarttax"]),
            suppliers: owned(&["orbit"]),
        }
    }
}

fn any_in(haystack: &str, needles: &[String]) -> bool {
    needles.iter().any(|n| haystack.contains(n.as_str()))
}

impl DirectionRules {
    /// Direction of an invoice mail, `None` when the message is not an
    /// invoice that concerns the house. The more specific sender wins.
    pub fn direction(&self, message: &MailMessage) -> Option<InvoiceDirection> {
        let from = message.from.to_lowercase();
        let to = message.to.to_lowercase();
        let text = message.search_text();

        let mentions_invoice = INVOICE_WORDS.iter().any(|w| text.contains(w));
        let mentions_factura = text.contains("factura");
        let mentions_house = any_in(&text, &self.house);

        if any_in(&from, &self.suppliers) && mentions_invoice && mentions_house {
            Some(InvoiceDirection::Supplier)
        } else if any_in(&from, &self.tax_services) && mentions_factura {
            Some(InvoiceDirection::TaxService)
        } else if any_in(&from, &self.accountants)
            && (mentions_factura || text.contains("accounting invoice"))
        {
            Some(InvoiceDirection::Accounting)
        } else if (any_in(&from, &self.house) && mentions_invoice)
            || (mentions_house && any_in(&text, &self.issuer_phrases))
        {
            Some(InvoiceDirection::Outgoing)
        } else if any_in(&to, &self.house) && mentions_invoice {
            Some(InvoiceDirection::Incoming)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn direction(from: &str, to: &str, subject: &str, body: &str) -> Option<InvoiceDirection> {
        DirectionRules::default().direction(&MailMessage::new(from, subject, body).to(to))
    }

    #[test]
    fn test_outgoing_and_incoming() {
        assert_eq!(
            direction("office@dfwprofessional.ro", "client@jtape.com", "Factura 12", ""),
            Some(InvoiceDirection::Outgoing)
        );
        assert_eq!(
            direction("ana@rohel.ro", "office@dfwprofessional.ro", "Invoice 7", ""),
            Some(InvoiceDirection::Incoming)
        );
        assert_eq!(
            direction("x@gmail.com", "y@gmail.com", "Factura emisa", "pentru DFW Professional"),
            Some(InvoiceDirection::Outgoing)
        );
    }

    #[test]
    fn test_specific_senders() {
        assert_eq!(
            direction(
                "George <georgegologan@gmail.com>",
                "office@dfwprofessional.ro",
                "Accounting invoice",
                ""
            ),
            Some(InvoiceDirection::Accounting)
        );
        assert_eq!(
            direction("facturi@smarttax.ro", "office@dfwprofessional.ro", "Factura luna mai", ""),
            Some(InvoiceDirection::TaxService)
        );
        assert_eq!(
            direction("billing@orbitstreem.com", "office@dfwprofessional.ro", "Invoice", "for DFW"),
            Some(InvoiceDirection::Supplier)
        );
    }

    #[test]
    fn test_not_an_invoice_mail() {
        assert_eq!(direction("office@dfwprofessional.ro", "a@b.com", "Lunch", "see you"), None);
        assert_eq!(direction("billing@orbitstreem.com", "a@b.com", "Invoice", "no house"), None);
        assert_eq!(InvoiceDirection::TaxService.to_string(), "tax_service");
    }
}
