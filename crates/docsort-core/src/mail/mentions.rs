//! Invoice mentions in message text.
//!
//! A message passes the gate when its lowercased subject and body contain an
//! invoice-related keyword. Each passing message yields one mention per
//! invoice number found (at most three), or a single mention without a number.

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

use super::{truncate_chars, MailMessage};
use crate::entity::address::{display_name, extract_address};
use crate::text::{parse_locale_amount, AmountBounds};

const GATE_KEYWORDS: [&str; 15] = [
    "invoice",
    "inv ",
    "factura",
    "proforma",
    "payment",
    "bill",
    "receipt",
    "credit note",
    "debit note",
    "pi ",
    "amount due",
    "total amount",
    "please pay",
    "payment due",
    "remittance",
];

const MAX_NUMBERS: usize = 3;
const SUBJECT_MAX_CHARS: usize = 100;

lazy_static! {
    static ref NUMBER_PATTERNS: Vec<Regex> = [
        r"invoice\s*[#:№]?\s*(\d{3,})",
        r"\binv\s*[#:№]?\s*(\d{3,})",
        r"factura\s*[#:№]?\s*(\d{3,})",
        r"proforma\s*[#:№]?\s*(\d{3,})",
        r"\bpi\s*[#:№]?\s*(\d{3,})",
        r"\bbill\s*[#:№]?\s*(\d{3,})",
        r"receipt\s*[#:№]?\s*(\d{3,})",
        r"credit\s*note\s*[#:№]?\s*(\d{3,})",
        r"debit\s*note\s*[#:№]?\s*(\d{3,})",
        r"payment\s*[#:№]?\s*(\d{3,})",
        r"order\s*[#:№]?\s*(\d{4,})",
        r"\bpo\s*[#:№]?\s*(\d{4,})",
        r"#(\d{5,})",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect();

    static ref AMOUNT_PATTERNS: Vec<Regex> = [
        r"(?:€|eur)\s*(\d[\d,.]*)",
        r"(\d[\d,.]*)\s*(?:€|eur)",
        r"(?:\$|usd)\s*(\d[\d,.]*)",
        r"(\d[\d,.]*)\s*(?:\$|usd)",
        r"(?:£|gbp)\s*(\d[\d,.]*)",
        r"(\d[\d,.]*)\s*(?:£|gbp)",
        r"(?:ron|lei)\s*(\d[\d,.]*)",
        r"(\d[\d,.]*)\s*(?:ron|lei)",
        r"total[:\s]*(\d[\d,.]*)",
        r"amount[:\s]*(\d[\d,.]*)",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MentionKind {
    Invoice,
    Proforma,
    CreditNote,
    DebitNote,
    Receipt,
    Payment,
}

impl MentionKind {
    /// First match wins: proforma, credit note, debit note, receipt, then a
    /// payment that never says "invoice".
    pub fn detect(text: &str) -> Self {
        if text.contains("proforma") {
            MentionKind::Proforma
        } else if text.contains("credit note") {
            MentionKind::CreditNote
        } else if text.contains("debit note") {
            MentionKind::DebitNote
        } else if text.contains("receipt") {
            MentionKind::Receipt
        } else if text.contains("payment") && !text.contains("invoice") {
            MentionKind::Payment
        } else {
            MentionKind::Invoice
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MentionKind::Invoice => "Invoice",
            MentionKind::Proforma => "Proforma",
            MentionKind::CreditNote => "Credit Note",
            MentionKind::DebitNote => "Debit Note",
            MentionKind::Receipt => "Receipt",
            MentionKind::Payment => "Payment",
        }
    }
}

impl fmt::Display for MentionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Paid,
    Overdue,
    Pending,
    Cancelled,
    #[default]
    Unknown,
}

impl PaymentStatus {
    pub fn detect(text: &str) -> Self {
        let any = |words: &[&str]| words.iter().any(|w| text.contains(w));
        if any(&["paid", "received", "settled"]) {
            PaymentStatus::Paid
        } else if any(&["overdue", "reminder", "urgent"]) {
            PaymentStatus::Overdue
        } else if any(&["pending", "awaiting"]) {
            PaymentStatus::Pending
        } else if any(&["cancelled", "canceled"]) {
            PaymentStatus::Cancelled
        } else {
            PaymentStatus::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "Paid",
            PaymentStatus::Overdue => "Overdue",
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Cancelled => "Cancelled",
            PaymentStatus::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An invoice referenced by a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceMention {
    /// `None` when the message is invoice-related but names no number.
    pub number: Option<String>,
    pub kind: MentionKind,
    pub status: PaymentStatus,
    pub amount: Option<Decimal>,
    pub sender: String,
    pub company: String,
    pub subject: String,
    pub received_at: Option<DateTime<Utc>>,
}

fn passes_gate(text: &str) -> bool {
    GATE_KEYWORDS.iter().any(|kw| text.contains(kw))
}

fn invoice_numbers(text: &str) -> Vec<String> {
    let mut numbers: Vec<String> = Vec::new();
    for pattern in NUMBER_PATTERNS.iter() {
        for caps in pattern.captures_iter(text) {
            let number = &caps[1];
            if !numbers.iter().any(|n| n == number) {
                numbers.push(number.to_string());
            }
        }
    }
    numbers.truncate(MAX_NUMBERS);
    numbers
}

/// Largest plausible amount next to a currency or total label.
fn largest_amount(text: &str, bounds: &AmountBounds) -> Option<Decimal> {
    AMOUNT_PATTERNS
        .iter()
        .flat_map(|pattern| pattern.captures_iter(text))
        .filter_map(|caps| parse_locale_amount(&caps[1]).ok())
        .filter(|amount| bounds.contains(*amount))
        .max()
}

/// Invoice mentions in one message.
pub fn scan_invoice_mentions(message: &MailMessage, bounds: &AmountBounds) -> Vec<InvoiceMention> {
    let text = message.search_text();
    if !passes_gate(&text) {
        return Vec::new();
    }

    let sender = extract_address(&message.from);
    let company = if message.from.contains('<') {
        display_name(&message.from, "")
    } else {
        String::new()
    };
    let template = InvoiceMention {
        number: None,
        kind: MentionKind::detect(&text),
        status: PaymentStatus::detect(&text),
        amount: largest_amount(&text, bounds),
        sender,
        company,
        subject: truncate_chars(&message.subject, SUBJECT_MAX_CHARS),
        received_at: message.received_at,
    };

    let numbers = invoice_numbers(&text);
    trace!(sender = %template.sender, count = numbers.len(), "invoice mentions");
    if numbers.is_empty() {
        return vec![template];
    }
    numbers
        .into_iter()
        .map(|number| InvoiceMention {
            number: Some(number),
            ..template.clone()
        })
        .collect()
}
