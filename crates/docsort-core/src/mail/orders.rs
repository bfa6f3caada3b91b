//! Order references in subjects and bodies.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use super::truncate_chars;
use crate::text::to_search_text;

lazy_static! {
    static ref ORDER_PATTERNS: Vec<Regex> = [
        r"(?i)order\s*#?\s*(\d{4,})",
        r"(?i)order\s*number[:\s]*(\d{4,})",
        r"(?i)\bpo[:\s#]*(\d{4,})",
        r"(?i)invoice[:\s#]*(\d{4,})",
        r"#(\d{5,})",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect();
}

const SUBJECT_MAX_CHARS: usize = 100;

/// Status label attached to an order reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Shipped,
    Cancelled,
    Problem,
    Confirmed,
    Payment,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::Shipped,
        OrderStatus::Cancelled,
        OrderStatus::Problem,
        OrderStatus::Confirmed,
        OrderStatus::Payment,
    ];

    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            OrderStatus::Pending => &["pending", "waiting", "on hold", "processing"],
            OrderStatus::Shipped => &["shipped", "dispatched", "sent", "delivered", "tracking"],
            OrderStatus::Cancelled => &["cancelled", "canceled", "refund"],
            OrderStatus::Problem => &["problem", "issue", "error", "failed", "delay", "urgent", "asap"],
            OrderStatus::Confirmed => &["confirmed", "confirmation", "approved"],
            OrderStatus::Payment => &["payment", "paid", "invoice"],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Problem => "problem",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Payment => "payment",
        }
    }

    /// Every status with a keyword in lowercased `text`, in table order.
    pub fn detect(text: &str) -> Vec<OrderStatus> {
        Self::ALL
            .into_iter()
            .filter(|status| status.keywords().iter().any(|kw| text.contains(kw)))
            .collect()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRef {
    pub number: String,
    pub subject: String,
    pub statuses: Vec<OrderStatus>,
}

/// Order numbers mentioned in a message, unique, in first-seen order.
///
/// Each pattern is scanned over the whole text before the next, so a number
/// found by an earlier pattern keeps its place even when a later pattern
/// finds it first in the text.
pub fn scan_order_refs(subject: &str, body: &str) -> Vec<OrderRef> {
    let text = to_search_text([subject, body]);
    let statuses = OrderStatus::detect(&text);
    let subject = truncate_chars(subject, SUBJECT_MAX_CHARS);

    let mut seen = HashSet::new();
    let mut refs = Vec::new();
    for pattern in ORDER_PATTERNS.iter() {
        for caps in pattern.captures_iter(&text) {
            let number = &caps[1];
            if seen.insert(number.to_string()) {
                refs.push(OrderRef {
                    number: number.to_string(),
                    subject: subject.clone(),
                    statuses: statuses.clone(),
                });
            }
        }
    }
    refs
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_order_numbers_unique() {
        let refs = scan_order_refs(
            "Order #45120 shipped",
            "Your order number: 45120 left today. PO 7781 still pending. Ref #998877.",
        );
        let numbers: Vec<&str> = refs.iter().map(|r| r.number.as_str()).collect();
        assert_eq!(numbers, vec!["45120", "7781", "998877"]);
        assert_eq!(refs[0].statuses, vec![OrderStatus::Pending, OrderStatus::Shipped]);
    }

    #[test]
    fn test_short_numbers_ignored() {
        assert!(scan_order_refs("order 123", "po 99 #1234").is_empty());
    }

    #[test]
    fn test_po_needs_word_start() {
        let refs = scan_order_refs("", "repo 12345");
        assert!(refs.is_empty());
    }

    #[test]
    fn test_subject_truncated() {
        let subject = format!("Order 5555 {}", "x".repeat(200));
        let refs = scan_order_refs(&subject, "");
        assert_eq!(refs[0].subject.chars().count(), 100);
    }

    #[test]
    fn test_detect_statuses() {
        assert_eq!(
            OrderStatus::detect("payment failed, refund asap"),
            vec![OrderStatus::Cancelled, OrderStatus::Problem, OrderStatus::Payment]
        );
        assert!(OrderStatus::detect("hello").is_empty());
    }
}
