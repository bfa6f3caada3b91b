//! Mail messages and the scanners that run over them.

mod direction;
mod mentions;
mod orders;

pub use direction::{DirectionRules, InvoiceDirection};
pub use mentions::{scan_invoice_mentions, InvoiceMention, MentionKind, PaymentStatus};
pub use orders::{scan_order_refs, OrderRef, OrderStatus};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::text::to_search_text;

/// One received message, as much of it as the scanners need.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailMessage {
    pub from: String,
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received_at: Option<DateTime<Utc>>,
}

impl MailMessage {
    pub fn new(from: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            subject: subject.into(),
            body: body.into(),
            ..Self::default()
        }
    }

    pub fn to(mut self, to: impl Into<String>) -> Self {
        self.to = to.into();
        self
    }

    pub fn received(mut self, at: DateTime<Utc>) -> Self {
        self.received_at = Some(at);
        self
    }

    /// Subject and body, lowercased.
    pub fn search_text(&self) -> String {
        to_search_text([&self.subject, &self.body])
    }
}

/// At most `max` characters of `s`.
pub(crate) fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
