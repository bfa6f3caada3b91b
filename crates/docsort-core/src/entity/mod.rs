//! Sender classification.
//!
//! A From header plus message text resolves to exactly one [`Category`]:
//! user override, then the ordered domain table, then the ordered keyword
//! table, then `other`. Automated senders are skipped.

pub mod address;
mod directory;
mod rules;

pub use directory::{EntityDirectory, EntitySummary};
pub use rules::{DomainRule, EntityRules, KeywordRule};

use serde::Serialize;
use tracing::{debug, trace};

use crate::mail::MailMessage;
use crate::models::entity::{Category, CategoryOverrides, EntityRecord};
use crate::text::to_search_text;

/// Outcome of classifying one sender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Classification {
    Entity(EntityRecord),
    /// An automated sender; not an entity.
    Skipped { address: String },
}

impl Classification {
    pub fn entity(&self) -> Option<&EntityRecord> {
        match self {
            Classification::Entity(record) => Some(record),
            Classification::Skipped { .. } => None,
        }
    }

    pub fn category(&self) -> Option<Category> {
        self.entity().map(|record| record.category)
    }
}

/// Which step of the precedence chain decided a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategorySource {
    Override,
    DomainTable,
    Keywords,
    Fallback,
}

/// Classifies senders against an immutable rule set.
#[derive(Debug, Clone, Default)]
pub struct EntityClassifier {
    rules: EntityRules,
}

impl EntityClassifier {
    pub fn new(rules: EntityRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &EntityRules {
        &self.rules
    }

    /// Classify the sender of a message.
    pub fn classify(
        &self,
        from_header: &str,
        body: &str,
        subject: &str,
        overrides: &CategoryOverrides,
    ) -> Classification {
        let email_address = address::extract_address(from_header);
        if self.rules.is_system_sender(&email_address) {
            debug!(address = %email_address, "skipping system sender");
            return Classification::Skipped {
                address: email_address,
            };
        }

        let display_name = address::display_name(from_header, &email_address);
        if email_address.is_empty() {
            trace!(from_header, "no address in From header");
            return Classification::Entity(EntityRecord {
                email_address,
                display_name,
                domain: String::new(),
                category: Category::Other,
            });
        }

        let domain = address::domain_of(&email_address).to_string();
        let search_text = to_search_text([subject, body]);
        let (category, source) = self.resolve_category(&domain, &search_text, overrides);
        debug!(address = %email_address, %category, ?source, "classified sender");

        Classification::Entity(EntityRecord {
            email_address,
            display_name,
            domain,
            category,
        })
    }

    pub fn classify_message(
        &self,
        message: &MailMessage,
        overrides: &CategoryOverrides,
    ) -> Classification {
        self.classify(&message.from, &message.body, &message.subject, overrides)
    }

    /// Category for a domain and lowercased search text, with the step that decided it.
    pub fn resolve_category(
        &self,
        domain: &str,
        search_text: &str,
        overrides: &CategoryOverrides,
    ) -> (Category, CategorySource) {
        if let Some(category) = overrides.get(domain) {
            return (category, CategorySource::Override);
        }
        if let Some(category) = self.rules.category_for_domain(domain) {
            return (category, CategorySource::DomainTable);
        }
        if let Some(category) = self.rules.category_for_keywords(search_text, domain) {
            return (category, CategorySource::Keywords);
        }
        (Category::Other, CategorySource::Fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn classifier() -> EntityClassifier {
        EntityClassifier::new(EntityRules::default())
    }

    #[test]
    fn test_static_domain_hit() {
        let result = classifier().classify(
            "Jane Doe <jane@jtape.com>",
            "",
            "",
            &CategoryOverrides::new(),
        );
        assert_eq!(
            result,
            Classification::Entity(EntityRecord {
                email_address: "jane@jtape.com".to_string(),
                display_name: "Jane Doe".to_string(),
                domain: "jtape.com".to_string(),
                category: Category::Customers,
            })
        );
    }

    #[test]
    fn test_override_beats_every_table_entry() {
        let classifier = classifier();
        for rule in &classifier.rules().domains {
            let mut overrides = CategoryOverrides::new();
            let wanted = if rule.category == Category::Legal {
                Category::Internal
            } else {
                Category::Legal
            };
            overrides.upsert(&rule.domain, wanted);

            let header = format!("x <someone@{}>", rule.domain);
            assert_eq!(
                classifier.classify(&header, "shipping", "", &overrides).category(),
                Some(wanted),
                "override for {}",
                rule.domain
            );
        }
    }

    #[test]
    fn test_keyword_fallback_and_other() {
        let classifier = classifier();
        let overrides = CategoryOverrides::new();
        assert_eq!(
            classifier
                .classify("a@unknown.io", "Please see the attached freight quote", "Quote", &overrides)
                .category(),
            Some(Category::Transport)
        );
        assert_eq!(
            classifier.classify("a@unknown.io", "hi", "hello", &overrides).category(),
            Some(Category::Other)
        );
    }

    #[test]
    fn test_system_sender_skipped() {
        let result = classifier().classify(
            "GitHub <noreply@github.com>",
            "order 12345",
            "",
            &CategoryOverrides::new(),
        );
        assert_eq!(
            result,
            Classification::Skipped {
                address: "noreply@github.com".to_string()
            }
        );
        assert_eq!(result.category(), None);
    }

    #[test]
    fn test_empty_header_is_other() {
        let result = classifier().classify("", "freight invoice", "", &CategoryOverrides::new());
        assert_eq!(result.category(), Some(Category::Other));
        assert_eq!(result.entity().map(|e| e.domain.as_str()), Some(""));
    }

    #[test]
    fn test_resolve_category_source() {
        let classifier = classifier();
        let mut overrides = CategoryOverrides::new();
        overrides.upsert("jtape.com", Category::Legal);

        assert_eq!(
            classifier.resolve_category("jtape.com", "", &overrides),
            (Category::Legal, CategorySource::Override)
        );
        assert_eq!(
            classifier.resolve_category("jtape.com", "", &CategoryOverrides::new()),
            (Category::Customers, CategorySource::DomainTable)
        );
    }
}
