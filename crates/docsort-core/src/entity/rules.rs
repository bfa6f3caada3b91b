//! Ordered sender classification tables.

use serde::{Deserialize, Serialize};

use crate::models::entity::Category;

/// A domain fragment and the category it implies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRule {
    pub domain: String,
    pub category: Category,
}

/// Keywords that pull a sender into a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRule {
    pub category: Category,
    pub keywords: Vec<String>,
}

/// Immutable rule set for the entity classifier. List order is match order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityRules {
    /// Address fragments that mark automated senders.
    pub system_senders: Vec<String>,
    pub domains: Vec<DomainRule>,
    pub keywords: Vec<KeywordRule>,
}

fn domain_rules(category: Category, domains: &[&str]) -> impl Iterator<Item = DomainRule> {
    domains.iter().map(move |d| DomainRule {
        domain: (*d).to_string(),
        category,
    })
}

fn keyword_rule(category: Category, keywords: &[&str]) -> KeywordRule {
    KeywordRule {
        category,
        keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
    }
}

impl Default for EntityRules {
    fn default() -> Self {
        let domains = domain_rules(
            Category::Transport,
            &[
                "delamode-group.com",
                "gavagroup.com",
                "dimensions-forwarding.com",
                "cargologistix-forwarding.ro",
                "mtrading.ro",
                "hartrodt.com",
                "klgeurope.com",
                "geis-group.de",
            ],
        )
        .chain(domain_rules(
            Category::Customers,
            &["orbit-streem.com", "rohel.ro", "gyso.ch"],
        ))
        .chain(domain_rules(
            Category::Taxation,
            &["smarttax.ro", "librabank.ro", "customs.ro"],
        ))
        .chain(domain_rules(
            Category::Customers,
            &[
                "jtape.com",
                "dtc-uk.com",
                "baxt-products.com",
                "bodyshopaustralia.com.au",
                "bellinisystems.it",
                "bolest.se",
                "amba.co.uk",
            ],
        ))
        .chain(domain_rules(Category::Suppliers, &["rotopak.gr", "centralpack.gr"]))
        .chain(domain_rules(Category::Legal, &["ntova.gr"]))
        .chain(domain_rules(Category::Internal, &["dfwprofessional.eu"]))
        .collect();

        let keywords = vec![
            keyword_rule(
                Category::Transport,
                &[
                    "shipping",
                    "freight",
                    "cargo",
                    "transport",
                    "delivery",
                    "shipment",
                    "logistics",
                    "forwarding",
                    "customs",
                    "export",
                    "import",
                    "delamode",
                    "gava",
                    "dimensions",
                    "cargologistix",
                ],
            ),
            keyword_rule(
                Category::Taxation,
                &["tax", "vat", "payment", "accounting", "fiscal", "smarttax", "bank"],
            ),
            keyword_rule(
                Category::Legal,
                &["lawyer", "legal", "contract", "patent", "agreement", "law"],
            ),
            keyword_rule(Category::Suppliers, &["rotopak", "central pack", "centralpack"]),
            keyword_rule(
                Category::Customers,
                &[
                    "order", "purchase", "buy", "customer", "jtape", "dtc", "baxt", "bodyshop",
                    "bellini", "bolest", "orbit", "streem", "gyso", "amba", "rohel",
                ],
            ),
        ];

        Self {
            system_senders: ["mailer-daemon", "noreply", "no-reply", "accounts.google"]
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            domains,
            keywords,
        }
    }
}

impl EntityRules {
    pub fn is_system_sender(&self, address: &str) -> bool {
        !address.is_empty() && self.system_senders.iter().any(|s| address.contains(s.as_str()))
    }

    /// First domain rule whose fragment occurs in `domain`.
    pub fn category_for_domain(&self, domain: &str) -> Option<Category> {
        if domain.is_empty() {
            return None;
        }
        self.domains
            .iter()
            .find(|rule| domain.contains(rule.domain.as_str()))
            .map(|rule| rule.category)
    }

    /// First category with a keyword in the lowercased search text or the domain.
    pub fn category_for_keywords(&self, search_text: &str, domain: &str) -> Option<Category> {
        self.keywords
            .iter()
            .find(|rule| {
                rule.keywords
                    .iter()
                    .any(|kw| search_text.contains(kw.as_str()) || domain.contains(kw.as_str()))
            })
            .map(|rule| rule.category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_table_order() {
        let rules = EntityRules::default();
        assert_eq!(rules.category_for_domain("jtape.com"), Some(Category::Customers));
        assert_eq!(rules.category_for_domain("mail.gavagroup.com"), Some(Category::Transport));
        assert_eq!(rules.category_for_domain("smarttax.ro"), Some(Category::Taxation));
        assert_eq!(rules.category_for_domain("example.org"), None);
        assert_eq!(rules.category_for_domain(""), None);
    }

    #[test]
    fn test_keyword_table_order() {
        let rules = EntityRules::default();
        // "transport" outranks "payment"
        assert_eq!(
            rules.category_for_keywords("payment for transport services", "x.com"),
            Some(Category::Transport)
        );
        assert_eq!(
            rules.category_for_keywords("new purchase", "example.org"),
            Some(Category::Customers)
        );
        assert_eq!(rules.category_for_keywords("hello", "bank.example"), Some(Category::Taxation));
        assert_eq!(rules.category_for_keywords("hello", "example.org"), None);
    }

    #[test]
    fn test_system_senders() {
        let rules = EntityRules::default();
        assert!(rules.is_system_sender("noreply@github.com"));
        assert!(rules.is_system_sender("mailer-daemon@googlemail.com"));
        assert!(!rules.is_system_sender("jane@jtape.com"));
        assert!(!rules.is_system_sender(""));
    }
}
