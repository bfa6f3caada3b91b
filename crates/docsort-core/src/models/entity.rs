//! Sender entity models.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Business relationship of a sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Customers,
    Transport,
    Suppliers,
    Taxation,
    Legal,
    Internal,
    Other,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Customers,
        Category::Transport,
        Category::Suppliers,
        Category::Taxation,
        Category::Legal,
        Category::Internal,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Customers => "customers",
            Category::Transport => "transport",
            Category::Suppliers => "suppliers",
            Category::Taxation => "taxation",
            Category::Legal => "legal",
            Category::Internal => "internal",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| format!("unknown category: {s}"))
    }
}

/// A classified sender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRecord {
    /// Lowercased address, the entity key.
    pub email_address: String,
    pub display_name: String,
    pub domain: String,
    pub category: Category,
}

/// User-authored domain categories. One entry per domain, last write wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryOverrides {
    entries: BTreeMap<String, Category>,
}

impl CategoryOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the category for a domain, returning the one it replaced.
    pub fn upsert(&mut self, domain: &str, category: Category) -> Option<Category> {
        self.entries.insert(domain.trim().to_lowercase(), category)
    }

    pub fn get(&self, domain: &str) -> Option<Category> {
        self.entries.get(&domain.to_lowercase()).copied()
    }

    pub fn remove(&mut self, domain: &str) -> Option<Category> {
        self.entries.remove(&domain.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Category)> {
        self.entries.iter().map(|(d, c)| (d.as_str(), *c))
    }
}

impl<'a> FromIterator<(&'a str, Category)> for CategoryOverrides {
    fn from_iter<I: IntoIterator<Item = (&'a str, Category)>>(iter: I) -> Self {
        let mut overrides = Self::new();
        for (domain, category) in iter {
            overrides.upsert(domain, category);
        }
        overrides
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_last_write_wins() {
        let mut overrides = CategoryOverrides::new();
        assert_eq!(overrides.upsert("Rohel.ro", Category::Transport), None);
        assert_eq!(
            overrides.upsert("rohel.ro", Category::Suppliers),
            Some(Category::Transport)
        );
        assert_eq!(overrides.len(), 1);
        assert_eq!(overrides.get("ROHEL.RO"), Some(Category::Suppliers));
    }

    #[test]
    fn test_overrides_json_is_a_plain_map() {
        let overrides: CategoryOverrides = [("gyso.ch", Category::Legal)].into_iter().collect();
        let json = serde_json::to_string(&overrides).unwrap();
        assert_eq!(json, r#"{"gyso.ch":"legal"}"#);

        let back: CategoryOverrides = serde_json::from_str(&json).unwrap();
        assert_eq!(back, overrides);
    }

    #[test]
    fn test_category_parse() {
        assert_eq!("Taxation".parse::<Category>(), Ok(Category::Taxation));
        assert!("vendors".parse::<Category>().is_err());
    }
}
