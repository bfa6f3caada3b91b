//! Per-category sender directory built from many classifications.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use super::Classification;
use crate::models::entity::Category;

/// One sender as seen across a mailbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntitySummary {
    pub email: String,
    pub name: String,
    pub domain: String,
    pub email_count: usize,
    pub first_contact: Option<DateTime<Utc>>,
    pub last_contact: Option<DateTime<Utc>>,
}

/// Folds classifications into per-category summaries.
#[derive(Debug, Clone, Default)]
pub struct EntityDirectory {
    categories: BTreeMap<Category, HashMap<String, EntitySummary>>,
}

impl EntityDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one message. Skipped senders and empty addresses are ignored.
    pub fn observe(&mut self, classification: &Classification, received_at: Option<DateTime<Utc>>) {
        let Some(record) = classification.entity() else {
            return;
        };
        if record.email_address.is_empty() {
            return;
        }

        let summary = self
            .categories
            .entry(record.category)
            .or_default()
            .entry(record.email_address.clone())
            .or_insert_with(|| EntitySummary {
                email: record.email_address.clone(),
                name: record.display_name.clone(),
                domain: record.domain.clone(),
                email_count: 0,
                first_contact: received_at,
                last_contact: received_at,
            });

        summary.email_count += 1;
        if let Some(at) = received_at {
            summary.first_contact = Some(summary.first_contact.map_or(at, |first| first.min(at)));
            summary.last_contact = Some(summary.last_contact.map_or(at, |last| last.max(at)));
        }
    }

    /// Number of distinct (category, address) pairs.
    pub fn len(&self) -> usize {
        self.categories.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every category, each list sorted by message count descending, then address.
    pub fn by_category(&self) -> BTreeMap<Category, Vec<EntitySummary>> {
        Category::ALL
            .into_iter()
            .map(|category| {
                let mut list: Vec<EntitySummary> = self
                    .categories
                    .get(&category)
                    .map(|m| m.values().cloned().collect())
                    .unwrap_or_default();
                list.sort_by(|a, b| b.email_count.cmp(&a.email_count).then_with(|| a.email.cmp(&b.email)));
                (category, list)
            })
            .collect()
    }
}
