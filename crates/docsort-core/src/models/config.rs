//! Configuration structures for the sorting pipeline.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::entity::{EntityClassifier, EntityRules};
use crate::error::Result;
use crate::invoice::{DocumentExtractor, TabRules};
use crate::mail::DirectionRules;
use crate::text::{AmountBounds, ExchangeRates};

/// Main configuration for the docsort pipeline.
///
/// Loading a new file and building fresh classifiers from it is how rule
/// changes are picked up at runtime.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocsortConfig {
    /// Sender classification tables.
    pub entities: EntityRules,

    /// Ordered tab rules for document classification.
    pub tabs: TabRules,

    /// Field extraction settings.
    pub extraction: ExtractionConfig,

    /// Exchange rates used for EUR aggregation.
    pub rates: ExchangeRates,

    /// House mailboxes and known senders for invoice direction.
    pub directions: DirectionRules,
}

/// Field extraction settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Plausibility window applied when several amount candidates are scanned.
    pub amount_bounds: AmountBounds,

    /// Maximum length of an extracted recipient name, in characters.
    pub recipient_max_len: usize,

    /// Maximum length of an extracted vendor name, in characters.
    pub vendor_max_len: usize,

    /// Number of leading PDF pages to read text from.
    pub pdf_max_pages: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            amount_bounds: AmountBounds::default(),
            recipient_max_len: 40,
            vendor_max_len: 100,
            pdf_max_pages: 3,
        }
    }
}

impl DocsortConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn entity_classifier(&self) -> EntityClassifier {
        EntityClassifier::new(self.entities.clone())
    }

    pub fn document_extractor(&self) -> DocumentExtractor {
        DocumentExtractor::new(self.tabs.clone()).with_config(self.extraction.clone())
    }
}
