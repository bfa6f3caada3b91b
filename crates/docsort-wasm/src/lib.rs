//! WASM bindings for docsort.
//!
//! Sender classification, document extraction and batch views for use in
//! browsers and Node.js. PDF text has to be extracted on the JS side.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use docsort_core::invoice::BatchEntry;
use docsort_core::mail::scan_invoice_mentions;
use docsort_core::report::{number_gaps, summarize};
use docsort_core::text::format_european;
use docsort_core::{
    parse_locale_amount, CategoryOverrides, DocsortConfig, DocumentExtractor, EntityClassifier,
    InvoiceExtractor, MailMessage, ManualOverrides, RawDocument, TabBatch,
};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// `undefined` and `null` read as the type's default.
fn from_js<T: serde::de::DeserializeOwned + Default>(value: JsValue) -> Result<T, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(T::default());
    }
    serde_wasm_bindgen::from_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Classify a sender with the default rule tables.
///
/// `overrides` is an optional `{ domain: category }` object.
#[wasm_bindgen]
pub fn classify_sender(
    from: &str,
    subject: &str,
    body: &str,
    overrides: JsValue,
) -> Result<JsValue, JsValue> {
    let overrides: CategoryOverrides = from_js(overrides)?;
    let classification =
        EntityClassifier::default().classify(from, body, subject, &overrides);
    to_js(&classification)
}

/// Classify a document into a tab and extract its fields with the default rules.
#[wasm_bindgen]
pub fn extract_document(text: &str, filename: &str) -> Result<JsValue, JsValue> {
    let invoice = DocumentExtractor::default().extract(&RawDocument::new(text, filename));
    to_js(&invoice)
}

/// Parse a locale-formatted amount (e.g. "1.234,56" or "4,070.00").
/// Returns the plain decimal string.
#[wasm_bindgen]
pub fn parse_amount(raw: &str) -> Option<String> {
    parse_locale_amount(raw).ok().map(|d| d.to_string())
}

/// Format an amount European style (1.234,56).
#[wasm_bindgen]
pub fn format_amount(raw: &str) -> Option<String> {
    parse_locale_amount(raw).ok().map(format_european)
}

/// A configured pipeline, for callers that load their own rule file.
#[wasm_bindgen]
pub struct Pipeline {
    config: DocsortConfig,
    classifier: EntityClassifier,
    extractor: DocumentExtractor,
}

#[wasm_bindgen]
impl Pipeline {
    /// Build from a JSON config, or the defaults when none is given.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<Pipeline, JsValue> {
        let config: DocsortConfig = match config_json {
            Some(json) => {
                serde_json::from_str(&json).map_err(|e| JsValue::from_str(&e.to_string()))?
            }
            None => DocsortConfig::default(),
        };
        Ok(Self::from_config(config))
    }

    /// Current configuration as JSON.
    #[wasm_bindgen]
    pub fn config_json(&self) -> Result<String, JsValue> {
        serde_json::to_string_pretty(&self.config).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen]
    pub fn classify(
        &self,
        from: &str,
        subject: &str,
        body: &str,
        overrides: JsValue,
    ) -> Result<JsValue, JsValue> {
        let overrides: CategoryOverrides = from_js(overrides)?;
        to_js(&self.classifier.classify(from, body, subject, &overrides))
    }

    /// Extract one document. `overrides` is an optional `ManualOverrides` object.
    #[wasm_bindgen]
    pub fn extract(&self, text: &str, filename: &str, overrides: JsValue) -> Result<JsValue, JsValue> {
        let overrides: ManualOverrides = from_js(overrides)?;
        let invoice = self
            .extractor
            .extract_with_overrides(&RawDocument::new(text, filename), &overrides);
        to_js(&invoice)
    }

    /// Invoice mentions in one message.
    #[wasm_bindgen]
    pub fn scan_mentions(&self, from: &str, subject: &str, body: &str) -> Result<JsValue, JsValue> {
        let message = MailMessage::new(from, subject, body);
        to_js(&scan_invoice_mentions(
            &message,
            &self.config.extraction.amount_bounds,
        ))
    }

    /// Direction of an invoice mail relative to the house mailboxes, or `null`.
    #[wasm_bindgen]
    pub fn direction(&self, from: &str, to: &str, subject: &str, body: &str) -> Option<String> {
        let message = MailMessage::new(from, subject, body).to(to);
        self.config
            .directions
            .direction(&message)
            .map(|d| d.as_str().to_string())
    }

    /// Per-tab views, EUR totals and number gaps for an ordered list of
    /// `{ document, overrides }` entries.
    #[wasm_bindgen]
    pub fn batch(&self, entries: JsValue) -> Result<JsValue, JsValue> {
        let entries: Vec<BatchEntry> = from_js(entries)?;
        let batch = TabBatch::run(&self.extractor, &self.config.tabs, &entries);
        let totals = summarize(&batch, &self.config.rates);
        let gaps = number_gaps(&batch, &self.config.tabs);

        #[derive(Serialize)]
        struct BatchResult<'a> {
            tabs: Vec<&'a docsort_core::invoice::TabView>,
            totals: Vec<docsort_core::report::TabTotals>,
            gaps: Vec<docsort_core::report::NumberGaps>,
            hidden: usize,
        }

        to_js(&BatchResult {
            tabs: batch.views().collect(),
            totals,
            gaps,
            hidden: batch.hidden(),
        })
    }
}

impl Pipeline {
    fn from_config(config: DocsortConfig) -> Self {
        Self {
            classifier: config.entity_classifier(),
            extractor: config.document_extractor(),
            config,
        }
    }
}
