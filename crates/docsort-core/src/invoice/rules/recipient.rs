//! Counterparty names: the named customer and the issuing vendor.

use super::patterns::{RECIPIENTS, VENDOR};

/// First named customer found in `text`, cut to `max_len` characters. Empty if none.
pub fn extract_recipient(text: &str, max_len: usize) -> String {
    RECIPIENTS
        .iter()
        .find_map(|pattern| pattern.captures(text))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().chars().take(max_len).collect::<String>())
        .map(|name| name.trim_end().to_string())
        .unwrap_or_default()
}

/// Vendor named after a "from" or "furnizor" label, cut to `max_len` characters.
pub fn extract_vendor(text: &str, max_len: usize) -> Option<String> {
    VENDOR
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().chars().take(max_len).collect::<String>())
        .map(|name| name.trim_end().to_string())
        .filter(|name| !name.is_empty())
}
