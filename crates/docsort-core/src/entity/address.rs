//! From-header parsing.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref ANGLE_ADDRESS: Regex = Regex::new(r"<([^>]+@[^>]+)>").unwrap();
    static ref BARE_ADDRESS: Regex = Regex::new(r"[\w.\-]+@[\w.\-]+\.\w+").unwrap();
    static ref DISPLAY_NAME: Regex = Regex::new(r"^([^<]+)").unwrap();
}

/// Lowercased address from a From header, or an empty string.
pub fn extract_address(from_header: &str) -> String {
    if let Some(caps) = ANGLE_ADDRESS.captures(from_header) {
        return caps[1].trim().to_lowercase();
    }
    BARE_ADDRESS
        .find(from_header)
        .map(|m| m.as_str().to_lowercase())
        .unwrap_or_default()
}

/// Text before `<`, trimmed and unquoted; else the local part of `address`.
pub fn display_name(from_header: &str, address: &str) -> String {
    let name = DISPLAY_NAME
        .captures(from_header)
        .map(|caps| caps[1].trim().trim_matches('"').trim().to_string())
        .unwrap_or_default();
    if name.is_empty() {
        local_part(address).to_string()
    } else {
        name
    }
}

/// Everything after the last `@`, or empty.
pub fn domain_of(address: &str) -> &str {
    address.rsplit_once('@').map_or("", |(_, domain)| domain)
}

pub fn local_part(address: &str) -> &str {
    address.split('@').next().unwrap_or_default()
}

/// First domain label, title-cased (`jtape.com` becomes `Jtape`).
pub fn company_of(domain: &str) -> String {
    let label = domain.split('.').next().unwrap_or_default();
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_address() {
        assert_eq!(extract_address("Jane Doe <Jane@JTape.com>"), "jane@jtape.com");
        assert_eq!(extract_address("ops@gavagroup.com (Ops)"), "ops@gavagroup.com");
        assert_eq!(extract_address("Undisclosed recipients"), "");
        assert_eq!(extract_address(""), "");
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("\"Jane Doe\" <jane@jtape.com>", "jane@jtape.com"), "Jane Doe");
        assert_eq!(display_name("<jane@jtape.com>", "jane@jtape.com"), "jane");
        assert_eq!(display_name("jane@jtape.com", "jane@jtape.com"), "jane@jtape.com");
    }

    #[test]
    fn test_domain_and_company() {
        assert_eq!(domain_of("jane@mail.jtape.com"), "mail.jtape.com");
        assert_eq!(domain_of("nobody"), "");
        assert_eq!(company_of("smarttax.ro"), "Smarttax");
        assert_eq!(company_of(""), "");
    }
}
