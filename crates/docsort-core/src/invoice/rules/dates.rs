//! Invoice date extraction. Dates are kept exactly as written.

use super::patterns::{
    DATE_BARE, DATE_GENERIC_LABEL, DATE_LABELED, DATE_PURCHASE_ORDER, DATE_ROMANIAN,
};
use super::{group, ExtractionMatch, FieldContext, FieldExtractor, FirstMatch};
use crate::models::document::Tab;

/// Tabs only read labeled dates. Unclassified documents also take the
/// first bare `dd.mm.yyyy` in the text.
pub fn date_rules(tab: Tab) -> FirstMatch<String> {
    match tab {
        Tab::None => FirstMatch::new()
            .text(&DATE_GENERIC_LABEL, group)
            .text(&DATE_BARE, group),
        // Amba purchase orders spell the month out
        Tab::Amba => FirstMatch::new()
            .text(&DATE_PURCHASE_ORDER, group)
            .text(&DATE_LABELED, group),
        Tab::Contrast => FirstMatch::new()
            .text(&DATE_ROMANIAN, group)
            .text(&DATE_LABELED, group),
        _ => FirstMatch::new()
            .text(&DATE_LABELED, group)
            .text(&DATE_ROMANIAN, group),
    }
}

pub fn extract_date(tab: Tab, ctx: &FieldContext<'_>) -> Option<ExtractionMatch<String>> {
    date_rules(tab).extract(ctx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(tab: Tab, text: &str) -> Option<String> {
        extract_date(tab, &FieldContext::new(text, "")).map(|m| m.value)
    }

    #[test]
    fn test_labeled_date() {
        assert_eq!(
            date(Tab::Dfw, "Due 01.01.2025\nDate: 15/12/2024").as_deref(),
            Some("15/12/2024")
        );
        assert_eq!(
            date(Tab::Jtape, "Order Date: 03/04/2024").as_deref(),
            Some("03/04/2024")
        );
        assert_eq!(date(Tab::Dfw, "no date"), None);
    }

    #[test]
    fn test_tabs_ignore_unlabeled_dates() {
        assert_eq!(date(Tab::Dfw, "Issued 01.01.2025"), None);
        assert_eq!(date(Tab::Jtape, "JTAPE order\nQty 50 rolls 1200\n"), None);
        assert_eq!(date(Tab::Jtape, "Delivered 14 March 2024"), None);
    }

    #[test]
    fn test_unclassified_bare_fallback() {
        assert_eq!(date(Tab::None, "Issued 01.01.2025").as_deref(), Some("01.01.2025"));
        assert_eq!(
            date(Tab::None, "Data: 05-02-24 sent 01.01.2025").as_deref(),
            Some("05-02-24")
        );
        assert_eq!(date(Tab::None, "Qty 50 rolls 1200"), None);
    }

    #[test]
    fn test_romanian_label() {
        assert_eq!(
            date(Tab::Contrast, "Data (zi/luna/an): 05.02.2024").as_deref(),
            Some("05.02.2024")
        );
    }

    #[test]
    fn test_amba_month_names() {
        assert_eq!(
            date(Tab::Amba, "Purchase Order Date: 14 March 2024").as_deref(),
            Some("14 March 2024")
        );
    }
}
