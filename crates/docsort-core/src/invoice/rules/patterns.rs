//! Common regex patterns for invoice field extraction.
//!
//! English, Romanian and Greek documents are all in scope, so most patterns
//! are case-insensitive and accept the Greek omicron and `º`/`°` in `No`.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Invoice numbers, shared head of every chain
    pub static ref INVOICE_NO: Regex = Regex::new(
        r"(?i)INVOICE\s*N[oοº°]\.?\s*:?\s*(\d+)"
    ).unwrap();

    pub static ref FILENAME_INVOICE_NO: Regex = Regex::new(
        r"[Ii]nvoice\s*[Nn][oOοº°]?\s*(\d+)"
    ).unwrap();

    pub static ref FACTURA_NO: Regex = Regex::new(
        r"(?i)FACTURA\s+(?:FISCALĂ|SERIA)?\s*[\w\s]*?[:\s]*([A-Z]?\d+)"
    ).unwrap();

    // Tab fallbacks
    pub static ref JTAPE_PO: Regex = Regex::new(r"\b(J\d{4,6})\b").unwrap();

    pub static ref INVOICE_OR_PROFORMA_NO: Regex = Regex::new(
        r"(?i)(?:INVOICE|PROFORMA)\s*N[oοº°]?\.?\s*:?\s*(\d+)"
    ).unwrap();

    pub static ref FIRST_DIGITS: Regex = Regex::new(r"(\d+)").unwrap();

    pub static ref FILENAME_STEM: Regex = Regex::new(r"^([^.]+)").unwrap();

    pub static ref AMBA_PO_NO: Regex = Regex::new(
        r"(?i)PO\s*NO\.?\s*:?\s*([A-Z]?[-\d]+\w*)"
    ).unwrap();

    pub static ref AMBA_ORDER_NO: Regex = Regex::new(
        r"(?i)Order\s*No\.?\s*:?\s*(\d{6,})"
    ).unwrap();

    pub static ref SUPPLIER_INVOICE: Regex = Regex::new(r"(ΤΙΜ\d+)").unwrap();

    pub static ref SUPPLIER_DELIVERY: Regex = Regex::new(r"(ΔΑ\d+)").unwrap();

    pub static ref SUPPLIER_NUMBER: Regex = Regex::new(r"Νούμερο[^\d]*(\d+)").unwrap();

    pub static ref NR_FACTURA: Regex = Regex::new(
        r"(?i)Nr\.?\s*Factur[ia]+\s*:?\s*(\d+)"
    ).unwrap();

    pub static ref SERIA_NR: Regex = Regex::new(
        r"(?i)Seria\s+\w+\s+nr\.?:?\s*(\d+)"
    ).unwrap();

    pub static ref FILENAME_OSR: Regex = Regex::new(r"(?i)OSR[_-]?(\d+)").unwrap();

    pub static ref FILENAME_FACTURA_NR: Regex = Regex::new(
        r"(?i)Factura[_-]nr[_-]?(\w+)"
    ).unwrap();

    pub static ref FILENAME_FACTURA: Regex = Regex::new(r"(?i)factura[_-]?(\d+)").unwrap();

    pub static ref PROFORMA_NO: Regex = Regex::new(
        r"(?i)(?:PROFORMA|PRO\s*FORMA)\s*(?:INVOICE\s*)?N[oοº°]?\.?\s*:?\s*(\d+)"
    ).unwrap();

    pub static ref FILENAME_PROFORMA_NO: Regex = Regex::new(
        r"(?i)Proforma\s*No\s*(\d+)"
    ).unwrap();

    // Unclassified documents
    pub static ref GENERIC_INVOICE_REF: Regex = Regex::new(
        r"(?i)(?:invoice|factura|inv)[\s#:№.]*([A-Z]*[\d\-/]+)"
    ).unwrap();

    pub static ref GENERIC_NUMBER_REF: Regex = Regex::new(
        r"(?i)(?:nr\.?|numar|number)[\s:]*([A-Z]*[\d\-/]+)"
    ).unwrap();

    pub static ref GENERIC_DOCUMENT_REF: Regex = Regex::new(
        r"(?i)(?:document|doc)[\s#:]*([A-Z]*[\d\-/]+)"
    ).unwrap();

    // Dates
    pub static ref DATE_LABELED: Regex = Regex::new(
        r"(?i)Date\s*:?\s*(\d{1,2}[/.\-]\d{1,2}[/.\-]\d{2,4})"
    ).unwrap();

    pub static ref DATE_PURCHASE_ORDER: Regex = Regex::new(
        r"(?:Date|Purchase Order Date)\s*:?\s*(\d{1,2}[\s/.]\w+[\s/.]\d{2,4})"
    ).unwrap();

    pub static ref DATE_ROMANIAN: Regex = Regex::new(
        r"(?i)Data\s*\([^)]+\)\s*:?\s*(\d{1,2}[./\-]\d{1,2}[./\-]\d{2,4})"
    ).unwrap();

    pub static ref DATE_GENERIC_LABEL: Regex = Regex::new(
        r"(?i)(?:date|data)[\s:]*(\d{1,2}[/\-.]\d{1,2}[/\-.]\d{2,4})"
    ).unwrap();

    pub static ref DATE_BARE: Regex = Regex::new(
        r"\b(\d{1,2}[/\-.]\d{1,2}[/\-.]\d{4})\b"
    ).unwrap();

    // Totals: DFW
    pub static ref TOTAL_EUR: Regex = Regex::new(
        r"(?i)TOTAL\s*EUR\s*€?\s*([\d,.]+)"
    ).unwrap();

    pub static ref TOTAL_PLAIN: Regex = Regex::new(
        r"(?i)TOTAL\s*:?\s*€?\s*([\d,.]+)"
    ).unwrap();

    pub static ref AMOUNT_PLAIN: Regex = Regex::new(
        r"(?i)AMOUNT\s*:?\s*€?\s*([\d,.]+)"
    ).unwrap();

    pub static ref TOTAL_DE_PLATA: Regex = Regex::new(
        r"(?i)TOTAL\s*DE\s*PLAT[AĂ]\s*:?\s*€?\s*([\d,.]+)"
    ).unwrap();

    pub static ref TOTAL_FACTURA: Regex = Regex::new(
        r"(?i)TOTAL\s*FACTUR[AĂ]\s*:?\s*€?\s*([\d,.]+)"
    ).unwrap();

    pub static ref TOTAL_GENERAL: Regex = Regex::new(
        r"(?i)TOTAL\s*GENERAL\s*:?\s*€?\s*([\d,.]+)"
    ).unwrap();

    pub static ref DE_PLATA: Regex = Regex::new(
        r"(?i)DE\s*PLAT[AĂ]\s*:?\s*€?\s*([\d,.]+)"
    ).unwrap();

    // Totals: other tabs
    pub static ref TOTAL_POUND_OR_EURO: Regex = Regex::new(
        r"(?i)Total\s*[€£]?\s*:?\s*([\d.,]+)"
    ).unwrap();

    pub static ref TOTAL_OPTIONAL_EUR: Regex = Regex::new(
        r"(?i)TOTAL\s*(?:EUR)?\s*€?\s*([\d,.]+)"
    ).unwrap();

    pub static ref GREEK_NET_VALUE: Regex = Regex::new(
        r"Καθαρή Αξία:\s*([\d.,]+)"
    ).unwrap();

    pub static ref GREEK_TOTAL: Regex = Regex::new(r"Σύνολο[^\d]*([\d.,]+)").unwrap();

    pub static ref GREEK_VALUE_EUR: Regex = Regex::new(r"Αξία \(€\)[^\d]*([\d.,]+)").unwrap();

    pub static ref TOTAL_ROMANIAN: Regex = Regex::new(
        r"(?i)Total\s*(?:de plat[aă])?\s*:?\s*([\d.,]+)"
    ).unwrap();

    pub static ref TOTAL_LABELED: Regex = Regex::new(
        r"(?i)Total\s*(?:EUR|€)?\s*:?\s*€?\s*([\d.,]+)"
    ).unwrap();

    pub static ref TOTAL_AMOUNT: Regex = Regex::new(
        r"(?i)TOTAL\s+AMOUNT\s*€?\s*([\d.,]+)"
    ).unwrap();

    pub static ref GRAND_TOTAL: Regex = Regex::new(
        r"(?i)Grand\s*Total\s*:?\s*€?\s*([\d.,]+)"
    ).unwrap();

    pub static ref AMOUNT_DUE: Regex = Regex::new(
        r"(?i)Amount\s*Due\s*:?\s*€?\s*([\d.,]+)"
    ).unwrap();

    pub static ref GREEK_TOTAL_LABEL: Regex = Regex::new(r"Σύνολο\s*:?\s*([\d.,]+)").unwrap();

    pub static ref AMOUNT_PARENTHESIZED: Regex = Regex::new(
        r"(?i)AMOUNT\s*\(?\s*€?\s*\)?\s*([\d.,]+)"
    ).unwrap();

    // Currency-marked candidates for unclassified documents
    pub static ref CANDIDATE_LABELED: Regex = Regex::new(
        r"(?i)(?:total|amount|suma|valoare)[\s:]*(?:€|EUR|RON|USD|£)?\s*([\d,.]+)"
    ).unwrap();

    pub static ref CANDIDATE_EUR_BEFORE: Regex = Regex::new(r"(?i)(?:€|EUR)\s*([\d,.]+)").unwrap();

    pub static ref CANDIDATE_EUR_AFTER: Regex = Regex::new(r"(?i)([\d,.]+)\s*(?:€|EUR)").unwrap();

    pub static ref CANDIDATE_RON_BEFORE: Regex = Regex::new(r"(?i)(?:RON|Lei)\s*([\d,.]+)").unwrap();

    pub static ref CANDIDATE_RON_AFTER: Regex = Regex::new(r"(?i)([\d,.]+)\s*(?:RON|Lei)").unwrap();

    // Recipients
    pub static ref RECIPIENTS: Vec<Regex> = [
        r"(?i)(JTAPE\s+Limited)",
        r"(?i)(Amba\s+Group\s+Ltd)",
        r"(?i)(DTC\s+[A-Za-z\s]+Ltd)",
        r"(?i)(Bellini[^\n]{0,30})",
        r"(?i)(Bodyshop[^\n]{0,30})",
        r"(?i)(BAXT[^\n]{0,30})",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect();

    // Issuer named after "from" / "de la" / "furnizor", on one line
    pub static ref VENDOR: Regex = Regex::new(
        r"(?i)\b(?:from|de la|furnizor)[\s:]*([A-Z][A-Z \t]*)"
    ).unwrap();

    // Document kind
    pub static ref FILENAME_PO_TOKEN: Regex = Regex::new(r"(?i)(?:^|[^A-Z])PO(?:[^A-Z]|$)").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invoice_no_variants() {
        assert_eq!(&INVOICE_NO.captures("INVOICE No 63").unwrap()[1], "63");
        assert_eq!(&INVOICE_NO.captures("Invoice Nº: 7").unwrap()[1], "7");
        assert_eq!(&INVOICE_NO.captures("INVOICE Nο.12").unwrap()[1], "12");
        assert!(INVOICE_NO.captures("INVOICE 63").is_none());
    }

    #[test]
    fn test_filename_invoice_no_is_case_sensitive_on_word() {
        assert_eq!(&FILENAME_INVOICE_NO.captures("Invoice No 44.pdf").unwrap()[1], "44");
        assert!(FILENAME_INVOICE_NO.captures("INVOICE_2025_OSR.pdf").is_none());
    }

    #[test]
    fn test_greek_patterns() {
        assert_eq!(&SUPPLIER_INVOICE.captures("ΤΙΜ0042 Rotopak.pdf").unwrap()[1], "ΤΙΜ0042");
        assert_eq!(&GREEK_NET_VALUE.captures("Καθαρή Αξία: 1.200,50").unwrap()[1], "1.200,50");
        assert_eq!(&SUPPLIER_NUMBER.captures("Νούμερο: 881").unwrap()[1], "881");
    }

    #[test]
    fn test_filename_po_token() {
        assert!(FILENAME_PO_TOKEN.is_match("PO 4410.pdf"));
        assert!(FILENAME_PO_TOKEN.is_match("amba_po_4410.pdf"));
        assert!(!FILENAME_PO_TOKEN.is_match("REPORT.pdf"));
    }

    #[test]
    fn test_date_patterns() {
        assert_eq!(&DATE_LABELED.captures("Date: 12/03/2024").unwrap()[1], "12/03/2024");
        assert_eq!(
            &DATE_ROMANIAN.captures("Data (zi/luna/an): 05.02.2024").unwrap()[1],
            "05.02.2024"
        );
        assert_eq!(
            &DATE_PURCHASE_ORDER.captures("Purchase Order Date: 14 March 2024").unwrap()[1],
            "14 March 2024"
        );
    }
}
