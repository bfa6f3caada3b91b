//! Text preparation shared by the entity classifier and the document extractor.

mod amount;
mod currency;

pub use amount::{
    amount_shape, first_plausible, format_european, parse_locale_amount, AmountBounds,
    NumberShape,
};
pub use currency::{currency_near, detect_document_currency, ExchangeRates};

/// Join fields with single spaces and lowercase the result.
pub fn to_search_text<I, S>(fields: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    fields
        .into_iter()
        .map(|f| f.as_ref().to_owned())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
