//! Rule-based field extractors for invoice documents.
//!
//! Every field is an ordered list of `(pattern, scope, extract)` rules run by
//! one [`FirstMatch`] combinator: the first rule whose pattern matches and
//! whose extract function yields a value wins.

pub mod amounts;
pub mod dates;
pub mod numbers;
pub mod patterns;
pub mod recipient;

pub use amounts::{extract_total, AmountMatch};
pub use dates::extract_date;
pub use numbers::extract_invoice_number;
pub use recipient::{extract_recipient, extract_vendor};

use regex::{Captures, Regex};
use tracing::trace;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from a document.
    fn extract(&self, ctx: &FieldContext<'_>) -> Option<Self::Output>;

    /// Extract all occurrences of the field, rule by rule.
    fn extract_all(&self, ctx: &FieldContext<'_>) -> Vec<Self::Output>;
}

/// A value pulled out of a document.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Index of the rule that produced it.
    pub rule: usize,
    /// Byte span of the captured value in the scoped haystack.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, rule: usize, source: impl Into<String>) -> Self {
        Self {
            value,
            rule,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}

/// Which part of the document a rule searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Text,
    Filename,
    /// Text and filename joined by a space.
    TextAndFilename,
}

/// Text and filename of the document under extraction.
#[derive(Debug, Clone)]
pub struct FieldContext<'a> {
    pub text: &'a str,
    pub filename: &'a str,
    combined: String,
}

impl<'a> FieldContext<'a> {
    pub fn new(text: &'a str, filename: &'a str) -> Self {
        Self {
            text,
            filename,
            combined: format!("{text} {filename}"),
        }
    }

    pub fn scoped(&self, scope: Scope) -> &str {
        match scope {
            Scope::Text => self.text,
            Scope::Filename => self.filename,
            Scope::TextAndFilename => &self.combined,
        }
    }
}

/// Turns a successful pattern match into a value, or declines it.
pub type Extract<T> = fn(&Captures<'_>) -> Option<T>;

/// One ordered extraction rule.
pub struct Rule<T> {
    pattern: &'static Regex,
    scope: Scope,
    extract: Extract<T>,
}

impl<T> Rule<T> {
    fn run(&self, index: usize, caps: &Captures<'_>) -> Option<ExtractionMatch<T>> {
        let value = (self.extract)(caps)?;
        let whole = caps.get(0)?;
        let span = caps.get(1).unwrap_or(whole);
        Some(ExtractionMatch::new(value, index, whole.as_str()).with_position(span.start(), span.end()))
    }
}

/// Ordered rules, first successful one wins.
pub struct FirstMatch<T> {
    rules: Vec<Rule<T>>,
}

impl<T> FirstMatch<T> {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn rule(mut self, pattern: &'static Regex, scope: Scope, extract: Extract<T>) -> Self {
        self.rules.push(Rule {
            pattern,
            scope,
            extract,
        });
        self
    }

    pub fn text(self, pattern: &'static Regex, extract: Extract<T>) -> Self {
        self.rule(pattern, Scope::Text, extract)
    }

    pub fn filename(self, pattern: &'static Regex, extract: Extract<T>) -> Self {
        self.rule(pattern, Scope::Filename, extract)
    }

    /// Append another chain's rules after this one's.
    pub fn then(mut self, other: FirstMatch<T>) -> Self {
        self.rules.extend(other.rules);
        self
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<T> Default for FirstMatch<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FieldExtractor for FirstMatch<T> {
    type Output = ExtractionMatch<T>;

    fn extract(&self, ctx: &FieldContext<'_>) -> Option<Self::Output> {
        self.rules.iter().enumerate().find_map(|(index, rule)| {
            let caps = rule.pattern.captures(ctx.scoped(rule.scope))?;
            let found = rule.run(index, &caps);
            if found.is_none() {
                trace!(rule = index, matched = &caps[0], "pattern matched but yielded no value");
            }
            found
        })
    }

    fn extract_all(&self, ctx: &FieldContext<'_>) -> Vec<Self::Output> {
        self.rules
            .iter()
            .enumerate()
            .flat_map(|(index, rule)| {
                rule.pattern
                    .captures_iter(ctx.scoped(rule.scope))
                    .filter_map(move |caps| rule.run(index, &caps))
            })
            .collect()
    }
}

/// Capture group 1, trimmed, when non-empty.
pub fn group(caps: &Captures<'_>) -> Option<String> {
    caps.get(1)
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Digits of capture group 1, when there are any.
pub fn group_digits(caps: &Captures<'_>) -> Option<String> {
    let digits: String = caps.get(1)?.as_str().chars().filter(char::is_ascii_digit).collect();
    (!digits.is_empty()).then_some(digits)
}

/// Capture group 1 when it contains at least one digit.
pub fn group_with_digit(caps: &Captures<'_>) -> Option<String> {
    group(caps).filter(|s| s.chars().any(|c| c.is_ascii_digit()))
}
