//! Shared conversion of listing cells into floats.
//!
//! Every metric goes through [`parse_price`] or [`parse_number`] and then
//! decides for itself whether a malformed cell falls back to a default
//! ([`ParseOutcome::or_fallback`]) or fails the call ([`ParseOutcome::into_result`]).

use crate::error::MetricError;
use crate::value::ListingValue;

/// Result of converting one cell.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    /// The cell was null.
    Missing,
    Parsed(f64),
    /// The cell held text that is not a float; the text is kept for error reporting.
    Malformed(String),
}

impl ParseOutcome {
    /// Returns the parsed value, or `fallback` for missing and malformed cells.
    pub fn or_fallback(self, fallback: f64) -> f64 {
        match self {
            ParseOutcome::Parsed(v) => v,
            ParseOutcome::Missing | ParseOutcome::Malformed(_) => fallback,
        }
    }

    /// Returns `Ok(None)` for missing cells and an error for malformed ones.
    pub fn into_result(self, index: usize) -> Result<Option<f64>, MetricError> {
        match self {
            ParseOutcome::Missing => Ok(None),
            ParseOutcome::Parsed(v) => Ok(Some(v)),
            ParseOutcome::Malformed(raw) => Err(MetricError::MalformedPrice { index, raw }),
        }
    }
}

/// Parses a monetary cell such as `"$1,200"`, dropping every `$` and `,` first.
pub fn parse_price(value: &ListingValue) -> ParseOutcome {
    match value {
        ListingValue::Null => ParseOutcome::Missing,
        ListingValue::Number(n) => ParseOutcome::Parsed(*n),
        ListingValue::Text(raw) => {
            let stripped: String = raw.chars().filter(|c| *c != '$' && *c != ',').collect();
            parse_float(raw, &stripped)
        }
    }
}

/// Parses a plain numeric cell. Currency formatting is not accepted here.
pub fn parse_number(value: &ListingValue) -> ParseOutcome {
    match value {
        ListingValue::Null => ParseOutcome::Missing,
        ListingValue::Number(n) => ParseOutcome::Parsed(*n),
        ListingValue::Text(raw) => parse_float(raw, raw),
    }
}

fn parse_float(raw: &str, text: &str) -> ParseOutcome {
    let parsed = strip_digit_separators(text.trim()).and_then(|t| t.parse::<f64>().ok());
    match parsed {
        Some(v) => ParseOutcome::Parsed(v),
        None => ParseOutcome::Malformed(raw.to_string()),
    }
}

/// Drops `_` separators such as in `"1_000"`. An underscore is only a
/// separator when it sits between two ASCII digits; any other makes the text
/// unparseable.
fn strip_digit_separators(text: &str) -> Option<String> {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    for (i, c) in text.char_indices() {
        if c == '_' {
            let before = i.checked_sub(1).map(|j| bytes[j]);
            let after = bytes.get(i + 1).copied();
            let between_digits = before.is_some_and(|b| b.is_ascii_digit())
                && after.is_some_and(|b| b.is_ascii_digit());
            if !between_digits {
                return None;
            }
        } else {
            out.push(c);
        }
    }
    Some(out)
}
