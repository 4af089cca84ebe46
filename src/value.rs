//! Scalar cell values as they arrive from listing exports and query payloads.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One field of one listing: a number, raw text, or nothing at all.
///
/// Deserializes untagged, so JSON `null`, `120` and `"$1,200"` map to
/// [`ListingValue::Null`], [`ListingValue::Number`] and [`ListingValue::Text`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListingValue {
    #[default]
    Null,
    Number(f64),
    Text(String),
}

impl ListingValue {
    pub fn is_null(&self) -> bool {
        matches!(self, ListingValue::Null)
    }
}

impl fmt::Display for ListingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListingValue::Null => Ok(()),
            ListingValue::Number(n) => write!(f, "{n}"),
            ListingValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for ListingValue {
    fn from(n: f64) -> Self {
        ListingValue::Number(n)
    }
}

impl From<i64> for ListingValue {
    fn from(n: i64) -> Self {
        ListingValue::Number(n as f64)
    }
}

impl From<&str> for ListingValue {
    fn from(s: &str) -> Self {
        ListingValue::Text(s.to_string())
    }
}

impl From<String> for ListingValue {
    fn from(s: String) -> Self {
        ListingValue::Text(s)
    }
}

impl<T: Into<ListingValue>> From<Option<T>> for ListingValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or_default()
    }
}
