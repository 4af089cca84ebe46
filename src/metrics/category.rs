use serde::{Deserialize, Serialize};
use std::fmt;

use crate::parser::{ParseOutcome, parse_price};
use crate::value::ListingValue;

/// Price tier of a listing.
///
/// | Price          | Tier      |
/// |----------------|-----------|
/// | <= 50          | Budget    |
/// | <= 100         | Mid-range |
/// | <= 200         | High-end  |
/// | > 200          | Luxury    |
/// | null/malformed | Unknown   |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyCategory {
    Unknown,
    Budget,
    #[serde(rename = "Mid-range")]
    MidRange,
    #[serde(rename = "High-end")]
    HighEnd,
    Luxury,
}

impl PropertyCategory {
    pub fn from_price(v: f64) -> Self {
        match v {
            v if v <= 50.0 => PropertyCategory::Budget,
            v if v <= 100.0 => PropertyCategory::MidRange,
            v if v <= 200.0 => PropertyCategory::HighEnd,
            _ => PropertyCategory::Luxury,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyCategory::Unknown => "Unknown",
            PropertyCategory::Budget => "Budget",
            PropertyCategory::MidRange => "Mid-range",
            PropertyCategory::HighEnd => "High-end",
            PropertyCategory::Luxury => "Luxury",
        }
    }
}

impl fmt::Display for PropertyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Buckets each price into a [`PropertyCategory`].
pub fn property_category(prices: &[ListingValue]) -> Vec<PropertyCategory> {
    prices
        .iter()
        .map(|p| match parse_price(p) {
            ParseOutcome::Parsed(v) => PropertyCategory::from_price(v),
            ParseOutcome::Missing | ParseOutcome::Malformed(_) => PropertyCategory::Unknown,
        })
        .collect()
}
