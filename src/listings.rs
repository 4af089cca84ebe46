//! Loading listing columns from a CSV export.

use anyhow::{Context, Result, anyhow};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use crate::value::ListingValue;

/// Which CSV headers hold the metric inputs.
///
/// Defaults match the public Airbnb `listings.csv` export.
#[derive(Debug, Clone)]
pub struct ColumnNames {
    pub id: String,
    pub price: String,
    pub reviews: String,
    pub availability: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            id: "id".to_string(),
            price: "price".to_string(),
            reviews: "number_of_reviews".to_string(),
            availability: "availability_365".to_string(),
        }
    }
}

/// Positionally aligned metric inputs, one entry per listing.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ListingColumns {
    /// Empty when the file has no id column.
    pub ids: Vec<String>,
    pub prices: Vec<ListingValue>,
    pub reviews: Vec<ListingValue>,
    pub avails: Vec<ListingValue>,
}

impl ListingColumns {
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

/// Reads the listing columns from the CSV file at `path`.
#[tracing::instrument(skip(columns))]
pub fn load_listings(path: &Path, columns: &ColumnNames) -> Result<ListingColumns> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open listings file {}", path.display()))?;
    let listings = read_listings(file, columns)?;
    info!(rows = listings.len(), "Listings loaded");
    Ok(listings)
}

/// Reads the listing columns from any CSV source with a header row.
pub fn read_listings<R: Read>(reader: R, columns: &ColumnNames) -> Result<ListingColumns> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = rdr.headers()?.clone();

    let position = |name: &str| headers.iter().position(|h| h.trim() == name);
    let required = |name: &str| {
        position(name).ok_or_else(|| anyhow!("Listings file has no '{}' column", name))
    };

    let price_idx = required(columns.price.as_str())?;
    let reviews_idx = required(columns.reviews.as_str())?;
    let avail_idx = required(columns.availability.as_str())?;
    let id_idx = position(columns.id.as_str());
    debug!(price_idx, reviews_idx, avail_idx, ?id_idx, "Resolved listing columns");

    let mut out = ListingColumns::default();

    for (row, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read listing row {}", row + 1))?;
        let cell = |idx: usize| match record.get(idx).map(str::trim) {
            None | Some("") => ListingValue::Null,
            Some(text) => ListingValue::Text(text.to_string()),
        };

        out.prices.push(cell(price_idx));
        out.reviews.push(cell(reviews_idx));
        out.avails.push(cell(avail_idx));
        if let Some(idx) = id_idx {
            out.ids.push(record.get(idx).unwrap_or_default().to_string());
        }
    }

    Ok(out)
}
