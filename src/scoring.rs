//! Per-listing rows combining all four metrics.

use serde::{Deserialize, Serialize};

use crate::error::MetricError;
use crate::listings::ListingColumns;
use crate::metrics::{
    PropertyCategory, availability_score, is_high_price, price_per_review, property_category,
};

/// Derived metrics for one listing, as written to the scored CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingMetrics {
    pub id: Option<String>,
    pub price: String,
    pub is_high_price: bool,
    pub property_category: PropertyCategory,
    pub price_per_review: f64,
    pub availability_score: u8,
}

/// Runs every metric over `listings` and zips the columns into rows.
///
/// # Errors
///
/// Fails if any non-empty price cannot be parsed, because
/// [`is_high_price`] does not recover from malformed prices.
#[tracing::instrument(skip(listings), fields(rows = listings.len()))]
pub fn score_listings(
    listings: &ListingColumns,
    threshold: f64,
) -> Result<Vec<ListingMetrics>, MetricError> {
    let high = is_high_price(&listings.prices, threshold)?;
    let categories = property_category(&listings.prices);
    let per_review = price_per_review(&listings.prices, &listings.reviews);
    let scores = availability_score(&listings.avails);

    let rows = (0..listings.len())
        .map(|i| ListingMetrics {
            id: listings.ids.get(i).cloned(),
            price: listings.prices[i].to_string(),
            is_high_price: high[i],
            property_category: categories[i],
            price_per_review: per_review.get(i).copied().unwrap_or(0.0),
            availability_score: scores.get(i).copied().unwrap_or(1),
        })
        .collect();

    Ok(rows)
}

/// Number of rows in each category, in tier order.
pub fn category_counts(rows: &[ListingMetrics]) -> Vec<(PropertyCategory, usize)> {
    use PropertyCategory::*;

    [Budget, MidRange, HighEnd, Luxury, Unknown]
        .into_iter()
        .map(|c| (c, rows.iter().filter(|r| r.property_category == c).count()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ListingValue;

    fn columns() -> ListingColumns {
        ListingColumns {
            ids: vec!["a".into(), "b".into(), "c".into()],
            prices: vec!["$1,200".into(), "$45".into(), ListingValue::Null],
            reviews: vec!["12".into(), ListingValue::Null, "3".into()],
            avails: vec!["365".into(), "0".into(), "183".into()],
        }
    }

    #[test]
    fn test_score_listings() {
        let rows = score_listings(&columns(), 100.0).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows[0],
            ListingMetrics {
                id: Some("a".to_string()),
                price: "$1,200".to_string(),
                is_high_price: true,
                property_category: PropertyCategory::Luxury,
                price_per_review: 100.0,
                availability_score: 5,
            }
        );
        assert_eq!(rows[1].property_category, PropertyCategory::Budget);
        assert_eq!(rows[1].price_per_review, 0.0);
        assert_eq!(rows[2].price, "");
        assert!(!rows[2].is_high_price);
        assert_eq!(rows[2].availability_score, 3);
    }

    #[test]
    fn test_no_ids() {
        let mut listings = columns();
        listings.ids.clear();
        let rows = score_listings(&listings, 100.0).unwrap();
        assert!(rows.iter().all(|r| r.id.is_none()));
    }

    #[test]
    fn test_malformed_price_fails_scoring() {
        let mut listings = columns();
        listings.prices[1] = "call us".into();
        let err = score_listings(&listings, 100.0).unwrap_err();
        assert_eq!(
            err,
            MetricError::MalformedPrice {
                index: 1,
                raw: "call us".to_string()
            }
        );
    }

    #[test]
    fn test_category_counts() {
        let rows = score_listings(&columns(), 100.0).unwrap();
        let counts = category_counts(&rows);
        assert_eq!(counts[0], (PropertyCategory::Budget, 1));
        assert_eq!(counts[3], (PropertyCategory::Luxury, 1));
        assert_eq!(counts[4], (PropertyCategory::Unknown, 1));
    }
}
