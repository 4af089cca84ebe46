use crate::error::MetricError;
use crate::parser::parse_price;
use crate::value::ListingValue;

/// Price above which a listing counts as high-priced when no threshold is given.
pub const DEFAULT_THRESHOLD: f64 = 100.0;

/// Flags each price strictly greater than `threshold`. Null prices are `false`.
///
/// Unlike the other metrics this one does not swallow malformed input: the
/// first price that cannot be read as a float fails the whole call.
///
/// # Errors
///
/// Returns [`MetricError::MalformedPrice`] naming the offending index.
pub fn is_high_price(prices: &[ListingValue], threshold: f64) -> Result<Vec<bool>, MetricError> {
    prices
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let price = parse_price(p).into_result(i)?;
            Ok(price.is_some_and(|v| v > threshold))
        })
        .collect()
}
