use crate::parser::{parse_number, parse_price};
use crate::value::ListingValue;

/// Divides each price by its review count.
///
/// Pairs are taken positionally and the result is as long as the shorter
/// input. Null or malformed prices and review counts read as `0.0`, and a
/// review count that is not positive yields `0.0`.
pub fn price_per_review(prices: &[ListingValue], reviews: &[ListingValue]) -> Vec<f64> {
    prices
        .iter()
        .zip(reviews)
        .map(|(p, r)| {
            let price = parse_price(p).or_fallback(0.0);
            let reviews = parse_number(r).or_fallback(0.0);
            if reviews > 0.0 { price / reviews } else { 0.0 }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_reviews() {
        assert_eq!(price_per_review(&[100_i64.into()], &[0_i64.into()]), vec![0.0]);
    }

    #[test]
    fn test_truncates_to_shorter_input() {
        let prices: Vec<ListingValue> = vec!["$50".into(), 100_i64.into()];
        assert_eq!(price_per_review(&prices, &[5_i64.into()]), vec![10.0]);
    }

    #[test]
    fn test_truncates_when_prices_are_shorter() {
        let reviews: Vec<ListingValue> = vec![1_i64.into(), 2_i64.into()];
        assert_eq!(price_per_review(&[10_i64.into()], &reviews), vec![10.0]);
        assert!(price_per_review(&[], &reviews).is_empty());
    }

    #[test]
    fn test_malformed_and_null_read_as_zero() {
        let prices: Vec<ListingValue> = vec!["abc".into(), ListingValue::Null, 120_i64.into(), 90_i64.into()];
        let reviews: Vec<ListingValue> = vec![4_i64.into(), 4_i64.into(), "many".into(), "$3".into()];
        assert_eq!(price_per_review(&prices, &reviews), vec![0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_trial_sample() {
        let prices: Vec<ListingValue> = vec![120_i64.into(), 45_i64.into(), "$200".into()];
        let reviews: Vec<ListingValue> = vec![10_i64.into(), 5_i64.into(), 0_i64.into()];
        assert_eq!(price_per_review(&prices, &reviews), vec![12.0, 9.0, 0.0]);
    }

    #[test]
    fn test_negative_reviews() {
        assert_eq!(price_per_review(&[80_i64.into()], &["-2".into()]), vec![0.0]);
    }
}
