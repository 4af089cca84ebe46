use crate::parser::parse_number;
use crate::value::ListingValue;

/// Days in the availability window.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Maps days of availability onto an integer score from 1 to 5.
///
/// The day count is clamped into `[0, 365]`, scaled to `[0, 4]` and rounded
/// half to even, then shifted up by one. Null, malformed and NaN cells score 1.
pub fn availability_score(avails: &[ListingValue]) -> Vec<u8> {
    avails
        .iter()
        .map(|a| {
            let days = parse_number(a).or_fallback(0.0);
            score_days(days)
        })
        .collect()
}

fn score_days(days: f64) -> u8 {
    if days.is_nan() {
        return 1;
    }
    let fraction = days.clamp(0.0, DAYS_PER_YEAR) / DAYS_PER_YEAR;
    let score = (fraction * 4.0).round_ties_even() as i64 + 1;
    score.clamp(1, 5) as u8
}
