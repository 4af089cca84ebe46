//! Derived listing metrics.
//!
//! Each function takes one or more columns of raw listing cells and returns a
//! column of derived values at the same positions. All of them are pure.

pub mod availability;
pub mod category;
pub mod price;
pub mod review;

pub use availability::availability_score;
pub use category::{PropertyCategory, property_category};
pub use price::{DEFAULT_THRESHOLD, is_high_price};
pub use review::price_per_review;
