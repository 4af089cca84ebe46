//! The listing metrics as registry endpoints.

use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::info;

use super::LocalRegistry;
use crate::error::RegistryError;
use crate::metrics::{
    DEFAULT_THRESHOLD, availability_score, is_high_price, price_per_review, property_category,
};
use crate::value::ListingValue;

/// One built-in metric endpoint.
pub struct Builtin {
    pub name: &'static str,
    pub description: &'static str,
    pub handler: fn(&[Value]) -> Result<Value, RegistryError>,
}

/// Every built-in endpoint, with the description it is deployed under.
pub static BUILTINS: &[Builtin] = &[
    Builtin {
        name: "is_high_price",
        description: "Return list of booleans True if price > threshold",
        handler: is_high_price_endpoint,
    },
    Builtin {
        name: "property_category",
        description: "Return list of category strings for given prices",
        handler: property_category_endpoint,
    },
    Builtin {
        name: "price_per_review",
        description: "Return price per review (float) for each item in list",
        handler: price_per_review_endpoint,
    },
    Builtin {
        name: "availability_score",
        description: "Return integer availability score (1-5) for each availability value",
        handler: availability_score_endpoint,
    },
];

/// Deploys every built-in metric into `registry`, replacing existing endpoints.
pub fn deploy_builtins(registry: &LocalRegistry) -> Result<(), RegistryError> {
    for builtin in BUILTINS {
        registry.deploy(builtin.name, builtin.handler, builtin.description, true)?;
    }

    info!(count = BUILTINS.len(), "Built-in metrics deployed");
    Ok(())
}

/// Sample arguments used to smoke-test each built-in endpoint.
pub fn trial_queries() -> Vec<(&'static str, Vec<Value>)> {
    vec![
        ("is_high_price", vec![json!([120, 45, null, "$200"]), json!(100)]),
        ("property_category", vec![json!([120, 45, null, "$200"])]),
        (
            "price_per_review",
            vec![json!([120, 45, "$200"]), json!([10, 5, 0])],
        ),
        ("availability_score", vec![json!([0, 120, 365, null])]),
    ]
}

fn is_high_price_endpoint(args: &[Value]) -> Result<Value, RegistryError> {
    check_arity("is_high_price", args, 1, 2, "1 or 2")?;
    let prices: Vec<ListingValue> = arg("is_high_price", args, 0)?;
    let threshold: Option<f64> = match args.get(1) {
        Some(_) => arg("is_high_price", args, 1)?,
        None => None,
    };

    let flags = is_high_price(&prices, threshold.unwrap_or(DEFAULT_THRESHOLD))?;
    Ok(serde_json::to_value(flags)?)
}

fn property_category_endpoint(args: &[Value]) -> Result<Value, RegistryError> {
    check_arity("property_category", args, 1, 1, "1")?;
    let prices: Vec<ListingValue> = arg("property_category", args, 0)?;
    Ok(serde_json::to_value(property_category(&prices))?)
}

fn price_per_review_endpoint(args: &[Value]) -> Result<Value, RegistryError> {
    check_arity("price_per_review", args, 2, 2, "2")?;
    let prices: Vec<ListingValue> = arg("price_per_review", args, 0)?;
    let reviews: Vec<ListingValue> = arg("price_per_review", args, 1)?;
    Ok(serde_json::to_value(price_per_review(&prices, &reviews))?)
}

fn availability_score_endpoint(args: &[Value]) -> Result<Value, RegistryError> {
    check_arity("availability_score", args, 1, 1, "1")?;
    let avails: Vec<ListingValue> = arg("availability_score", args, 0)?;
    Ok(serde_json::to_value(availability_score(&avails))?)
}

fn check_arity(
    name: &str,
    args: &[Value],
    min: usize,
    max: usize,
    expected: &'static str,
) -> Result<(), RegistryError> {
    if (min..=max).contains(&args.len()) {
        Ok(())
    } else {
        Err(RegistryError::Arity {
            name: name.to_string(),
            expected,
            got: args.len(),
        })
    }
}

fn arg<T: DeserializeOwned>(name: &str, args: &[Value], position: usize) -> Result<T, RegistryError> {
    serde_json::from_value(args[position].clone()).map_err(|source| RegistryError::InvalidArgument {
        name: name.to_string(),
        position,
        source,
    })
}
