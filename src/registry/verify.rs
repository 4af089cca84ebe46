//! Checking a remote catalog against the local built-in endpoints.

use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tracing::{error, info, warn};

use super::{EndpointCatalog, trial_queries, wait_for_endpoint};

const FLOAT_TOLERANCE: f64 = 1e-9;

/// What happened when one endpoint was checked.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// Remote and local answered the trial query identically.
    Matched,
    /// The endpoint never appeared in the remote listing.
    Missing,
    Mismatch { local: Value, remote: Value },
    /// A query failed on either side.
    Failed(String),
}

impl Verdict {
    pub fn is_ok(&self) -> bool {
        matches!(self, Verdict::Matched)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Matched => f.write_str("matched"),
            Verdict::Missing => f.write_str("missing"),
            Verdict::Mismatch { local, remote } => {
                write!(f, "mismatch (local {local}, remote {remote})")
            }
            Verdict::Failed(e) => write!(f, "failed: {e}"),
        }
    }
}

/// Waits for each built-in endpoint on `remote`, runs its trial query on both
/// sides and compares the answers.
pub async fn verify_builtins<R, L>(
    remote: &R,
    local: &L,
    timeout: Duration,
    interval: Duration,
) -> Vec<(&'static str, Verdict)>
where
    R: EndpointCatalog + ?Sized,
    L: EndpointCatalog + ?Sized,
{
    let mut results = Vec::new();

    for (name, args) in trial_queries() {
        let verdict = verify_one(remote, local, name, &args, timeout, interval).await;
        match &verdict {
            Verdict::Matched => info!(endpoint = name, "Endpoint verified"),
            Verdict::Missing => warn!(endpoint = name, "Timed out waiting for endpoint"),
            other => error!(endpoint = name, verdict = %other, "Endpoint check failed"),
        }
        results.push((name, verdict));
    }

    results
}

async fn verify_one<R, L>(
    remote: &R,
    local: &L,
    name: &str,
    args: &[Value],
    timeout: Duration,
    interval: Duration,
) -> Verdict
where
    R: EndpointCatalog + ?Sized,
    L: EndpointCatalog + ?Sized,
{
    let (found, _) = wait_for_endpoint(remote, name, timeout, interval).await;
    if !found {
        return Verdict::Missing;
    }

    let remote_resp = match remote.query(name, args).await {
        Ok(resp) => resp.response,
        Err(e) => return Verdict::Failed(format!("remote query: {e}")),
    };
    let local_resp = match local.query(name, args).await {
        Ok(resp) => resp.response,
        Err(e) => return Verdict::Failed(format!("local query: {e}")),
    };

    if responses_match(&local_resp, &remote_resp) {
        Verdict::Matched
    } else {
        Verdict::Mismatch {
            local: local_resp,
            remote: remote_resp,
        }
    }
}

/// Structural JSON equality where numbers compare by value, so `12` equals `12.0`.
pub fn responses_match(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => (x - y).abs() <= FLOAT_TOLERANCE * x.abs().max(1.0),
            _ => x == y,
        },
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| responses_match(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).is_some_and(|y| responses_match(x, y)))
        }
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{LocalRegistry, deploy_builtins};
    use serde_json::json;

    fn builtins() -> LocalRegistry {
        let registry = LocalRegistry::new();
        deploy_builtins(&registry).unwrap();
        registry
    }

    #[test]
    fn test_numbers_compare_by_value() {
        assert!(responses_match(&json!([12, 9.0, 0]), &json!([12.0, 9, 0.0])));
        assert!(!responses_match(&json!([1, 2]), &json!([1, 3])));
        assert!(!responses_match(&json!([1, 2]), &json!([1, 2, 3])));
        assert!(!responses_match(&json!("1"), &json!(1)));
        assert!(responses_match(&json!({"a": [1]}), &json!({"a": [1.0]})));
    }

    #[tokio::test]
    async fn test_identical_catalogs_match() {
        let results = verify_builtins(
            &builtins(),
            &builtins(),
            Duration::from_millis(20),
            Duration::from_millis(5),
        )
        .await;

        assert_eq!(results.len(), 4);
        assert!(results.iter().all(|(_, v)| v.is_ok()));
    }

    #[tokio::test]
    async fn test_detects_missing_and_divergent_endpoints() {
        let remote = builtins();
        assert!(remote.remove("availability_score"));
        remote
            .deploy(
                "property_category",
                |_: &[Value]| Ok(json!(["Luxury"])),
                "tampered",
                true,
            )
            .unwrap();

        let results = verify_builtins(
            &remote,
            &builtins(),
            Duration::from_millis(20),
            Duration::from_millis(5),
        )
        .await;

        let verdict = |name: &str| {
            results
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, v)| v.clone())
                .unwrap()
        };
        assert_eq!(verdict("is_high_price"), Verdict::Matched);
        assert_eq!(verdict("availability_score"), Verdict::Missing);
        assert!(matches!(verdict("property_category"), Verdict::Mismatch { .. }));
    }

    #[tokio::test]
    async fn test_remote_failure_is_reported() {
        let remote = builtins();
        remote
            .deploy(
                "price_per_review",
                |_: &[Value]| Err(crate::error::RegistryError::UnknownEndpoint("boom".into())),
                "broken",
                true,
            )
            .unwrap();

        let results = verify_builtins(
            &remote,
            &builtins(),
            Duration::from_millis(20),
            Duration::from_millis(5),
        )
        .await;

        let (_, verdict) = results.iter().find(|(n, _)| *n == "price_per_review").unwrap();
        assert!(matches!(verdict, Verdict::Failed(msg) if msg.starts_with("remote query")));
    }
}
