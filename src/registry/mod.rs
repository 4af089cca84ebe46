//! Named, callable endpoints.
//!
//! A registry accepts a name, a callable and a description, lists what it
//! holds, and runs queries by name with positional JSON arguments. The four
//! listing metrics are deployed into a [`LocalRegistry`] by
//! [`deploy_builtins`]; a remote analytics server exposes the same
//! [`EndpointCatalog`] surface over HTTP.

pub mod builtins;
mod local;
pub mod verify;

pub use builtins::{BUILTINS, Builtin, deploy_builtins, trial_queries};
pub use local::LocalRegistry;
pub use verify::{Verdict, verify_builtins};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::RegistryError;

/// A deployable callable taking positional JSON arguments.
pub type Handler = Arc<dyn Fn(&[Value]) -> Result<Value, RegistryError> + Send + Sync>;

/// Metadata reported for one endpoint, using the field names of the
/// TabPy `/endpoints` listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointInfo {
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    #[serde(default)]
    pub version: u32,
    /// Unix seconds.
    #[serde(default)]
    pub creation_time: i64,
    /// Unix seconds.
    #[serde(default)]
    pub last_modified_time: i64,
}

fn default_kind() -> String {
    "function".to_string()
}

/// Endpoint name to metadata.
pub type EndpointListing = BTreeMap<String, EndpointInfo>;

/// Result of running a query against an endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub model: String,
    #[serde(default)]
    pub version: u32,
    pub response: Value,
}

/// Anything that can list endpoints and run queries against them.
#[async_trait::async_trait]
pub trait EndpointCatalog: Send + Sync {
    async fn list_endpoints(&self) -> Result<EndpointListing>;

    async fn query(&self, name: &str, args: &[Value]) -> Result<QueryResponse>;
}

/// Polls `catalog` until `name` shows up in its listing or `timeout` elapses.
///
/// Returns whether the endpoint was found along with the last listing that
/// could be fetched. Listing failures are logged and polling continues.
#[tracing::instrument(skip(catalog), fields(endpoint = %name))]
pub async fn wait_for_endpoint<C: EndpointCatalog + ?Sized>(
    catalog: &C,
    name: &str,
    timeout: Duration,
    interval: Duration,
) -> (bool, Option<EndpointListing>) {
    let deadline = tokio::time::Instant::now() + timeout;
    let mut last = None;

    loop {
        match catalog.list_endpoints().await {
            Ok(listing) => {
                let found = listing.contains_key(name);
                debug!(endpoints = listing.len(), found, "Polled endpoint listing");
                if found {
                    return (true, Some(listing));
                }
                last = Some(listing);
            }
            Err(e) => warn!(error = %e, "Failed to list endpoints"),
        }

        if tokio::time::Instant::now() + interval > deadline {
            return (false, last);
        }
        tokio::time::sleep(interval).await;
    }
}
