use anyhow::Result;
use chrono::Utc;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info};

use super::{EndpointCatalog, EndpointInfo, EndpointListing, Handler, QueryResponse};
use crate::error::RegistryError;

struct Endpoint {
    info: EndpointInfo,
    handler: Handler,
}

/// In-process function registry.
///
/// Endpoints are versioned: the first deploy of a name is version 1 and every
/// override bumps it by one while keeping the original creation time.
#[derive(Default)]
pub struct LocalRegistry {
    endpoints: RwLock<HashMap<String, Endpoint>>,
}

impl LocalRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::AlreadyExists`] if `name` is taken and
    /// `override_existing` is false.
    pub fn deploy<F>(
        &self,
        name: &str,
        handler: F,
        description: &str,
        override_existing: bool,
    ) -> Result<EndpointInfo, RegistryError>
    where
        F: Fn(&[Value]) -> Result<Value, RegistryError> + Send + Sync + 'static,
    {
        let now = Utc::now().timestamp();
        let mut endpoints = self.endpoints.write().unwrap_or_else(PoisonError::into_inner);

        let info = match endpoints.get(name) {
            Some(_) if !override_existing => {
                return Err(RegistryError::AlreadyExists(name.to_string()));
            }
            Some(existing) => EndpointInfo {
                description: description.to_string(),
                kind: existing.info.kind.clone(),
                version: existing.info.version + 1,
                creation_time: existing.info.creation_time,
                last_modified_time: now,
            },
            None => EndpointInfo {
                description: description.to_string(),
                kind: "function".to_string(),
                version: 1,
                creation_time: now,
                last_modified_time: now,
            },
        };

        info!(endpoint = name, version = info.version, "Endpoint deployed");
        endpoints.insert(
            name.to_string(),
            Endpoint {
                info: info.clone(),
                handler: Arc::new(handler),
            },
        );

        Ok(info)
    }

    /// Removes `name`, returning whether it was present.
    pub fn remove(&self, name: &str) -> bool {
        let mut endpoints = self.endpoints.write().unwrap_or_else(PoisonError::into_inner);
        endpoints.remove(name).is_some()
    }

    pub fn listing(&self) -> EndpointListing {
        let endpoints = self.endpoints.read().unwrap_or_else(PoisonError::into_inner);
        endpoints
            .iter()
            .map(|(name, e)| (name.clone(), e.info.clone()))
            .collect()
    }

    /// Runs the endpoint called `name` with positional `args`.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<QueryResponse, RegistryError> {
        // Clone the handler out so the lock is not held while it runs.
        let (handler, version) = {
            let endpoints = self.endpoints.read().unwrap_or_else(PoisonError::into_inner);
            let endpoint = endpoints
                .get(name)
                .ok_or_else(|| RegistryError::UnknownEndpoint(name.to_string()))?;
            (endpoint.handler.clone(), endpoint.info.version)
        };

        debug!(endpoint = name, args = args.len(), "Running query");
        let response = handler(args)?;

        Ok(QueryResponse {
            model: name.to_string(),
            version,
            response,
        })
    }
}

#[async_trait::async_trait]
impl EndpointCatalog for LocalRegistry {
    async fn list_endpoints(&self) -> Result<EndpointListing> {
        Ok(self.listing())
    }

    async fn query(&self, name: &str, args: &[Value]) -> Result<QueryResponse> {
        Ok(self.call(name, args)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn echo(args: &[Value]) -> Result<Value, RegistryError> {
        Ok(Value::Array(args.to_vec()))
    }

    #[test]
    fn test_deploy_new_endpoint() {
        let registry = LocalRegistry::new();
        let info = registry.deploy("echo", echo, "Echo arguments", false).unwrap();

        assert_eq!(info.version, 1);
        assert_eq!(info.kind, "function");
        assert_eq!(info.creation_time, info.last_modified_time);
        assert_eq!(registry.listing()["echo"].description, "Echo arguments");
    }

    #[test]
    fn test_deploy_existing_without_override_fails() {
        let registry = LocalRegistry::new();
        registry.deploy("echo", echo, "first", false).unwrap();

        let err = registry.deploy("echo", echo, "second", false).unwrap_err();
        assert!(matches!(err, RegistryError::AlreadyExists(ref n) if n == "echo"));
        assert_eq!(registry.listing()["echo"].description, "first");
    }

    #[test]
    fn test_override_bumps_version_and_keeps_creation_time() {
        let registry = LocalRegistry::new();
        let first = registry.deploy("echo", echo, "first", false).unwrap();
        registry
            .deploy("echo", |_: &[Value]| Ok(json!("replaced")), "second", true)
            .unwrap();
        let third = registry.deploy("echo", echo, "third", true).unwrap();

        assert_eq!(third.version, 3);
        assert_eq!(third.creation_time, first.creation_time);
        assert_eq!(third.description, "third");
    }

    #[test]
    fn test_call_runs_current_handler() {
        let registry = LocalRegistry::new();
        registry.deploy("echo", echo, "", false).unwrap();
        registry
            .deploy("echo", |_: &[Value]| Ok(json!("replaced")), "", true)
            .unwrap();

        let resp = registry.call("echo", &[json!(1)]).unwrap();
        assert_eq!(resp.model, "echo");
        assert_eq!(resp.version, 2);
        assert_eq!(resp.response, json!("replaced"));
    }

    #[test]
    fn test_call_unknown_endpoint() {
        let registry = LocalRegistry::new();
        let err = registry.call("missing", &[]).unwrap_err();
        assert!(matches!(err, RegistryError::UnknownEndpoint(_)));
    }

    #[test]
    fn test_remove() {
        let registry = LocalRegistry::new();
        registry.deploy("echo", echo, "", false).unwrap();
        assert!(registry.remove("echo"));
        assert!(!registry.remove("echo"));
        assert!(registry.listing().is_empty());
    }

    #[tokio::test]
    async fn test_catalog_query_wraps_errors() {
        let registry = LocalRegistry::new();
        let err = registry.query("missing", &[]).await.unwrap_err();
        assert!(err.to_string().contains("unknown endpoint 'missing'"));
    }
}
