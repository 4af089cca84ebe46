use anyhow::Result;
use async_trait::async_trait;
use reqwest::{Method, Request};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use listing_metrics::config::ServerConfig;
use listing_metrics::fetch::{BasicClient, HttpClient, build_request, send_json};
use listing_metrics::registry::{EndpointCatalog, EndpointListing, QueryResponse};

#[derive(Serialize)]
struct QueryRequest<'a> {
    data: &'a [Value],
}

/// Reads endpoints from, and runs queries on, a TabPy server.
pub struct TabPyClient<C = BasicClient> {
    base_url: String,
    http: C,
}

impl TabPyClient {
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let http = BasicClient::with_timeouts(Duration::from_secs(10), Duration::from_secs(30))?;
        Ok(Self::with_client(config.base_url(), http))
    }
}

impl<C: HttpClient> TabPyClient<C> {
    pub fn with_client(base_url: &str, http: C) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoints_request(&self) -> Result<Request> {
        build_request::<()>(Method::GET, &format!("{}/endpoints", self.base_url), None)
    }

    fn query_request(&self, name: &str, args: &[Value]) -> Result<Request> {
        build_request(
            Method::POST,
            &format!("{}/query/{}", self.base_url, name),
            Some(&QueryRequest { data: args }),
        )
    }
}

#[async_trait]
impl<C: HttpClient> EndpointCatalog for TabPyClient<C> {
    async fn list_endpoints(&self) -> Result<EndpointListing> {
        let listing: EndpointListing = send_json(&self.http, self.endpoints_request()?).await?;
        debug!(endpoints = listing.len(), "Fetched remote endpoint listing");
        Ok(listing)
    }

    async fn query(&self, name: &str, args: &[Value]) -> Result<QueryResponse> {
        send_json(&self.http, self.query_request(name, args)?).await
    }
}
