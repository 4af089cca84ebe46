//! HTTP plumbing for talking to the analytics server.

mod basic;

pub use basic::BasicClient;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{Method, Request, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Executes prepared requests.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}

/// Builds a request, encoding `body` as JSON when one is given.
pub fn build_request<B: Serialize + ?Sized>(
    method: Method,
    url: &str,
    body: Option<&B>,
) -> Result<Request> {
    let mut req = Request::new(method, url.parse()?);
    if let Some(body) = body {
        req.headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        *req.body_mut() = Some(serde_json::to_vec(body)?.into());
    }
    Ok(req)
}

/// Sends `req` and decodes a JSON response, turning non-success statuses into errors.
pub async fn send_json<C: HttpClient + ?Sized, T: DeserializeOwned>(
    client: &C,
    req: Request,
) -> Result<T> {
    let url = req.url().clone();
    let resp = client
        .execute(req)
        .await
        .map_err(|e| anyhow!("Failed to send request to {}: {}", url, e))?;

    let status = resp.status();
    debug!(%url, %status, "Response received");
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(anyhow!("{} returned status {}: {}", url, status, body));
    }

    resp.json()
        .await
        .map_err(|e| anyhow!("Failed to parse response from {}: {}", url, e))
}
