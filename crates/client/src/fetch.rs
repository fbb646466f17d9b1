//! Single-request page fetching and the HTTP transport seam.
//!
//! [`Transport`] is the only boundary that touches the network; the walker,
//! the count resolver, and the tests all run against it. The reqwest
//! implementation attaches the bearer token and JSON content type to every
//! request and never sets its own timeout (that is the transport stack's
//! concern).

use crate::error::{ClientError, Result};
use crate::model::{Page, Validation};
use async_trait::async_trait;
use serde_json::Value;

#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, path: &str, query: &[(String, String)]) -> Result<Value>;
    async fn patch(&self, path: &str, body: Value) -> Result<Value>;
}

/// Issue exactly one paginated listing request and structurally validate
/// the page that comes back.
pub async fn fetch_page(
    transport: &dyn Transport,
    path: &str,
    query: &[(String, String)],
    validation: Validation,
) -> Result<Page> {
    let body = transport.get(path, query).await?;
    Page::from_value(body, validation)
}

/// Bearer-authenticated reqwest transport against the configured base URL.
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpTransport {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn dispatch(&self, request: reqwest::RequestBuilder) -> Result<Value> {
        let response = request
            .bearer_auth(&self.api_key)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            return Err(ClientError::UpstreamStatus {
                status: status.as_u16(),
                detail: parse_error_detail(&raw),
            });
        }

        Ok(response.json().await?)
    }
}

/// Best-effort extraction of a human-readable message from an error body.
fn parse_error_detail(raw: &str) -> String {
    serde_json::from_str::<Value>(raw)
        .ok()
        .and_then(|body| {
            ["message", "error", "detail"]
                .into_iter()
                .find_map(|key| body.get(key).and_then(Value::as_str).map(str::to_string))
        })
        .unwrap_or_else(|| raw.to_string())
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &str, query: &[(String, String)]) -> Result<Value> {
        self.dispatch(self.http.get(self.url(path)).query(query)).await
    }

    async fn patch(&self, path: &str, body: Value) -> Result<Value> {
        self.dispatch(self.http.patch(self.url(path)).json(&body)).await
    }
}
