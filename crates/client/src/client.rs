//! Typed calls against the item endpoints.

use reqwest::{Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use mediashelf_core::ItemId;
use mediashelf_inventory::Item;

use crate::error::ClientError;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

/// Query parameters for `GET /items`. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFilter {
    pub query: Option<String>,
    pub item_type: Option<String>,
}

impl ItemFilter {
    fn params(&self) -> Vec<(&'static str, &str)> {
        let mut params = Vec::new();
        if let Some(q) = self.query.as_deref() {
            params.push(("q", q));
        }
        if let Some(t) = self.item_type.as_deref() {
            params.push(("type", t));
        }
        params
    }
}

/// Body for `POST /items`. Validation is left to the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NewItemRequest {
    #[serde(rename = "type")]
    pub item_type: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// True when `/health` answers with a success status.
    pub async fn health(&self) -> bool {
        match self.http.get(self.url("/health")).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(err) => {
                debug!(error = %err, "health check failed");
                false
            }
        }
    }

    pub async fn list(&self, filter: &ItemFilter) -> Result<Vec<Item>, ClientError> {
        let resp = self
            .http
            .get(self.url("/items"))
            .query(&filter.params())
            .send()
            .await?;
        let resp = ensure_success(resp).await?;
        Ok(resp.json().await?)
    }

    pub async fn create(&self, request: &NewItemRequest) -> Result<Item, ClientError> {
        let resp = self.http.post(self.url("/items")).json(request).send().await?;
        let resp = ensure_success(resp).await?;
        Ok(resp.json().await?)
    }

    /// `Ok(false)` when the server has no item with that id.
    pub async fn delete(&self, id: ItemId) -> Result<bool, ClientError> {
        let resp = self
            .http
            .delete(self.url(&format!("/items/{id}")))
            .send()
            .await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        ensure_success(resp).await?;
        Ok(true)
    }
}

/// Turn a non-2xx reply into `ClientError::Api`, preferring the server's
/// `{"error": ...}` message over the raw body.
async fn ensure_success(resp: Response) -> Result<Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ErrorBody>(&body) {
        Ok(parsed) => parsed.error,
        Err(_) if body.is_empty() => status.canonical_reason().unwrap_or("unknown").to_string(),
        Err(_) => body,
    };

    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}
