//! Microsoft Graph HTTP Client
//!
//! Thin authenticated wrapper over reqwest. It returns the raw status and body
//! so each operation can apply its own success rules; it never retries.

use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use crate::common::{create_http_client_with_timeout, GraphError};
use crate::config::Config;

pub const DEFAULT_GRAPH_BASE_URL: &str = "https://graph.microsoft.com/v1.0";

/// Status and body of a completed request.
#[derive(Debug, Clone)]
pub struct GraphResponse {
    pub status: StatusCode,
    pub body: String,
}

impl GraphResponse {
    /// Parse the body as JSON. An empty body parses as `{}`.
    pub fn json(&self) -> Result<Value, GraphError> {
        if self.body.trim().is_empty() {
            return Ok(Value::Object(serde_json::Map::new()));
        }
        serde_json::from_str(&self.body)
            .map_err(|e| GraphError::Malformed(format!("{} (body: {})", e, self.body)))
    }

    /// Turn a non-success response into an error carrying Graph's message.
    pub fn into_error(self) -> GraphError {
        let message = serde_json::from_str::<Value>(&self.body)
            .ok()
            .and_then(|parsed| extract_error_message(&parsed))
            .unwrap_or(self.body);
        GraphError::Status {
            status: self.status.as_u16(),
            message,
        }
    }
}

/// Graph API HTTP client. The bearer token is supplied per request.
#[derive(Clone)]
pub struct GraphClient {
    client: Client,
    base_url: String,
}

impl GraphClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, GraphError> {
        let client = create_http_client_with_timeout(timeout_secs)?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, GraphError> {
        Self::new(config.graph_base_url(), config.timeout_secs())
    }

    /// Absolute URL for a path relative to the base.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Make an authenticated GET request
    pub async fn get(&self, token: &str, path: &str) -> Result<GraphResponse, GraphError> {
        let builder = self
            .client
            .get(self.url(path))
            .bearer_auth(token)
            .header("Accept", "application/json");

        self.execute_request(builder).await
    }

    /// Make an authenticated PATCH request with JSON body
    pub async fn patch(
        &self,
        token: &str,
        path: &str,
        body: &Value,
    ) -> Result<GraphResponse, GraphError> {
        let builder = self
            .client
            .patch(self.url(path))
            .bearer_auth(token)
            .header("Accept", "application/json")
            .json(body);

        self.execute_request(builder).await
    }

    /// Send a request and collect status + body
    async fn execute_request(&self, builder: RequestBuilder) -> Result<GraphResponse, GraphError> {
        debug!("Executing Graph API request");

        let response = builder.send().await?;

        let status = response.status();
        debug!("Response status: {}", status);

        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!("Rate limited by Graph API (not retrying)");
        }

        let body = response.text().await?;
        Ok(GraphResponse { status, body })
    }
}

/// Extract the message from a Graph error body:
///
/// ```json
/// { "error": { "code": "ItemNotFound", "message": "The resource could not be found." } }
/// ```
fn extract_error_message(response: &Value) -> Option<String> {
    let error_obj = response.get("error")?;
    let message = error_obj.get("message").and_then(|v| v.as_str())?;
    match error_obj.get("code").and_then(|v| v.as_str()) {
        Some(code) => Some(format!("{}: {}", code, message)),
        None => Some(message.to_string()),
    }
}
