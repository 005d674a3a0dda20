//! Upstream staffing REST API.
//!
//! Every call goes through a [`Transport`], which sends one request and
//! hands back the `data` member of the `{ data, success, message? }`
//! envelope. [`HttpTransport`] is the reqwest implementation; tests swap in
//! a recording double. The typed per-entity clients live in [`endpoints`].
//!
//! No retries and no backoff: a failed call fails once and the caller decides.

pub mod endpoints;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub use endpoints::{EntityApi, RoundsApi, StaffingApi, UsersApi};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The bearer token was refused; the dashboard must reload to re-authenticate.
    #[error("upstream rejected the session token")]
    Unauthorized,

    #[error("upstream error (status {status}): {message}")]
    Status { status: u16, message: String },

    /// HTTP success but the envelope says `success: false`.
    #[error("upstream rejected the request: {0}")]
    Rejected(String),

    #[error("unexpected upstream payload: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Post,
    Patch,
    Delete,
}

impl Verb {
    fn method(self) -> reqwest::Method {
        match self {
            Verb::Get => reqwest::Method::GET,
            Verb::Post => reqwest::Method::POST,
            Verb::Patch => reqwest::Method::PATCH,
            Verb::Delete => reqwest::Method::DELETE,
        }
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends one request and returns the envelope's `data` (`Null` when absent).
    async fn send(&self, verb: Verb, path: &str, body: Option<Value>) -> Result<Value, ApiError>;
}

/// Pulls `data` out of an envelope. Bodies that are not envelopes pass
/// through unchanged.
pub fn unwrap_envelope(body: Value) -> Result<Value, ApiError> {
    match body {
        Value::Object(mut map) if map.contains_key("success") => {
            let success = map.get("success").and_then(Value::as_bool).unwrap_or(false);
            if !success {
                let message = map
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("request was not successful")
                    .to_string();
                return Err(ApiError::Rejected(message));
            }
            Ok(map.remove("data").unwrap_or(Value::Null))
        }
        other => Ok(other),
    }
}

fn error_message(text: &str) -> String {
    serde_json::from_str::<Value>(text)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| text.to_string())
}

/// The reqwest transport used in production.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpTransport {
    pub fn new(
        base_url: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, verb: Verb, path: &str, body: Option<Value>) -> Result<Value, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self
            .client
            .request(verb.method(), &url)
            .header("ngrok-skip-browser-warning", "true");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            warn!("upstream returned 401 for {:?} {}", verb, path);
            return Err(ApiError::Unauthorized);
        }

        let text = response.text().await?;
        if !status.is_success() {
            warn!("upstream returned {} for {:?} {}", status, verb, path);
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        debug!("upstream {:?} {} -> {}", verb, path, status);
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        unwrap_envelope(serde_json::from_str(&text)?)
    }
}
