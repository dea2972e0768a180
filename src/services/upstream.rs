// src/services/upstream.rs
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::{config::UpstreamConfig, message::ChatMessage};

const DEFAULT_API_MESSAGE: &str = "Upstream API error";
const DEFAULT_API_CODE: &str = "ServerError";

#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The provider answered with an error status and a JSON body.
    #[error("{message}")]
    Api { message: String, code: String, body: Value },

    #[error("Upstream returned HTTP {status}")]
    Status { status: StatusCode },

    /// Connect, timeout or body-read failure. Stored without the request URL.
    #[error("{}", describe_transport(.0))]
    Transport(#[source] reqwest::Error),

    #[error("Invalid response from upstream: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        UpstreamError::Transport(err.without_url())
    }
}

/// Caller-facing text for a transport failure: the underlying cause rather
/// than reqwest's generic "error sending request" wrapper.
fn describe_transport(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        return "Upstream request timed out".to_string();
    }
    let cause = root_cause(err);
    if err.is_connect() {
        format!("Could not connect to upstream: {cause}")
    } else {
        cause
    }
}

fn root_cause(err: &(dyn std::error::Error + 'static)) -> String {
    let mut cause = err;
    while let Some(next) = cause.source() {
        cause = next;
    }
    cause.to_string()
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

/// Client for the chat-completion endpoint. Built once at startup and shared.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl UpstreamClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Request one completion and return the raw upstream JSON.
    pub async fn complete(&self, messages: &[ChatMessage]) -> Result<Value, UpstreamError> {
        let request = CompletionRequest {
            model: &self.model,
            messages,
        };
        debug!(endpoint = %self.endpoint, model = %self.model, count = messages.len(), "sending completion request");

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                let err = UpstreamError::from(e);
                error!("upstream transport error: {err}");
                err
            })?;

        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            warn!(%status, "upstream returned an error status");
            return Err(match serde_json::from_slice::<Value>(&bytes) {
                Ok(body) => api_error(body),
                Err(_) => UpstreamError::Status { status },
            });
        }

        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Map an error body to `UpstreamError::Api`. Providers put `message`/`code`
/// either at the top level or under `error`.
fn api_error(body: Value) -> UpstreamError {
    let source = match body.get("error") {
        Some(inner) if inner.is_object() => inner,
        _ => &body,
    };

    let message = source
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .unwrap_or(DEFAULT_API_MESSAGE)
        .to_string();

    let code = match source.get("code") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => DEFAULT_API_CODE.to_string(),
    };

    UpstreamError::Api { message, code, body }
}

/// First choice's message content, when it is a non-empty string.
pub fn extract_reply(response: &Value) -> Option<String> {
    response
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
