// src/config.rs
use std::time::Duration;

use axum::http::StatusCode;

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/v1";
pub const DEFAULT_MODEL: &str = "x-ai/grok-4-fast:free";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_PLACEHOLDER: &str = "Assistant";
pub const DEFAULT_SANITIZE_PATTERNS: [&str; 3] = ["grok", "openai", "chatgpt"];

/// Persona prompt used when injection is switched on without a custom text.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are Assistant, a helpful AI assistant. \
Never mention which company trained you or which model you are. \
If asked about your identity or provider, say you are Assistant and nothing more.";

/// Per-deployment choices that used to be spread across separate handlers.
#[derive(Debug, Clone)]
pub struct RelayPolicy {
    /// Status for missing or malformed input; either 200 or 400.
    pub validation_failure_status: StatusCode,
    pub inject_system_prompt: bool,
    pub system_prompt_text: Option<String>,
    /// Empty means replies are returned untouched.
    pub sanitize_patterns: Vec<String>,
    pub sanitize_placeholder: String,
    pub echo_upstream_response: bool,
}

impl RelayPolicy {
    /// The system message text to prepend, if injection is on.
    pub fn system_prompt(&self) -> Option<&str> {
        if !self.inject_system_prompt {
            return None;
        }
        Some(self.system_prompt_text.as_deref().unwrap_or(DEFAULT_SYSTEM_PROMPT))
    }
}

#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub bind_addr: String,
    pub upstream: UpstreamConfig,
    pub policy: RelayPolicy,
}

impl RelayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = get("API_KEY").ok_or(ConfigError::Missing("API_KEY"))?;

        let timeout = match get("UPSTREAM_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|e: std::num::ParseIntError| ConfigError::Invalid {
                    var: "UPSTREAM_TIMEOUT_SECS",
                    value: raw.clone(),
                    reason: e.to_string(),
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        let validation_failure_status = match get("VALIDATION_FAILURE_STATUS") {
            Some(raw) => match raw.trim() {
                "200" => StatusCode::OK,
                "400" => StatusCode::BAD_REQUEST,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: "VALIDATION_FAILURE_STATUS",
                        value: raw.clone(),
                        reason: "expected 200 or 400".to_string(),
                    });
                }
            },
            None => StatusCode::BAD_REQUEST,
        };

        let system_prompt_text = get("SYSTEM_PROMPT");
        let inject_system_prompt =
            system_prompt_text.is_some() || parse_bool("INJECT_SYSTEM_PROMPT", get("INJECT_SYSTEM_PROMPT"))?;

        let sanitize_patterns = match get("SANITIZE_PATTERNS") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect(),
            None if parse_bool("SANITIZE_REPLY", get("SANITIZE_REPLY"))? => {
                DEFAULT_SANITIZE_PATTERNS.iter().map(|p| p.to_string()).collect()
            }
            None => Vec::new(),
        };

        Ok(Self {
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            upstream: UpstreamConfig {
                base_url: get("UPSTREAM_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                api_key,
                model: get("UPSTREAM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                timeout,
            },
            policy: RelayPolicy {
                validation_failure_status,
                inject_system_prompt,
                system_prompt_text,
                sanitize_patterns,
                sanitize_placeholder: get("SANITIZE_PLACEHOLDER").unwrap_or_else(|| DEFAULT_PLACEHOLDER.to_string()),
                echo_upstream_response: parse_bool("ECHO_UPSTREAM_RESPONSE", get("ECHO_UPSTREAM_RESPONSE"))?,
            },
        })
    }
}

fn parse_bool(var: &'static str, raw: Option<String>) -> Result<bool, ConfigError> {
    let Some(raw) = raw else {
        return Ok(false);
    };
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            var,
            value: raw,
            reason: "expected a boolean".to_string(),
        }),
    }
}
