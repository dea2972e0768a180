// src/error.rs
use serde_json::Value;
use thiserror::Error;

use crate::services::upstream::UpstreamError;

/// Failures of a single relay request. None of them are fatal to the process;
/// each one is rendered into the response envelope.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("No reply from API. Check your model, key, or payload.")]
    NoReply { response: Value },

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl AppError {
    /// Value of the envelope's `type` field.
    pub fn kind(&self) -> String {
        match self {
            AppError::BadRequest(_) => "BadRequest".to_string(),
            AppError::NoReply { .. } => "NoReply".to_string(),
            AppError::Upstream(UpstreamError::Api { code, .. }) => code.clone(),
            AppError::Upstream(_) => "ServerError".to_string(),
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::BadRequest(_))
    }

    /// Raw upstream body kept for diagnostics, if any.
    pub fn into_full_response(self) -> Option<Value> {
        match self {
            AppError::NoReply { response } => Some(response),
            AppError::Upstream(UpstreamError::Api { body, .. }) => Some(body),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value {value:?} for {var}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}
