// src/state.rs
use std::sync::Arc;

use anyhow::Context;

use crate::config::{RelayConfig, RelayPolicy};
use crate::services::sanitizer::Sanitizer;
use crate::services::upstream::UpstreamClient;

pub type SharedState = Arc<AppState>;

/// Read-only state shared by every request.
pub struct AppState {
    pub policy: RelayPolicy,
    pub upstream: UpstreamClient,
    pub sanitizer: Sanitizer,
}

impl AppState {
    pub fn new(config: &RelayConfig) -> anyhow::Result<Self> {
        let upstream = UpstreamClient::new(&config.upstream).context("failed to build upstream HTTP client")?;
        let sanitizer = Sanitizer::new(&config.policy.sanitize_patterns, config.policy.sanitize_placeholder.as_str())
            .context("invalid sanitizer configuration")?;

        Ok(Self {
            policy: config.policy.clone(),
            upstream,
            sanitizer,
        })
    }
}
