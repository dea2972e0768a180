// src/services/relay.rs
use axum::http::StatusCode;
use tracing::{debug, info, warn};

use crate::{
    error::AppError,
    message::{ChatMessage, RequestPayload, ResponseEnvelope},
    services::{
        normalize::{normalize, parse_payload, with_system_prompt},
        upstream::extract_reply,
    },
    state::AppState,
};

/// Run one relay round trip and produce the status and envelope to emit.
pub async fn relay(state: &AppState, body: &[u8]) -> (StatusCode, ResponseEnvelope) {
    match run(state, body).await {
        Ok(envelope) => (StatusCode::OK, envelope),
        Err(err) => {
            let status = if err.is_validation() {
                state.policy.validation_failure_status
            } else {
                StatusCode::OK
            };
            warn!(kind = %err.kind(), %status, "relay failed: {err}");
            (status, ResponseEnvelope::from(err))
        }
    }
}

async fn run(state: &AppState, body: &[u8]) -> Result<ResponseEnvelope, AppError> {
    let payload = parse_payload(body)?;
    let messages = build_transcript(state, &payload)?;
    debug!(?messages, "outgoing transcript");

    let response = state.upstream.complete(&messages).await?;

    let Some(reply) = extract_reply(&response) else {
        return Err(AppError::NoReply { response });
    };

    let reply = state.sanitizer.apply(&reply);
    info!(model = %state.upstream.model(), turns = messages.len(), "relayed reply");

    let full_response = state.policy.echo_upstream_response.then_some(response);
    Ok(ResponseEnvelope::success(reply, full_response))
}

fn build_transcript(state: &AppState, payload: &RequestPayload) -> Result<Vec<ChatMessage>, AppError> {
    let messages = normalize(payload)?;
    Ok(with_system_prompt(state.policy.system_prompt(), messages))
}
