use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
};
use serde_json::{Value, json};

use crate::{
    message::ResponseEnvelope,
    services::relay::relay,
    state::SharedState,
};

pub async fn chat_handler(
    State(state): State<SharedState>,
    body: Bytes,
) -> (StatusCode, Json<ResponseEnvelope>) {
    let (status, envelope) = relay(&state, &body).await;
    (status, Json(envelope))
}

// CORS preflight: empty 200, headers come from the router layers.
pub async fn preflight_handler() -> StatusCode {
    StatusCode::OK
}

pub async fn method_not_allowed() -> (StatusCode, Json<Value>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "Method not allowed" })),
    )
}
