// src/message.rs
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self { role, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }
}

/// Inbound body of `POST /chat`. Either field may be absent.
#[derive(Debug, Default, Deserialize)]
pub struct RequestPayload {
    pub message: Option<String>,
    pub messages: Option<Vec<ChatMessage>>,
}

/// The fixed-shape JSON object returned for every `POST /chat`.
///
/// All four keys are always present; absent values serialize as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub reply: Option<String>,
    pub error: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(rename = "fullResponse")]
    pub full_response: Option<Value>,
}

impl ResponseEnvelope {
    pub fn success(reply: impl Into<String>, full_response: Option<Value>) -> Self {
        Self {
            reply: Some(reply.into()),
            full_response,
            ..Default::default()
        }
    }

    pub fn failure(error: impl Into<String>, kind: impl Into<String>, full_response: Option<Value>) -> Self {
        Self {
            reply: None,
            error: Some(error.into()),
            kind: Some(kind.into()),
            full_response,
        }
    }
}

impl From<AppError> for ResponseEnvelope {
    fn from(err: AppError) -> Self {
        let kind = err.kind();
        let message = err.message();
        Self::failure(message, kind, err.into_full_response())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_always_serializes_all_keys() {
        let env = ResponseEnvelope::success("hi there", None);
        let value = serde_json::to_value(&env).unwrap();
        assert_eq!(
            value,
            json!({ "reply": "hi there", "error": null, "type": null, "fullResponse": null })
        );
    }

    #[test]
    fn payload_ignores_unknown_fields() {
        let payload: RequestPayload =
            serde_json::from_str(r#"{"message": "hello", "session_id": "abc"}"#).unwrap();
        assert_eq!(payload.message.as_deref(), Some("hello"));
        assert!(payload.messages.is_none());
    }

    #[test]
    fn unknown_role_is_rejected() {
        let res = serde_json::from_str::<RequestPayload>(
            r#"{"messages": [{"role": "tool", "content": "x"}]}"#,
        );
        assert!(res.is_err());
    }
}
