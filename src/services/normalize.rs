// src/services/normalize.rs
use crate::{
    error::AppError,
    message::{ChatMessage, RequestPayload},
};

pub const NO_MESSAGE: &str = "No message(s) provided";

/// Parse a raw request body. Malformed JSON and wrongly typed fields are
/// reported as `BadRequest`.
pub fn parse_payload(body: &[u8]) -> Result<RequestPayload, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(RequestPayload::default());
    }
    serde_json::from_slice(body).map_err(|e| AppError::BadRequest(format!("Invalid request body: {e}")))
}

/// Turn a payload into the transcript sent upstream.
///
/// A non-empty `messages` list is used verbatim. Otherwise a non-empty
/// `message` string becomes a single user message.
pub fn normalize(payload: &RequestPayload) -> Result<Vec<ChatMessage>, AppError> {
    if let Some(messages) = payload.messages.as_ref().filter(|m| !m.is_empty()) {
        return Ok(messages.clone());
    }

    match payload.message.as_deref() {
        Some(text) if !text.is_empty() => Ok(vec![ChatMessage::user(text)]),
        _ => Err(AppError::BadRequest(NO_MESSAGE.to_string())),
    }
}

pub fn with_system_prompt(prompt: Option<&str>, messages: Vec<ChatMessage>) -> Vec<ChatMessage> {
    match prompt {
        Some(prompt) => {
            let mut out = Vec::with_capacity(messages.len() + 1);
            out.push(ChatMessage::system(prompt));
            out.extend(messages);
            out
        }
        None => messages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Role;

    fn payload(message: Option<&str>, messages: Option<Vec<ChatMessage>>) -> RequestPayload {
        RequestPayload {
            message: message.map(str::to_string),
            messages,
        }
    }

    #[test]
    fn single_message_becomes_one_user_entry() {
        let out = normalize(&payload(Some("hello"), None)).unwrap();
        assert_eq!(out, vec![ChatMessage::user("hello")]);
    }

    #[test]
    fn message_list_is_used_verbatim_and_wins() {
        let list = vec![
            ChatMessage::user("first"),
            ChatMessage::new(Role::Assistant, "second"),
            ChatMessage::user("third"),
        ];
        let out = normalize(&payload(Some("ignored"), Some(list.clone()))).unwrap();
        assert_eq!(out, list);
    }

    #[test]
    fn empty_list_falls_back_to_message() {
        let out = normalize(&payload(Some("hello"), Some(vec![]))).unwrap();
        assert_eq!(out, vec![ChatMessage::user("hello")]);
    }

    #[test]
    fn nothing_usable_is_a_bad_request() {
        for p in [payload(None, None), payload(Some(""), None), payload(Some(""), Some(vec![]))] {
            let err = normalize(&p).unwrap_err();
            assert!(err.is_validation());
            assert_eq!(err.message(), NO_MESSAGE);
        }
    }

    #[test]
    fn whitespace_message_is_kept_as_is() {
        let out = normalize(&payload(Some("  "), None)).unwrap();
        assert_eq!(out[0].content, "  ");
    }

    #[test]
    fn system_prompt_is_prepended_once() {
        let out = with_system_prompt(Some("be brief"), vec![ChatMessage::user("a"), ChatMessage::user("b")]);
        assert_eq!(out.len(), 3);
        assert_eq!(out[0], ChatMessage::system("be brief"));
        assert_eq!(out[1].content, "a");
        assert_eq!(out[2].content, "b");

        let untouched = with_system_prompt(None, vec![ChatMessage::user("a")]);
        assert_eq!(untouched, vec![ChatMessage::user("a")]);
    }

    #[test]
    fn parse_rejects_bad_json_and_types() {
        assert!(parse_payload(b"{not json").unwrap_err().is_validation());
        let err = parse_payload(br#"{"message": 42}"#).unwrap_err();
        assert!(err.message().starts_with("Invalid request body"));
    }

    #[test]
    fn empty_body_parses_to_empty_payload() {
        let p = parse_payload(b"").unwrap();
        assert!(p.message.is_none() && p.messages.is_none());
    }
}
