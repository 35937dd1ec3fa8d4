//! Request normalization for the two supported request shapes.

use crate::models::{InboundChatRequest, InboundImageRequest, Upload};
use crate::{prompts, Error, Result};
use serde_json::Value;

pub const MESSAGE_REQUIRED: &str = "Message is required";
pub const IMAGE_REQUIRED: &str = "Image is required";
pub const MALFORMED_JSON: &str = "Malformed JSON body";
pub const BODY_TOO_LARGE: &str = "Request body too large";
pub const BODY_UNREADABLE: &str = "Failed to read request body";

/// Parse a raw chat body. An empty body is treated as an empty object.
pub fn parse_json_body(body: &[u8]) -> Result<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Default::default()));
    }
    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!("Rejected chat body: {}", e);
        Error::client_input(MALFORMED_JSON)
    })
}

/// Requires `payload.message` to be a non-empty string.
pub fn normalize_chat(payload: &Value) -> Result<InboundChatRequest> {
    match payload.get("message").and_then(Value::as_str) {
        Some(message) if !message.is_empty() => Ok(InboundChatRequest {
            message: message.to_string(),
        }),
        _ => Err(Error::client_input(MESSAGE_REQUIRED)),
    }
}

/// `upload` must already have passed the upload guard. A missing or empty
/// message falls back to the canned diagnostic question.
pub fn normalize_image_request(
    message: Option<&str>,
    upload: Option<Upload>,
) -> Result<InboundImageRequest> {
    let image = upload.ok_or_else(|| Error::client_input(IMAGE_REQUIRED))?;
    let message = match message {
        Some(m) if !m.is_empty() => m.to_string(),
        _ => prompts::DIAGNOSIS_USER.to_string(),
    };
    Ok(InboundImageRequest { image, message })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn png() -> Upload {
        Upload {
            file_name: Some("maize.png".to_string()),
            content_type: "image/png".to_string(),
            bytes: vec![0x89, 0x50, 0x4E, 0x47],
        }
    }

    fn assert_client_input(err: Error, expected: &str) {
        match err {
            Error::ClientInput(reason) => assert_eq!(reason, expected),
            other => panic!("expected client input error, got {:?}", other),
        }
    }

    #[test]
    fn test_normalize_chat_accepts_message() {
        let req = normalize_chat(&json!({ "message": "What crops grow well in Rwanda?" })).unwrap();
        assert_eq!(req.message, "What crops grow well in Rwanda?");
    }

    #[test]
    fn test_normalize_chat_ignores_extra_fields() {
        let req = normalize_chat(&json!({ "message": "hi", "history": [] })).unwrap();
        assert_eq!(req.message, "hi");
    }

    #[test]
    fn test_normalize_chat_rejects_missing_empty_and_non_string() {
        for payload in [
            json!({}),
            json!({ "message": "" }),
            json!({ "message": null }),
            json!({ "message": 42 }),
            json!(["message"]),
        ] {
            assert_client_input(normalize_chat(&payload).unwrap_err(), MESSAGE_REQUIRED);
        }
    }

    #[test]
    fn test_normalize_chat_is_repeatable() {
        let payload = json!({ "message": "blight on potatoes" });
        assert_eq!(
            normalize_chat(&payload).unwrap(),
            normalize_chat(&payload).unwrap()
        );
    }

    #[test]
    fn test_parse_json_body() {
        assert_eq!(parse_json_body(b"").unwrap(), json!({}));
        assert_eq!(parse_json_body(b" \n").unwrap(), json!({}));
        assert_eq!(
            parse_json_body(br#"{"message":"hi"}"#).unwrap(),
            json!({ "message": "hi" })
        );
        assert_client_input(parse_json_body(b"{not json").unwrap_err(), MALFORMED_JSON);
    }

    #[test]
    fn test_normalize_image_requires_upload() {
        assert_client_input(
            normalize_image_request(Some("help"), None).unwrap_err(),
            IMAGE_REQUIRED,
        );
    }

    #[test]
    fn test_normalize_image_defaults_message() {
        let req = normalize_image_request(None, Some(png())).unwrap();
        assert_eq!(req.message, prompts::DIAGNOSIS_USER);

        let req = normalize_image_request(Some(""), Some(png())).unwrap();
        assert_eq!(req.message, prompts::DIAGNOSIS_USER);
    }

    #[test]
    fn test_normalize_image_keeps_message_and_bytes() {
        let req =
            normalize_image_request(Some("What's wrong with my maize leaves?"), Some(png())).unwrap();
        assert_eq!(req.message, "What's wrong with my maize leaves?");
        assert_eq!(req.image, png());
    }

    #[test]
    fn test_normalize_image_is_repeatable() {
        assert_eq!(
            normalize_image_request(Some("q"), Some(png())).unwrap(),
            normalize_image_request(Some("q"), Some(png())).unwrap()
        );
    }
}
