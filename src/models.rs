//! Data models and structures
//!
//! Request-scoped values flowing through the pipeline, plus the JSON bodies
//! returned to clients. Nothing here outlives a single request.

use serde::{Deserialize, Serialize};

/// A file part received on a multipart upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub file_name: Option<String>,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Raw fields of an image-analysis form, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageForm {
    pub image: Option<Upload>,
    pub message: Option<String>,
}

/// A validated text-chat request. `message` is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundChatRequest {
    pub message: String,
}

/// A validated image-analysis request. `image` has passed the upload guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundImageRequest {
    pub image: Upload,
    pub message: String,
}

/// User turn of a prompt: plain text, or text together with an image reference.
#[derive(Debug, Clone, PartialEq)]
pub enum UserContent {
    Text(String),
    TextWithImage { text: String, image_url: String },
}

impl UserContent {
    pub fn text(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::TextWithImage { text, .. } => text,
        }
    }

    pub fn has_image(&self) -> bool {
        matches!(self, Self::TextWithImage { .. })
    }
}

/// A fully specified call to the remote model.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelPrompt {
    pub system_persona: String,
    pub user_content: UserContent,
    pub max_output_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletionResponse {
    pub response: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub timestamp: String,
}

/// Error body. Exactly one of `message` and `details` is set for
/// internal and upstream failures; client input errors carry neither.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: None,
            details: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_omits_empty_fields() {
        let json = serde_json::to_value(ErrorBody::new("Message is required")).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "Message is required" }));
    }

    #[test]
    fn test_error_body_with_details() {
        let body = ErrorBody::new("OpenAI API error")
            .with_details(serde_json::json!({ "error": { "code": "rate_limit_exceeded" } }));
        let json = serde_json::to_value(body).unwrap();
        assert_eq!(json["details"]["error"]["code"], "rate_limit_exceeded");
        assert!(json.get("message").is_none());
    }

    #[test]
    fn test_user_content_text() {
        let content = UserContent::TextWithImage {
            text: "What is this?".to_string(),
            image_url: "data:image/png;base64,AAAA".to_string(),
        };
        assert_eq!(content.text(), "What is this?");
        assert!(content.has_image());
        assert!(!UserContent::Text("hi".to_string()).has_image());
    }
}
