//! Request pipelines: validate, dispatch to the model, return its text.
//!
//! Each step returns a `Result` and the first failure short-circuits, so
//! invalid input never reaches the model gateway.

use crate::ai::{CompletionService, ModelGateway, OpenAiCompletionClient};
use crate::config::Config;
use crate::models::ImageForm;
use crate::request::{normalize_chat, normalize_image_request, parse_json_body};
use crate::upload::UploadGuard;
use crate::Result;
use std::sync::Arc;

pub struct App {
    gateway: ModelGateway,
    guard: UploadGuard,
}

impl App {
    /// Build an app around any completion backend. Tests inject mocks here.
    pub fn with_service(service: Arc<dyn CompletionService>) -> Self {
        Self {
            gateway: ModelGateway::new(service),
            guard: UploadGuard::default(),
        }
    }

    /// Construct an app talking to OpenAI as described by `config`.
    pub fn new(config: &Config) -> Self {
        tracing::info!(
            "Model provider: OpenAI (chat: {}, vision: {})",
            config.chat_model,
            config.vision_model
        );
        Self::with_service(Arc::new(OpenAiCompletionClient::from_config(config)))
    }

    pub fn upload_guard(&self) -> &UploadGuard {
        &self.guard
    }

    pub async fn chat(&self, body: &[u8]) -> Result<String> {
        let payload = parse_json_body(body)?;
        let request = normalize_chat(&payload)?;
        self.gateway.complete_text(&request).await
    }

    pub async fn analyze_image(&self, form: ImageForm) -> Result<String> {
        let upload = form
            .image
            .map(|upload| self.guard.check(upload))
            .transpose()?;
        let request = normalize_image_request(form.message.as_deref(), upload)?;
        self.gateway.complete_image_analysis(&request).await
    }
}
