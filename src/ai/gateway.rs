//! The single path to the remote model.

use super::CompletionService;
use crate::models::{InboundChatRequest, InboundImageRequest, ModelPrompt, Upload, UserContent};
use crate::{prompts, Result};
use base64::Engine as _;
use std::sync::Arc;

pub const TEXT_MAX_TOKENS: u32 = 500;
pub const TEXT_TEMPERATURE: f32 = 0.7;
pub const IMAGE_MAX_TOKENS: u32 = 800;
pub const IMAGE_TEMPERATURE: f32 = 0.3;

#[derive(Clone)]
pub struct ModelGateway {
    service: Arc<dyn CompletionService>,
}

impl ModelGateway {
    pub fn new(service: Arc<dyn CompletionService>) -> Self {
        Self { service }
    }

    /// Farming advice for a plain text question.
    pub async fn complete_text(&self, req: &InboundChatRequest) -> Result<String> {
        tracing::info!("Processing message ({} chars)", req.message.chars().count());
        tracing::debug!("Message: {}", req.message);

        let response = self.service.complete(&text_prompt(req)).await?;
        tracing::debug!("AI response: {}", response);
        Ok(response)
    }

    /// Disease diagnosis for a plant image.
    pub async fn complete_image_analysis(&self, req: &InboundImageRequest) -> Result<String> {
        tracing::info!(
            "Analyzing image {:?} ({} bytes, {})",
            req.image.file_name,
            req.image.size(),
            req.image.content_type
        );

        let response = self.service.complete(&image_prompt(req)).await?;
        tracing::info!("Analysis complete");
        Ok(response)
    }
}

pub fn text_prompt(req: &InboundChatRequest) -> ModelPrompt {
    ModelPrompt {
        system_persona: prompts::ADVISOR_SYSTEM.to_string(),
        user_content: UserContent::Text(req.message.clone()),
        max_output_tokens: TEXT_MAX_TOKENS,
        temperature: TEXT_TEMPERATURE,
    }
}

pub fn image_prompt(req: &InboundImageRequest) -> ModelPrompt {
    ModelPrompt {
        system_persona: prompts::DIAGNOSIS_SYSTEM.to_string(),
        user_content: UserContent::TextWithImage {
            text: req.message.clone(),
            image_url: image_data_uri(&req.image),
        },
        max_output_tokens: IMAGE_MAX_TOKENS,
        temperature: IMAGE_TEMPERATURE,
    }
}

/// `data:<mime>;base64,<payload>` using the declared content type.
pub fn image_data_uri(upload: &Upload) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(&upload.bytes);
    format!("data:{};base64,{}", upload.content_type, encoded)
}
