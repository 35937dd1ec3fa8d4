use super::client::OpenAiHttpClient;
use super::types::{ChatCompletionRequest, ChatMessage, ChatMessageContent, MessagePart};
use crate::ai::CompletionService;
use crate::config::Config;
use crate::models::{ModelPrompt, UserContent};
use crate::{Error, Result};
use async_trait::async_trait;

/// Chat-completions backed [`CompletionService`].
///
/// Text prompts go to the chat model, prompts carrying an image to the
/// vision model.
pub struct OpenAiCompletionClient {
    http: OpenAiHttpClient,
    chat_model: String,
    vision_model: String,
}

impl OpenAiCompletionClient {
    pub fn new(http: OpenAiHttpClient, chat_model: String, vision_model: String) -> Self {
        Self {
            http,
            chat_model,
            vision_model,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            OpenAiHttpClient::new(
                config.openai_api_key.clone(),
                config.openai_base_url.clone(),
                config.openai_timeout,
            ),
            config.chat_model.clone(),
            config.vision_model.clone(),
        )
    }

    fn build_request(&self, prompt: &ModelPrompt) -> ChatCompletionRequest {
        let system_message = ChatMessage {
            role: "system".to_string(),
            content: Some(ChatMessageContent::Text(prompt.system_persona.clone())),
        };

        let (model, user_content) = match &prompt.user_content {
            UserContent::Text(text) => (&self.chat_model, ChatMessageContent::Text(text.clone())),
            UserContent::TextWithImage { text, image_url } => (
                &self.vision_model,
                ChatMessageContent::Parts(vec![
                    MessagePart::text(text.clone()),
                    MessagePart::image(image_url.clone()),
                ]),
            ),
        };

        ChatCompletionRequest {
            model: model.clone(),
            messages: vec![
                system_message,
                ChatMessage {
                    role: "user".to_string(),
                    content: Some(user_content),
                },
            ],
            max_tokens: prompt.max_output_tokens,
            temperature: prompt.temperature,
        }
    }
}

#[async_trait]
impl CompletionService for OpenAiCompletionClient {
    async fn complete(&self, prompt: &ModelPrompt) -> Result<String> {
        let request = self.build_request(prompt);
        tracing::debug!(
            "Sending chat completion to OpenAI (model: {}, max_tokens: {})",
            request.model,
            request.max_tokens
        );

        let response = self.http.chat_completion(&request).await?;

        response
            .choices
            .first()
            .and_then(|choice| match &choice.message.content {
                Some(ChatMessageContent::Text(text)) => Some(text.clone()),
                _ => None,
            })
            .ok_or_else(|| Error::Internal("No response from OpenAI chat API".to_string()))
    }
}
