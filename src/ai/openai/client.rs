use super::types::{ChatCompletionRequest, ChatCompletionResponse};
use crate::{Error, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

pub const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";

pub struct OpenAiHttpClient {
    client: Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl OpenAiHttpClient {
    pub fn new(api_key: String, base_url: String, timeout: Duration) -> Self {
        Self::new_with_client(api_key, base_url, timeout, Client::new())
    }

    pub fn new_with_client(
        api_key: String,
        base_url: String,
        timeout: Duration,
        client: Client,
    ) -> Self {
        Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    /// POST a JSON body and decode the JSON reply.
    ///
    /// Non-success statuses become [`Error::Upstream`] carrying the reply body
    /// (as JSON when it parses, as a string otherwise).
    pub async fn post<Req: Serialize, Resp: DeserializeOwned>(
        &self,
        path: &str,
        request: &Req,
    ) -> Result<Resp> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send request to OpenAI: {}", e);
                Error::Http(e.without_url())
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| Error::Http(e.without_url()))?;

        if !status.is_success() {
            tracing::error!("OpenAI API error (status {}): {}", status, body);
            let details = serde_json::from_str(&body)
                .unwrap_or_else(|_| serde_json::Value::String(body));
            return Err(Error::Upstream {
                status: status.as_u16(),
                details,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse OpenAI response: {}\nBody: {}", e, body);
            Error::Internal(format!("Failed to parse OpenAI response: {}", e))
        })
    }

    pub async fn chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse> {
        self.post(CHAT_COMPLETIONS_PATH, request).await
    }
}
