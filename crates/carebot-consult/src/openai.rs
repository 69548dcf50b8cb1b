//! OpenAI-compatible chat-completion client.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use carebot_core::config::ModelConfig;
use carebot_core::types::{ChatMessage, Turn};

use crate::error::ConsultError;
use crate::model::{build_messages, ModelClient};
use crate::prompt::SYSTEM_PROMPT;

/// Longest slice of an error body kept in error messages.
const MAX_ERROR_BODY_CHARS: usize = 300;

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for `POST {base_url}/chat/completions`.
///
/// Each call is attempted exactly once; transport, status, and decoding
/// failures all surface as [`ConsultError::Model`].
pub struct OpenAiChatClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl std::fmt::Debug for OpenAiChatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiChatClient")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl OpenAiChatClient {
    /// Build a client from the model section of the configuration.
    pub fn new(config: &ModelConfig, api_key: impl Into<String>) -> Result<Self, ConsultError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(|e| ConsultError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key: api_key.into(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl ModelClient for OpenAiChatClient {
    async fn get_reply(
        &self,
        conversation: &[Turn],
        new_user_text: &str,
    ) -> Result<String, ConsultError> {
        let messages = build_messages(SYSTEM_PROMPT, conversation, new_user_text);
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: &messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        debug!(
            model = %self.model,
            message_count = messages.len(),
            "Sending chat completion request"
        );

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ConsultError::Model(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "Chat completion request rejected");
            return Err(ConsultError::Model(format!(
                "API returned {}: {}",
                status,
                truncate_chars(&body, MAX_ERROR_BODY_CHARS)
            )));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ConsultError::Model(format!("invalid response body: {}", e)))?;

        let reply = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .unwrap_or_default();

        if reply.is_empty() {
            return Err(ConsultError::Model("response contained no reply text".into()));
        }

        debug!(reply_len = reply.len(), "Chat completion received");
        Ok(reply)
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
