//! Anthropic Provider
//!
//! Messages API with `x-api-key` authentication and a pinned API version.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::core::{CraiteError, GenerationRequest, ProviderKind, Result};
use crate::llm::prompt::ComposedPrompt;
use crate::llm::provider::{decode, post_json};
use crate::llm::traits::ProviderAdapter;

/// Value sent in the `anthropic-version` header
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct UserMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Messages API request
#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    system: &'a str,
    messages: [UserMessage<'a>; 1],
    max_tokens: u32,
    temperature: f32,
}

/// Messages API response (only the fields we read)
#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

/// Anthropic-style message adapter
pub struct AnthropicAdapter {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl AnthropicAdapter {
    pub fn new(client: Client, endpoint: String, model: String, api_key: String) -> Self {
        Self {
            client,
            endpoint,
            model,
            api_key,
        }
    }
}

#[async_trait]
impl ProviderAdapter for AnthropicAdapter {
    async fn send(&self, request: &GenerationRequest, prompt: &ComposedPrompt) -> Result<String> {
        let body = MessagesRequest {
            model: &self.model,
            system: &prompt.system,
            messages: [UserMessage {
                role: "user",
                content: &prompt.user,
            }],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        tracing::debug!(endpoint = %self.endpoint, model = %self.model, "sending message request");

        let http = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION);
        let text = post_json(http, &body).await?;

        let response: MessagesResponse = decode(&text)?;
        response
            .content
            .into_iter()
            .next()
            .and_then(|block| block.text)
            .ok_or_else(|| CraiteError::malformed("missing content[0].text"))
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Anthropic
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
