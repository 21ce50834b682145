//! OpenAI Provider
//!
//! Chat-completions style API with bearer authentication.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::core::{CraiteError, GenerationRequest, ProviderKind, Result};
use crate::llm::prompt::ComposedPrompt;
use crate::llm::provider::{decode, post_json};
use crate::llm::traits::ProviderAdapter;

/// Chat message in OpenAI format
#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Chat completion request
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

/// Chat completion response (only the fields we read)
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// OpenAI-style chat completion adapter
pub struct OpenAiAdapter {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl OpenAiAdapter {
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
impl ProviderAdapter for OpenAiAdapter {
    async fn send(&self, request: &GenerationRequest, prompt: &ComposedPrompt) -> Result<String> {
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        tracing::debug!(endpoint = %self.endpoint, model = %self.model, "sending chat completion");

        let http = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key);
        let text = post_json(http, &body).await?;

        let response: ChatResponse = decode(&text)?;
        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| CraiteError::malformed("missing choices[0].message.content"))
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let body = ChatRequest {
            model: "gpt-4",
            messages: [
                ChatMessage {
                    role: "system",
                    content: "sys",
                },
                ChatMessage {
                    role: "user",
                    content: "usr",
                },
            ],
            temperature: 0.5,
            max_tokens: 100,
        };

        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(
            json,
            r#"{"model":"gpt-4","messages":[{"role":"system","content":"sys"},{"role":"user","content":"usr"}],"temperature":0.5,"max_tokens":100}"#
        );
    }

    #[test]
    fn test_response_without_choices() {
        let response: ChatResponse = decode(r#"{"id":"x","choices":[]}"#).unwrap();
        assert!(response.choices.is_empty());
    }
}
