//! Local Provider
//!
//! Generic completion endpoint (Ollama `/api/generate` and compatible servers).
//! No authentication; the response field name varies between servers.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use crate::core::{CraiteError, GenerationRequest, ProviderKind, Result};
use crate::llm::prompt::ComposedPrompt;
use crate::llm::provider::{decode, post_json};
use crate::llm::traits::ProviderAdapter;

/// Response fields probed for the generated text, in order
const RESPONSE_FIELDS: [&str; 2] = ["response", "content"];

/// Completion request
#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: String,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

/// Generic/local completion adapter
pub struct LocalAdapter {
    client: Client,
    endpoint: String,
    model: String,
}

impl LocalAdapter {
    pub fn new(client: Client, endpoint: String, model: String) -> Self {
        Self {
            client,
            endpoint,
            model,
        }
    }

    /// Pull the generated text out of whichever field the server used
    fn read_text(response: &Value) -> Result<String> {
        RESPONSE_FIELDS
            .iter()
            .find_map(|field| response.get(field).and_then(Value::as_str))
            .map(str::to_string)
            .ok_or_else(|| {
                CraiteError::malformed(format!(
                    "none of the fields {:?} present in response",
                    RESPONSE_FIELDS
                ))
            })
    }
}

#[async_trait]
impl ProviderAdapter for LocalAdapter {
    async fn send(&self, request: &GenerationRequest, prompt: &ComposedPrompt) -> Result<String> {
        let body = CompletionRequest {
            model: &self.model,
            prompt: prompt.flattened(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream: false,
        };

        tracing::debug!(endpoint = %self.endpoint, model = %self.model, "sending completion request");

        let text = post_json(self.client.post(&self.endpoint), &body).await?;
        let response: Value = decode(&text)?;
        Self::read_text(&response)
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Local
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
