//! Provider adapter trait for abstracting different upstream APIs
//!
//! Enables swapping between OpenAI, Anthropic, and local endpoints.

use async_trait::async_trait;

use crate::core::{GenerationRequest, ProviderKind, Result};
use crate::llm::prompt::ComposedPrompt;

/// Trait for upstream LLM adapters.
///
/// An adapter turns a composed prompt plus sampling settings into one HTTP
/// call and returns the raw generated text. It never retries; retry policy
/// belongs to the caller.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Send a single generation request and return the raw upstream text
    async fn send(&self, request: &GenerationRequest, prompt: &ComposedPrompt) -> Result<String>;

    /// Which API family this adapter speaks
    fn kind(&self) -> ProviderKind;

    /// Model requested upstream
    fn model(&self) -> &str;

    /// Endpoint requests are posted to
    fn endpoint(&self) -> &str;
}
