//! Provider adapter implementations and factory
//!
//! Submodules implement specific upstream APIs (OpenAI, Anthropic, local).
//! The adapter is chosen once, when the generator is built.

pub mod anthropic;
pub mod local;
pub mod openai;

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::core::{CraiteError, ProviderConfig, ProviderKind, Result};
use crate::llm::models::default_model;
use crate::llm::traits::ProviderAdapter;

pub use self::anthropic::AnthropicAdapter;
pub use self::local::LocalAdapter;
pub use self::openai::OpenAiAdapter;

/// Create the adapter described by a provider configuration.
///
/// Fails with a configuration error for an unknown provider, a bad endpoint
/// or a zero timeout, and with a missing-credential error when a hosted provider has
/// no API key.
pub fn create_adapter(config: &ProviderConfig) -> Result<Arc<dyn ProviderAdapter>> {
    let kind = config.kind()?;
    let endpoint = config.resolve_endpoint(kind)?.to_string();

    let api_key = config.api_key().unwrap_or_default().to_string();
    if kind.requires_api_key() && api_key.is_empty() {
        return Err(CraiteError::missing_credential(kind.to_string()));
    }

    if config.timeout_secs == 0 {
        return Err(CraiteError::config("timeout_secs must be greater than 0"));
    }

    let model = if config.model.trim().is_empty() {
        default_model(kind)
    } else {
        config.model.trim().to_string()
    };

    let client = http_client(config.timeout_secs)?;

    tracing::debug!(provider = %kind, %endpoint, %model, "creating provider adapter");

    let adapter: Arc<dyn ProviderAdapter> = match kind {
        ProviderKind::OpenAi => Arc::new(OpenAiAdapter::new(client, endpoint, model, api_key)),
        ProviderKind::Anthropic => {
            Arc::new(AnthropicAdapter::new(client, endpoint, model, api_key))
        }
        ProviderKind::Local => Arc::new(LocalAdapter::new(client, endpoint, model)),
    };
    Ok(adapter)
}

/// Build the shared HTTP client with the configured timeout
pub(crate) fn http_client(timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(CraiteError::Transport)
}

/// POST a JSON body and return the response text.
///
/// Connection failures map to `Transport`, non-2xx statuses to `Upstream`
/// with the body preserved for diagnostics.
pub(crate) async fn post_json<B>(request: RequestBuilder, body: &B) -> Result<String>
where
    B: Serialize + ?Sized,
{
    let response = request
        .json(body)
        .send()
        .await
        .map_err(CraiteError::Transport)?;

    let status = response.status();
    let text = response.text().await.map_err(CraiteError::Transport)?;

    if !status.is_success() {
        tracing::debug!(status = status.as_u16(), "upstream returned an error status");
        return Err(CraiteError::Upstream {
            status: status.as_u16(),
            body: text,
        });
    }

    tracing::debug!(bytes = text.len(), "upstream response received");
    Ok(text)
}

/// Decode a response body into a typed record
pub(crate) fn decode<T: DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body)
        .map_err(|e| CraiteError::malformed(format!("Failed to parse response: {}", e)))
}
