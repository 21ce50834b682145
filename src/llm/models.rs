//! Model definitions and presets
//!
//! Contains known models per provider and the default used when the config
//! leaves the model empty.

use serde::{Deserialize, Serialize};

use crate::core::ProviderKind;

/// Model preset with recommended settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelPreset {
    /// Model identifier sent upstream
    pub name: String,
    /// Human-readable display name
    pub display_name: String,
    /// Provider serving the model
    pub provider: ProviderKind,
    /// Description of the model
    pub description: String,
    /// Whether this is the provider's default
    pub is_default: bool,
}

impl ModelPreset {
    fn new(
        name: &str,
        display_name: &str,
        provider: ProviderKind,
        description: &str,
        is_default: bool,
    ) -> Self {
        Self {
            name: name.to_string(),
            display_name: display_name.to_string(),
            provider,
            description: description.to_string(),
            is_default,
        }
    }
}

/// Get predefined model presets
pub fn get_model_presets() -> Vec<ModelPreset> {
    vec![
        // OpenAI
        ModelPreset::new(
            "gpt-4",
            "GPT-4",
            ProviderKind::OpenAi,
            "Strong general code generation",
            true,
        ),
        ModelPreset::new(
            "gpt-4o",
            "GPT-4o",
            ProviderKind::OpenAi,
            "Faster multimodal GPT-4 class model",
            false,
        ),
        ModelPreset::new(
            "gpt-4o-mini",
            "GPT-4o mini",
            ProviderKind::OpenAi,
            "Cheap drafts and scaffolding",
            false,
        ),
        // Anthropic
        ModelPreset::new(
            "claude-3-5-sonnet-20241022",
            "Claude 3.5 Sonnet",
            ProviderKind::Anthropic,
            "Careful smart contract authoring and review",
            true,
        ),
        ModelPreset::new(
            "claude-3-opus-20240229",
            "Claude 3 Opus",
            ProviderKind::Anthropic,
            "Long-form explanations in educational mode",
            false,
        ),
        // Local
        ModelPreset::new(
            "codellama",
            "Code Llama",
            ProviderKind::Local,
            "Meta's code-specialized model",
            true,
        ),
        ModelPreset::new(
            "deepseek-coder:6.7b",
            "DeepSeek Coder 6.7B",
            ProviderKind::Local,
            "Strong code completion and generation",
            false,
        ),
        ModelPreset::new(
            "qwen2.5-coder:7b",
            "Qwen 2.5 Coder 7B",
            ProviderKind::Local,
            "Excellent code generation on modest hardware",
            false,
        ),
    ]
}

/// Find a model preset by name
pub fn find_preset(name: &str) -> Option<ModelPreset> {
    get_model_presets().into_iter().find(|p| p.name == name)
}

/// Presets served by one provider
pub fn presets_for(provider: ProviderKind) -> Vec<ModelPreset> {
    get_model_presets()
        .into_iter()
        .filter(|p| p.provider == provider)
        .collect()
}

/// Model used when the config does not name one
pub fn default_model(provider: ProviderKind) -> String {
    presets_for(provider)
        .into_iter()
        .find(|p| p.is_default)
        .map(|p| p.name)
        .unwrap_or_default()
}
