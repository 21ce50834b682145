//! Shared types used across CRAITE modules
//!
//! Contains generation requests/results, tool envelopes, and common data types.

use serde::{Deserialize, Deserializer, Serialize};

use crate::core::error::{CraiteError, Result};

/// Generation style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    /// Clean code with minimal comments
    #[default]
    Production,
    /// Code with detailed explanations
    Educational,
}

impl GenerationMode {
    /// Parse a mode name, returning `None` for anything unrecognized
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" => Some(Self::Production),
            "educational" => Some(Self::Educational),
            _ => None,
        }
    }

    /// Parse a mode name, falling back to production
    pub fn from_str_lossy(value: &str) -> Self {
        Self::parse(value).unwrap_or_default()
    }
}

impl<'de> Deserialize<'de> for GenerationMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::from_str_lossy(&name))
    }
}

impl std::fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationMode::Production => write!(f, "production"),
            GenerationMode::Educational => write!(f, "educational"),
        }
    }
}

/// A single code generation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// What the user asked for
    pub prompt: String,
    /// Target language tag (solidity, rust, typescript, ...)
    pub language: Option<String>,
    /// Generation style; `None` defers to the configured output style
    pub mode: Option<GenerationMode>,
    /// Sampling temperature (0.0 - 2.0)
    pub temperature: f32,
    /// Maximum tokens to generate
    pub max_tokens: u32,
}

impl GenerationRequest {
    /// Default sampling temperature
    pub const DEFAULT_TEMPERATURE: f32 = 0.7;
    /// Default completion budget
    pub const DEFAULT_MAX_TOKENS: u32 = 2000;

    /// Create a request with default sampling settings
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            language: None,
            mode: None,
            temperature: Self::DEFAULT_TEMPERATURE,
            max_tokens: Self::DEFAULT_MAX_TOKENS,
        }
    }

    /// Set the target language
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Set the generation mode
    pub fn mode(mut self, mode: GenerationMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Set the generation mode from a name; unknown names mean production
    pub fn mode_name(self, mode: &str) -> Self {
        self.mode(GenerationMode::from_str_lossy(mode))
    }

    /// Set the sampling temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the completion budget
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Check sampling settings before any upstream call is made
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(CraiteError::invalid_request(format!(
                "temperature must be within [0, 2], got {}",
                self.temperature
            )));
        }
        if self.max_tokens == 0 {
            return Err(CraiteError::invalid_request(
                "max_tokens must be a positive integer",
            ));
        }
        Ok(())
    }
}

/// Normalized result of a generation call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Extracted code
    pub code: String,
    /// Language tag of the code
    pub language: String,
    /// Surrounding prose, only kept in educational mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    /// Tools that succeeded, in the order they were requested
    #[serde(default)]
    pub tools_used: Vec<String>,
}

/// Result of executing a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Whether the execution was successful
    pub success: bool,
    /// Tool-specific structured output
    pub data: serde_json::Value,
    /// Failure reason
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolResult {
    /// Create a successful result
    pub fn success(data: serde_json::Value) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }

    /// Create a failed result
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: serde_json::Value::Null,
            error: Some(error.into()),
        }
    }
}

/// Description of a registered tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Name the tool is registered under
    pub name: String,
    /// Description of what the tool does
    pub description: String,
    /// JSON Schema for the parameters
    pub parameters: serde_json::Value,
}
