//! Configuration management for CRAITE
//!
//! Supports environment variables, config files, and runtime overrides.
//! Providers are interchangeable via settings.
//!
//! Config file location: ~/.config/craite/config.toml

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use url::Url;

use crate::core::error::{CraiteError, Result};
use crate::core::types::GenerationMode;

/// Main configuration for CRAITE
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Upstream provider configuration
    pub provider: ProviderConfig,
    /// Generation defaults
    #[serde(default)]
    pub generation: GenerationConfig,
    /// Tool configuration
    #[serde(default)]
    pub tools: ToolsConfig,
}

/// Supported upstream API families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// OpenAI-style chat completions
    OpenAi,
    /// Anthropic-style messages
    Anthropic,
    /// Generic/local completion endpoint (Ollama and friends)
    Local,
}

impl ProviderKind {
    /// All known provider kinds
    pub const ALL: [ProviderKind; 3] = [Self::OpenAi, Self::Anthropic, Self::Local];

    /// Endpoint used when the config does not override it
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "https://api.openai.com/v1/chat/completions",
            ProviderKind::Anthropic => "https://api.anthropic.com/v1/messages",
            ProviderKind::Local => "http://localhost:11434/api/generate",
        }
    }

    /// Whether requests must carry an API key
    pub fn requires_api_key(&self) -> bool {
        !matches!(self, ProviderKind::Local)
    }

    /// Provider-specific environment variable holding the API key
    pub fn api_key_env(&self) -> Option<&'static str> {
        match self {
            ProviderKind::OpenAi => Some("OPENAI_API_KEY"),
            ProviderKind::Anthropic => Some("ANTHROPIC_API_KEY"),
            ProviderKind::Local => None,
        }
    }
}

impl FromStr for ProviderKind {
    type Err = CraiteError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAi),
            "anthropic" => Ok(ProviderKind::Anthropic),
            "local" | "ollama" => Ok(ProviderKind::Local),
            other => Err(CraiteError::config(format!(
                "Unknown provider '{}'. Expected one of: openai, anthropic, local",
                other
            ))),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::OpenAi => write!(f, "openai"),
            ProviderKind::Anthropic => write!(f, "anthropic"),
            ProviderKind::Local => write!(f, "local"),
        }
    }
}

/// Upstream provider configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider name: openai, anthropic, or local
    pub provider: String,
    /// Model identifier; empty selects the provider's default preset
    #[serde(default)]
    pub model: String,
    /// API key (falls back to environment variables)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Set when `api_key` was filled from the environment
    #[serde(skip)]
    key_from_env: bool,
    /// Endpoint override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("endpoint", &self.endpoint)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ProviderConfig {
    /// Create a provider config with no key and default model
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            model: String::new(),
            api_key: None,
            key_from_env: false,
            endpoint: None,
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Set the API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.set_api_key(api_key);
        self
    }

    /// Replace the API key with an explicit one
    pub fn set_api_key(&mut self, api_key: impl Into<String>) {
        self.api_key = Some(api_key.into());
        self.key_from_env = false;
    }

    /// Set the model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the endpoint override
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Parse the provider name
    pub fn kind(&self) -> Result<ProviderKind> {
        self.provider.parse()
    }

    /// Non-empty API key, if any
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    /// Effective endpoint: the override if set, else the provider default
    pub fn resolve_endpoint(&self, kind: ProviderKind) -> Result<Url> {
        let raw = match self.endpoint.as_deref().map(str::trim) {
            Some(endpoint) if !endpoint.is_empty() => endpoint,
            _ => kind.default_endpoint(),
        };

        Url::parse(raw)
            .map_err(|e| CraiteError::config(format!("Invalid endpoint '{}': {}", raw, e)))
    }

    /// Fill a missing API key from the environment.
    ///
    /// A key that itself came from the environment is looked up again, so
    /// switching `provider` after loading picks up that provider's variable.
    pub fn apply_env_fallback(&mut self) {
        self.apply_key_fallback(|var| env::var(var).ok());
    }

    /// Key fallback against an arbitrary variable lookup
    pub(crate) fn apply_key_fallback<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.key_from_env {
            self.api_key = None;
        }
        if self.api_key().is_none() {
            self.api_key = lookup_api_key(&self.provider, lookup);
            self.key_from_env = self.api_key.is_some();
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        let provider = env::var("CRAITE_PROVIDER").unwrap_or_else(|_| "openai".to_string());
        let mut config = Self::new(provider);
        config.model = env::var("CRAITE_MODEL").unwrap_or_default();
        config.endpoint = env::var("CRAITE_ENDPOINT").ok().filter(|e| !e.is_empty());
        config.apply_env_fallback();
        config
    }
}

/// Look up an API key: CRAITE_API_KEY first, then the provider's own variable
fn lookup_api_key<F>(provider: &str, lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    let provider_var = provider
        .parse::<ProviderKind>()
        .ok()
        .and_then(|kind| kind.api_key_env());

    std::iter::once("CRAITE_API_KEY")
        .chain(provider_var)
        .filter_map(|var| lookup(var))
        .find(|key| !key.trim().is_empty())
}

/// How verbose generated output should be by default
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputStyle {
    /// Production code, no explanation
    #[default]
    Concise,
    /// Code plus explanation
    Educational,
}

impl OutputStyle {
    /// Parse a style or mode name; anything unrecognized is concise
    pub fn from_str_lossy(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "concise" => OutputStyle::Concise,
            other => match GenerationMode::from_str_lossy(other) {
                GenerationMode::Educational => OutputStyle::Educational,
                GenerationMode::Production => OutputStyle::Concise,
            },
        }
    }

    /// Generation mode this style maps to
    pub fn mode(&self) -> GenerationMode {
        match self {
            OutputStyle::Concise => GenerationMode::Production,
            OutputStyle::Educational => GenerationMode::Educational,
        }
    }
}

/// Generation defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Default style when a request does not specify a mode
    pub output_style: OutputStyle,
    /// Language used when a request does not specify one
    pub default_language: Option<String>,
    /// Default sampling temperature for CLI requests
    pub temperature: f32,
    /// Default completion budget for CLI requests
    pub max_tokens: u32,
    /// Append learning resources to educational explanations
    pub learning_resources: bool,
    /// Replaces the built-in system preamble
    pub system_prompt: Option<String>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            output_style: env::var("CRAITE_OUTPUT_STYLE")
                .map(|style| OutputStyle::from_str_lossy(&style))
                .unwrap_or_default(),
            default_language: env::var("CRAITE_LANGUAGE").ok().filter(|l| !l.is_empty()),
            temperature: 0.7,
            max_tokens: 2000,
            learning_resources: true,
            system_prompt: None,
        }
    }
}

/// Tool configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// Tools allowed in tool-assisted generation; empty allows all
    pub enabled: Vec<String>,
}

impl ToolsConfig {
    /// Whether a tool may be used in tool-assisted generation
    pub fn allows(&self, name: &str) -> bool {
        self.enabled.is_empty() || self.enabled.iter().any(|t| t == name)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            generation: GenerationConfig::default(),
            tools: ToolsConfig::default(),
        }
    }
}

impl Config {
    /// Create a configuration around a provider, with default generation settings
    pub fn new(provider: ProviderConfig) -> Self {
        Self {
            provider,
            generation: GenerationConfig::default(),
            tools: ToolsConfig::default(),
        }
    }

    /// Get the config directory path
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("craite")
    }

    /// Get the config file path
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load configuration from file, environment, and defaults
    /// Priority: CLI args > config file > env vars > defaults
    pub fn load() -> Self {
        // Try to load .env file if it exists
        let _ = dotenvy::dotenv();

        match Self::load_from_file() {
            Ok(mut config) => {
                config.provider.apply_env_fallback();
                config
            }
            Err(e) => {
                if Self::config_exists() {
                    tracing::warn!("ignoring config file: {}", e);
                }
                Self::default()
            }
        }
    }

    /// Load configuration from file only
    pub fn load_from_file() -> Result<Self> {
        let config_path = Self::config_file();

        if !config_path.exists() {
            return Err(CraiteError::config("Config file not found"));
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|e| CraiteError::config(format!("Failed to read config: {}", e)))?;

        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| CraiteError::config(format!("Failed to parse config: {}", e)))
    }

    /// Save configuration to file and return the path
    pub fn save(&self) -> Result<PathBuf> {
        let config_dir = Self::config_dir();
        let config_path = Self::config_file();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .map_err(|e| CraiteError::config(format!("Failed to create config dir: {}", e)))?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| CraiteError::config(format!("Failed to serialize config: {}", e)))?;

        fs::write(&config_path, content)
            .map_err(|e| CraiteError::config(format!("Failed to write config: {}", e)))?;

        Ok(config_path)
    }

    /// Check if a config file exists
    pub fn config_exists() -> bool {
        Self::config_file().exists()
    }

    /// Generate a default config file content for display.
    /// The API key is left out so it never lands in a shared file by accident.
    pub fn default_config_toml() -> String {
        let mut config = Config::default();
        config.provider.api_key = None;
        toml::to_string_pretty(&config)
            .unwrap_or_else(|_| String::from("# Error generating config"))
    }
}
