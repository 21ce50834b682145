//! Generation facade
//!
//! Ties the provider adapter, prompt composer, response extractor, and tool
//! registry together behind one entry point.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use serde_json::json;
use tokio_util::sync::CancellationToken;

use crate::core::{
    Config, CraiteError, GenerationMode, GenerationRequest, GenerationResult, ProviderKind,
    Result,
};
use crate::llm::{create_adapter, extract, PromptComposer, ProviderAdapter, ToolContext};
use crate::tools::{Tool, ToolRegistry};

/// Language reported when nothing else names one
pub const FALLBACK_LANGUAGE: &str = "plaintext";

/// Appended to educational explanations when learning resources are enabled
pub const LEARNING_RESOURCES: &str = "\n\n### Key Concepts:
- Always validate inputs in smart contracts
- Use established patterns and standards (ERC-20, ERC-721, etc.)
- Consider gas optimization in your implementation
- Test thoroughly on testnets before mainnet deployment

### Additional Resources:
- OpenZeppelin Documentation: https://docs.openzeppelin.com/
- Ethereum Developer Resources: https://ethereum.org/developers/
- Security Best Practices: https://consensys.github.io/smart-contract-best-practices/";

/// Code generator bound to one provider
pub struct Generator {
    /// Configuration
    config: Config,
    /// Upstream adapter, fixed at construction
    adapter: Arc<dyn ProviderAdapter>,
    /// Prompt composer shared by every provider
    composer: PromptComposer,
    /// Registered tools
    tools: ToolRegistry,
}

impl Generator {
    /// Build a generator and its provider adapter from configuration
    pub fn new(config: Config) -> Result<Self> {
        let adapter = create_adapter(&config.provider)?;
        Ok(Self::with_adapter(config, adapter))
    }

    /// Build a generator around an existing adapter
    pub fn with_adapter(config: Config, adapter: Arc<dyn ProviderAdapter>) -> Self {
        let composer = match config.generation.system_prompt.as_deref() {
            Some(preamble) if !preamble.trim().is_empty() => {
                PromptComposer::with_preamble(preamble)
            }
            _ => PromptComposer::new(),
        };

        Self {
            config,
            adapter,
            composer,
            tools: ToolRegistry::with_defaults(),
        }
    }

    /// Generate code for a single request
    pub async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult> {
        self.run(request, &[], None).await
    }

    /// Generate code, first running the named tools and feeding their
    /// output to the model as extra context.
    ///
    /// Tools run in the order given. A tool that is unknown, disabled, or
    /// fails is logged and skipped.
    pub async fn generate_with_tools(
        &self,
        request: &GenerationRequest,
        tool_names: &[String],
    ) -> Result<GenerationResult> {
        self.run(request, tool_names, None).await
    }

    /// Like [`generate_with_tools`](Self::generate_with_tools), aborting with
    /// [`CraiteError::Cancelled`] once `token` fires.
    pub async fn generate_cancellable(
        &self,
        request: &GenerationRequest,
        tool_names: &[String],
        token: &CancellationToken,
    ) -> Result<GenerationResult> {
        self.run(request, tool_names, Some(token)).await
    }

    /// Run several requests with at most `max_concurrent` in flight.
    ///
    /// Results come back in input order.
    pub async fn generate_batch(
        &self,
        requests: Vec<GenerationRequest>,
        max_concurrent: usize,
    ) -> Vec<Result<GenerationResult>> {
        stream::iter(requests)
            .map(|request| async move { self.generate(&request).await })
            .buffered(max_concurrent.max(1))
            .collect()
            .await
    }

    /// Register an extra tool. An existing tool with the same name is replaced.
    pub fn register_tool<T: Tool + 'static>(&mut self, tool: T) {
        self.tools.register(tool);
    }

    /// Registered tool names, sorted
    pub fn list_tools(&self) -> Vec<String> {
        self.tools.list()
    }

    /// The tool registry
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Provider the adapter talks to
    pub fn provider(&self) -> ProviderKind {
        self.adapter.kind()
    }

    /// Model requested upstream
    pub fn model(&self) -> &str {
        self.adapter.model()
    }

    fn effective_mode(&self, request: &GenerationRequest) -> GenerationMode {
        request
            .mode
            .unwrap_or_else(|| self.config.generation.output_style.mode())
    }

    /// Language known before the response arrives
    fn requested_language(&self, request: &GenerationRequest) -> Option<String> {
        request
            .language
            .clone()
            .or_else(|| self.config.generation.default_language.clone())
    }

    /// Execute the named tools and collect the context of the ones that succeed
    fn gather_context(
        &self,
        request: &GenerationRequest,
        tool_names: &[String],
    ) -> (Vec<ToolContext>, Vec<String>) {
        let params = json!({
            "query": request.prompt,
            "language": self.requested_language(request),
        });

        let mut context = Vec::new();
        let mut used = Vec::new();

        for name in tool_names {
            if !self.config.tools.allows(name) {
                tracing::warn!(tool = %name, "tool not enabled, skipping");
                continue;
            }

            let result = self.tools.execute(name, &params);
            if result.success {
                tracing::debug!(tool = %name, "tool succeeded");
                context.push(ToolContext::from_data(name.as_str(), &result.data));
                used.push(name.clone());
            } else {
                tracing::warn!(
                    tool = %name,
                    error = result.error.as_deref().unwrap_or("unknown error"),
                    "tool failed, skipping"
                );
            }
        }

        (context, used)
    }

    async fn run(
        &self,
        request: &GenerationRequest,
        tool_names: &[String],
        token: Option<&CancellationToken>,
    ) -> Result<GenerationResult> {
        request.validate()?;

        if token.is_some_and(CancellationToken::is_cancelled) {
            return Err(CraiteError::Cancelled);
        }

        let mode = self.effective_mode(request);
        let (context, tools_used) = self.gather_context(request, tool_names);
        let prompt = self.composer.compose(&request.prompt, Some(mode), &context);

        tracing::debug!(
            provider = %self.adapter.kind(),
            model = self.adapter.model(),
            %mode,
            tools = tools_used.len(),
            system_len = prompt.system.len(),
            user_len = prompt.user.len(),
            "sending generation request"
        );

        let raw = match token {
            Some(token) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => return Err(CraiteError::Cancelled),
                    reply = self.adapter.send(request, &prompt) => reply?,
                }
            }
            None => self.adapter.send(request, &prompt).await?,
        };

        tracing::debug!(response_len = raw.len(), "received generation response");

        let extraction = extract(&raw);

        let language = self
            .requested_language(request)
            .or(extraction.language_hint)
            .unwrap_or_else(|| FALLBACK_LANGUAGE.to_string());

        let explanation = match mode {
            GenerationMode::Educational => extraction.explanation.map(|explanation| {
                if self.config.generation.learning_resources {
                    explanation + LEARNING_RESOURCES
                } else {
                    explanation
                }
            }),
            GenerationMode::Production => None,
        };

        Ok(GenerationResult {
            code: extraction.code,
            language,
            explanation,
            tools_used,
        })
    }
}
