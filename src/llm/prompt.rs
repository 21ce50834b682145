//! Prompt composition
//!
//! Every adapter receives the same system preamble and mode instruction from
//! here, so the wording cannot drift between providers.

use serde_json::Value;

use crate::core::GenerationMode;

/// Built-in system preamble
pub const SYSTEM_PREAMBLE: &str = "You are CRAITE, an elite Web3 code generator and AI development assistant. \
You specialize in blockchain development, smart contracts, dApps, DeFi protocols, and NFTs. \
Generate production-ready, secure, and optimized code following best practices.";

/// Heading placed above tool-provided context
pub const CONTEXT_HEADING: &str = "### Additional Context from Tools:";

/// Instruction appended to the system preamble for a mode
pub fn mode_instruction(mode: GenerationMode) -> &'static str {
    match mode {
        GenerationMode::Educational => {
            "Provide detailed explanations and comments to help the user learn."
        }
        GenerationMode::Production => {
            "Generate clean, production-ready code with minimal but essential comments."
        }
    }
}

/// System and user text ready to hand to an adapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedPrompt {
    /// System preamble plus mode instruction
    pub system: String,
    /// User prompt plus any tool context
    pub user: String,
}

impl ComposedPrompt {
    /// Single-string form for completion endpoints without a system role
    pub fn flattened(&self) -> String {
        format!("{}\n\n{}", self.system, self.user)
    }
}

/// Context contributed by one tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolContext {
    /// Tool that produced the context
    pub tool: String,
    /// Rendered context text
    pub content: String,
}

impl ToolContext {
    /// Create context from already-rendered text
    pub fn new(tool: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            content: content.into(),
        }
    }

    /// Render structured tool output as context.
    ///
    /// Objects become `- key: value` lines; strings are kept verbatim and
    /// everything else is written as compact JSON.
    pub fn from_data(tool: impl Into<String>, data: &Value) -> Self {
        let content = match data {
            Value::Object(map) => map
                .iter()
                .map(|(key, value)| format!("- {}: {}", key, render_value(value)))
                .collect::<Vec<_>>()
                .join("\n"),
            other => render_value(other),
        };

        Self::new(tool, content)
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Builds outbound prompts
#[derive(Debug, Clone)]
pub struct PromptComposer {
    preamble: String,
}

impl PromptComposer {
    /// Composer with the built-in preamble
    pub fn new() -> Self {
        Self {
            preamble: SYSTEM_PREAMBLE.to_string(),
        }
    }

    /// Composer with a custom preamble
    pub fn with_preamble(preamble: impl Into<String>) -> Self {
        Self {
            preamble: preamble.into(),
        }
    }

    /// The system preamble in use
    pub fn preamble(&self) -> &str {
        &self.preamble
    }

    /// Compose the system and user text for one request.
    ///
    /// `mode` of `None` appends no instruction, which is what an
    /// unrecognized mode name parses to.
    pub fn compose(
        &self,
        user_prompt: &str,
        mode: Option<GenerationMode>,
        context: &[ToolContext],
    ) -> ComposedPrompt {
        let mut system = self.preamble.clone();
        if let Some(mode) = mode {
            system.push('\n');
            system.push_str(mode_instruction(mode));
        }

        let mut user = user_prompt.to_string();
        if !context.is_empty() {
            user.push_str("\n\n");
            user.push_str(CONTEXT_HEADING);
            user.push('\n');
            for entry in context {
                user.push_str(&format!("\n**{}**:\n{}\n", entry.tool, entry.content));
            }
        }

        ComposedPrompt { system, user }
    }
}

impl Default for PromptComposer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mode_instruction_appended() {
        let composer = PromptComposer::new();

        let educational = composer.compose("Write a vault", Some(GenerationMode::Educational), &[]);
        assert!(educational.system.starts_with(SYSTEM_PREAMBLE));
        assert!(educational.system.ends_with("help the user learn."));

        let production = composer.compose("Write a vault", Some(GenerationMode::Production), &[]);
        assert!(production.system.contains("minimal but essential comments"));
        assert_eq!(production.user, "Write a vault");
    }

    #[test]
    fn test_unrecognized_mode_matches_no_mode() {
        let composer = PromptComposer::new();
        for name in ["debug", "optimize", "", "EDU"] {
            let parsed = GenerationMode::parse(name);
            assert_eq!(
                composer.compose("prompt", parsed, &[]),
                composer.compose("prompt", None, &[])
            );
        }
        assert_eq!(composer.compose("prompt", None, &[]).system, SYSTEM_PREAMBLE);
    }

    #[test]
    fn test_context_labelled_in_order() {
        let composer = PromptComposer::new();
        let context = vec![
            ToolContext::new("security_audit", "score: 100"),
            ToolContext::new("gas_optimization", "score: 90"),
        ];

        let composed = composer.compose("Audit this", None, &context);
        assert!(composed.user.starts_with("Audit this\n\n### Additional Context from Tools:\n"));

        let security = composed.user.find("**security_audit**:\nscore: 100").unwrap();
        let gas = composed.user.find("**gas_optimization**:\nscore: 90").unwrap();
        assert!(security < gas);
    }

    #[test]
    fn test_compose_is_deterministic() {
        let composer = PromptComposer::new();
        let context = vec![ToolContext::new("solidity_docs", "events")];
        let a = composer.compose("x", Some(GenerationMode::Production), &context);
        let b = composer.compose("x", Some(GenerationMode::Production), &context);
        assert_eq!(a, b);
    }

    #[test]
    fn test_context_from_object_data() {
        let context = ToolContext::from_data(
            "openzeppelin_contracts",
            &json!({"contract_type": "ERC20", "features": ["Burnable"]}),
        );
        assert_eq!(
            context.content,
            "- contract_type: ERC20\n- features: [\"Burnable\"]"
        );
    }

    #[test]
    fn test_custom_preamble_and_flattening() {
        let composer = PromptComposer::with_preamble("You write Move modules.");
        let composed = composer.compose("coin", None, &[]);
        assert_eq!(composed.flattened(), "You write Move modules.\n\ncoin");
    }
}
