//! CLI commands
//!
//! Each handler returns the text to print so the binary stays a thin shell.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::core::{
    Config, CraiteError, GenerationMode, GenerationRequest, GenerationResult, ProviderKind,
    Result,
};
use crate::generator::Generator;
use crate::llm::models::presets_for;
use crate::tools::templates::openzeppelin::find_kind;
use crate::tools::ToolRegistry;

const RULE: &str = "──────────────────────────────────────────────────";

/// Options for `craite generate`
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub prompt: String,
    pub language: Option<String>,
    pub mode: Option<String>,
    pub tools: Vec<String>,
    pub output: Option<PathBuf>,
}

/// Build a request from CLI options, taking sampling defaults from config
pub fn build_request(config: &Config, opts: &GenerateOptions) -> GenerationRequest {
    let mut request = GenerationRequest::new(opts.prompt.as_str())
        .temperature(config.generation.temperature)
        .max_tokens(config.generation.max_tokens);

    if let Some(language) = opts.language.as_deref() {
        request = request.language(language);
    }

    if let Some(name) = opts.mode.as_deref() {
        if GenerationMode::parse(name).is_none() {
            tracing::warn!(mode = %name, "unknown mode, using production");
        }
        request = request.mode_name(name);
    }

    request
}

/// `craite generate`
pub async fn generate(
    generator: &Generator,
    opts: &GenerateOptions,
    token: &CancellationToken,
) -> Result<String> {
    let request = build_request(generator.config(), opts);
    let result = generator
        .generate_cancellable(&request, &opts.tools, token)
        .await?;

    let mut output = render_result(&result);
    if let Some(path) = opts.output.as_deref() {
        output.push_str(&save_code(path, &result.code)?);
    }
    Ok(output)
}

/// `craite scaffold`
pub async fn scaffold(
    generator: &Generator,
    contract_type: &str,
    name: &str,
    features: &[String],
    output: Option<&Path>,
    token: &CancellationToken,
) -> Result<String> {
    if find_kind(contract_type).is_none() {
        return Err(CraiteError::invalid_request(format!(
            "unknown contract type: {}",
            contract_type
        )));
    }

    let opts = GenerateOptions {
        prompt: scaffold_prompt(contract_type, name, features),
        language: Some("solidity".to_string()),
        mode: Some(GenerationMode::Production.to_string()),
        tools: vec!["openzeppelin_contracts".to_string()],
        output: output.map(Path::to_path_buf),
    };
    generate(generator, &opts, token).await
}

/// Prompt used to scaffold a contract
pub fn scaffold_prompt(contract_type: &str, name: &str, features: &[String]) -> String {
    let mut prompt = format!("Create a {} contract named {}", contract_type, name);
    if !features.is_empty() {
        prompt.push_str(&format!(" with features: {}", features.join(", ")));
    }
    prompt
}

/// One entry of a `craite batch` prompts file
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BatchEntry {
    pub prompt: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub mode: Option<String>,
    /// Output file name; defaults to `generated_<index>.<language>`
    #[serde(default)]
    pub filename: Option<String>,
}

/// Parse a prompts file: a JSON array of [`BatchEntry`] objects
pub fn parse_batch(text: &str) -> Result<Vec<BatchEntry>> {
    let value: serde_json::Value = serde_json::from_str(text).map_err(|e| {
        CraiteError::invalid_request(format!("prompts file is not valid JSON: {}", e))
    })?;
    if !value.is_array() {
        return Err(CraiteError::invalid_request(
            "prompts file must contain a JSON array",
        ));
    }

    serde_json::from_value(value)
        .map_err(|e| CraiteError::invalid_request(format!("invalid prompt entry: {}", e)))
}

/// `craite batch`: generate every entry and write each result to `output_dir`.
///
/// A failed entry is reported and skipped; the others are still written.
pub async fn batch(
    generator: &Generator,
    entries: &[BatchEntry],
    output_dir: &Path,
    max_concurrent: usize,
) -> Result<String> {
    let requests = entries
        .iter()
        .map(|entry| {
            let opts = GenerateOptions {
                prompt: entry.prompt.clone(),
                language: entry.language.clone(),
                mode: entry.mode.clone(),
                ..Default::default()
            };
            build_request(generator.config(), &opts)
        })
        .collect();

    let results = generator.generate_batch(requests, max_concurrent).await;
    fs::create_dir_all(output_dir)?;

    let mut output = String::new();
    let mut written = 0;
    for (index, (entry, result)) in entries.iter().zip(results).enumerate() {
        match result {
            Ok(result) => {
                let path = output_dir.join(batch_filename(entry, index, &result.language));
                fs::write(&path, &result.code)?;
                output.push_str(&format!("✓ Generated: {}\n", path.display()));
                written += 1;
            }
            Err(err) => {
                tracing::warn!(index, error = %err, "batch entry failed");
                output.push_str(&format!("✗ Prompt {} failed: {}\n", index, err));
            }
        }
    }

    output.push_str(&format!(
        "\nBatch complete: {} of {} generated. Files saved to: {}\n",
        written,
        entries.len(),
        output_dir.display()
    ));
    Ok(output)
}

/// File name for a batch entry, kept inside the output directory
fn batch_filename(entry: &BatchEntry, index: usize, language: &str) -> PathBuf {
    entry
        .filename
        .as_deref()
        .and_then(|name| Path::new(name).file_name())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(format!("generated_{}.{}", index, language)))
}

fn save_code(path: &Path, code: &str) -> Result<String> {
    fs::write(path, code)?;
    Ok(format!("\n✓ Code saved to: {}\n", path.display()))
}

/// Human-readable rendering of a generation result
pub fn render_result(result: &GenerationResult) -> String {
    let mut output = format!("Generated Code ({}):\n{}\n{}\n", result.language, RULE, result.code);

    if let Some(explanation) = result.explanation.as_deref() {
        output.push_str(&format!("\nExplanation:\n{}\n", explanation));
    }

    if !result.tools_used.is_empty() {
        output.push_str(&format!("\nTools Used: {}\n", result.tools_used.join(", ")));
    }

    output
}

/// `craite analyze`: offline security and gas scans of a source file
pub fn analyze(registry: &ToolRegistry, code: &str, security: bool, gas: bool) -> String {
    let mut output = String::new();

    if security {
        output.push_str("\nSecurity Analysis:\n");
        let result = registry.execute(
            "security_audit",
            &serde_json::json!({ "code": code, "language": "solidity" }),
        );
        if result.success {
            output.push_str(&format!("Score: {}/100\n", result.data["score"]));
            match result.data["issues"].as_array() {
                Some(issues) if !issues.is_empty() => {
                    output.push_str("\nIssues found:\n");
                    for issue in issues {
                        output.push_str(&format!(
                            "  • {} ({}): {}\n",
                            text(&issue["type"]),
                            text(&issue["severity"]),
                            text(&issue["message"])
                        ));
                    }
                }
                _ => output.push_str("✓ No security issues found!\n"),
            }
        } else {
            output.push_str(&format!("Failed: {}\n", result.error.unwrap_or_default()));
        }
    }

    if gas {
        output.push_str("\nGas Optimization:\n");
        let result = registry.execute("gas_optimization", &serde_json::json!({ "code": code }));
        if result.success {
            output.push_str(&format!(
                "Optimization Score: {}/100\nEstimated Savings: {}\n",
                result.data["optimization_score"],
                text(&result.data["estimated_total_savings"])
            ));
            match result.data["suggestions"].as_array() {
                Some(suggestions) if !suggestions.is_empty() => {
                    output.push_str("\nSuggestions:\n");
                    for suggestion in suggestions {
                        output.push_str(&format!(
                            "  • {}: {} (Impact: {}, Saves: {})\n",
                            text(&suggestion["type"]),
                            text(&suggestion["suggestion"]),
                            text(&suggestion["impact"]),
                            text(&suggestion["gas_saved"])
                        ));
                    }
                }
                _ => output.push_str("✓ Code is well optimized!\n"),
            }
        } else {
            output.push_str(&format!("Failed: {}\n", result.error.unwrap_or_default()));
        }
    }

    output
}

fn text(value: &serde_json::Value) -> &str {
    value.as_str().unwrap_or_default()
}

/// `craite tools`
pub fn tools_listing(registry: &ToolRegistry, verbose: bool) -> String {
    let mut output = format!("Available Tools:\n{}\n", RULE);
    for definition in registry.definitions() {
        output.push_str(&format!("  {} - {}\n", definition.name, definition.description));
        if verbose {
            let schema = serde_json::to_string_pretty(&definition.parameters)
                .unwrap_or_else(|_| definition.parameters.to_string());
            for line in schema.lines() {
                output.push_str(&format!("      {}\n", line));
            }
        }
    }
    output
}

/// `craite models`
pub fn models_listing(config: &Config) -> String {
    let current = config.provider.kind().ok();
    let mut output = String::from("Model Presets:\n");

    for kind in ProviderKind::ALL {
        let marker = if current == Some(kind) { " (active)" } else { "" };
        output.push_str(&format!("\n{}{}:\n", kind, marker));
        for preset in presets_for(kind) {
            let default = if preset.is_default { " [default]" } else { "" };
            output.push_str(&format!(
                "  {}{}\n    {}\n",
                preset.name, default, preset.description
            ));
        }
    }

    let model = if config.provider.model.is_empty() {
        "(provider default)"
    } else {
        config.provider.model.as_str()
    };
    output.push_str(&format!("\nConfigured model: {}\n", model));
    output
}

/// `craite config`
pub fn config_summary(config: &Config) -> String {
    let mut shown = config.clone();
    if shown.provider.api_key.is_some() {
        shown.provider.api_key = Some("<redacted>".to_string());
    }

    let body = toml::to_string_pretty(&shown)
        .unwrap_or_else(|e| format!("# failed to render config: {}", e));
    let source = if Config::config_exists() {
        Config::config_file().display().to_string()
    } else {
        "defaults and environment (no config file)".to_string()
    };

    format!("Configuration from {}\n{}\n{}", source, RULE, body)
}

/// `craite config --init`
pub fn init_config() -> Result<String> {
    if Config::config_exists() {
        return Ok(format!(
            "Config file already exists: {}",
            Config::config_file().display()
        ));
    }

    let mut config = Config::default();
    config.provider.api_key = None;
    let path = config.save()?;
    Ok(format!("✓ Wrote default config to: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;

    use crate::core::config::OutputStyle;
    use crate::core::ProviderConfig;
    use crate::llm::{ComposedPrompt, ProviderAdapter};

    /// Replies with a fenced block tagged with the request language.
    /// A prompt of "fail" gets an upstream error.
    struct EchoAdapter;

    #[async_trait]
    impl ProviderAdapter for EchoAdapter {
        async fn send(
            &self,
            request: &GenerationRequest,
            _prompt: &ComposedPrompt,
        ) -> Result<String> {
            if request.prompt == "fail" {
                return Err(CraiteError::Upstream {
                    status: 500,
                    body: "boom".to_string(),
                });
            }
            let language = request.language.as_deref().unwrap_or("text");
            Ok(format!(
                "Some notes.\n```{}\n// {}\n```\nMore notes.",
                language, request.prompt
            ))
        }

        fn kind(&self) -> ProviderKind {
            ProviderKind::Local
        }

        fn model(&self) -> &str {
            "echo"
        }

        fn endpoint(&self) -> &str {
            "http://localhost/echo"
        }
    }

    fn echo_generator(output_style: OutputStyle) -> Generator {
        let mut config = Config::new(ProviderConfig::new("local"));
        config.generation.output_style = output_style;
        config.generation.default_language = None;
        config.tools.enabled.clear();
        Generator::with_adapter(config, Arc::new(EchoAdapter))
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("craite-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_build_request_uses_config_defaults() {
        let mut config = Config::new(ProviderConfig::new("local"));
        config.generation.temperature = 0.5;
        config.generation.max_tokens = 256;

        let opts = GenerateOptions {
            prompt: "Create an NFT".into(),
            language: Some("solidity".into()),
            mode: Some("educational".into()),
            ..Default::default()
        };
        let request = build_request(&config, &opts);

        assert_eq!(request.temperature, 0.5);
        assert_eq!(request.max_tokens, 256);
        assert_eq!(request.mode, Some(GenerationMode::Educational));
    }

    #[test]
    fn test_unknown_mode_means_production() {
        let config = Config::new(ProviderConfig::new("local"));
        let opts = GenerateOptions {
            prompt: "x".into(),
            mode: Some("verbose".into()),
            ..Default::default()
        };
        let request = build_request(&config, &opts);
        assert_eq!(request.mode, Some(GenerationMode::Production));
    }

    #[test]
    fn test_scaffold_prompt() {
        assert_eq!(
            scaffold_prompt("ERC20", "Gold", &["Burnable".into(), "Permit".into()]),
            "Create a ERC20 contract named Gold with features: Burnable, Permit"
        );
        assert_eq!(
            scaffold_prompt("ERC721", "Art", &[]),
            "Create a ERC721 contract named Art"
        );
    }

    #[test]
    fn test_scaffold_rejects_unknown_kind() {
        let generator = Generator::new(Config::new(ProviderConfig::new("local"))).unwrap();
        let token = CancellationToken::new();

        let err = tokio_test::block_on(scaffold(
            &generator,
            "ERC4626",
            "Vault",
            &[],
            None,
            &token,
        ))
        .unwrap_err();
        assert_eq!(err.kind(), "invalid_request");
    }

    #[tokio::test]
    async fn test_scaffold_is_always_production() {
        let generator = echo_generator(OutputStyle::Educational);
        let output = scaffold(
            &generator,
            "ERC721",
            "Art",
            &[],
            None,
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert!(output.starts_with("Generated Code (solidity):"));
        assert!(!output.contains("Explanation"));
        assert!(output.contains("Tools Used: openzeppelin_contracts"));
    }

    #[test]
    fn test_parse_batch() {
        let entries = parse_batch(
            r#"[
                {"prompt": "Create a token", "language": "solidity", "filename": "Token.sol"},
                {"prompt": "Create a vault"}
            ]"#,
        )
        .unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].filename.as_deref(), Some("Token.sol"));
        assert_eq!(entries[1].language, None);

        let err = parse_batch(r#"{"prompt": "x"}"#).unwrap_err();
        assert_eq!(err.kind(), "invalid_request");
        assert!(parse_batch("not json").is_err());
        assert!(parse_batch(r#"[{"language": "rust"}]"#).is_err());
    }

    #[tokio::test]
    async fn test_batch_writes_files_and_reports_failures() {
        let dir = scratch_dir("batch");
        let entries = vec![
            BatchEntry {
                prompt: "Create a token".into(),
                language: Some("solidity".into()),
                mode: None,
                filename: Some("../Token.sol".into()),
            },
            BatchEntry {
                prompt: "fail".into(),
                language: None,
                mode: None,
                filename: None,
            },
            BatchEntry {
                prompt: "Create a program".into(),
                language: Some("rust".into()),
                mode: Some("educational".into()),
                filename: None,
            },
        ];

        let output = batch(&echo_generator(OutputStyle::Concise), &entries, &dir, 2)
            .await
            .unwrap();

        assert_eq!(
            fs::read_to_string(dir.join("Token.sol")).unwrap(),
            "// Create a token"
        );
        assert_eq!(
            fs::read_to_string(dir.join("generated_2.rust")).unwrap(),
            "// Create a program"
        );
        assert!(!dir.join("generated_1.text").exists());
        assert!(output.contains("✗ Prompt 1 failed"));
        assert!(output.contains("Batch complete: 2 of 3 generated"));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_analyze_reports_both_scans() {
        let registry = ToolRegistry::with_defaults();
        let output = analyze(&registry, "require(tx.origin == owner);", true, true);

        assert!(output.contains("Score: 80/100"));
        assert!(output.contains("access_control (medium)"));
        assert!(output.contains("Optimization Score: 100/100"));
        assert!(output.contains("✓ Code is well optimized!"));
    }

    #[test]
    fn test_analyze_security_only() {
        let registry = ToolRegistry::with_defaults();
        let output = analyze(&registry, "contract A {}", true, false);
        assert!(output.contains("✓ No security issues found!"));
        assert!(!output.contains("Gas Optimization"));
    }

    #[test]
    fn test_render_result() {
        let result = GenerationResult {
            code: "contract A {}".into(),
            language: "solidity".into(),
            explanation: None,
            tools_used: vec!["solidity_docs".into()],
        };
        let output = render_result(&result);
        assert!(output.starts_with("Generated Code (solidity):"));
        assert!(output.contains("Tools Used: solidity_docs"));
        assert!(!output.contains("Explanation"));
    }

    #[test]
    fn test_tools_listing() {
        let registry = ToolRegistry::with_defaults();
        let brief = tools_listing(&registry, false);
        assert!(brief.contains("  gas_optimization - Analyze and optimize gas consumption"));
        assert!(!brief.contains("\"properties\""));

        let verbose = tools_listing(&registry, true);
        assert!(verbose.contains("\"properties\""));
    }

    #[test]
    fn test_models_listing_marks_active() {
        let config = Config::new(ProviderConfig::new("anthropic"));
        let output = models_listing(&config);
        assert!(output.contains("anthropic (active):"));
        assert!(output.contains("claude-3-5-sonnet-20241022 [default]"));
        assert!(output.contains("Configured model: (provider default)"));
    }

    #[test]
    fn test_config_summary_redacts_key() {
        let config = Config::new(ProviderConfig::new("openai").with_api_key("sk-secret"));
        let output = config_summary(&config);
        assert!(!output.contains("sk-secret"));
        assert!(output.contains("<redacted>"));
    }
}
