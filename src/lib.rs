//! CRAITE - AI-powered Web3 code generation
//!
//! Sends code-generation prompts to an LLM provider (OpenAI, Anthropic, or a
//! local completion server), optionally enriched with output from built-in
//! Web3 tools, and normalizes the reply into code plus explanation.
//!
//! # Architecture
//!
//! - **Core**: Shared types, configuration, and error handling
//! - **LLM**: Provider adapters, prompt composition, response extraction
//! - **Tools**: Tool registry with template and analysis tools
//! - **Generator**: Orchestration entry point
//! - **CLI**: Command handlers for the `craite` binary
//!
//! # Usage
//!
//! ```rust,no_run
//! use craite::{Config, GenerationMode, GenerationRequest, Generator};
//!
//! #[tokio::main]
//! async fn main() -> craite::Result<()> {
//!     let generator = Generator::new(Config::load())?;
//!
//!     let request = GenerationRequest::new("Create an ERC20 token with burn support")
//!         .language("solidity")
//!         .mode(GenerationMode::Educational);
//!     let tools = vec!["openzeppelin_contracts".to_string()];
//!
//!     let result = generator.generate_with_tools(&request, &tools).await?;
//!     println!("{}", result.code);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod core;
pub mod generator;
pub mod llm;
pub mod tools;

// Re-export commonly used items
pub use core::{
    Config, CraiteError, GenerationMode, GenerationRequest, GenerationResult, ProviderConfig,
    ProviderKind, Result, ToolResult,
};
pub use generator::Generator;
pub use tools::{Tool, ToolRegistry};
