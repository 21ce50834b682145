//! LLM module - upstream model integrations
//!
//! Provider adapters, prompt composition, and response extraction.

pub mod extract;
pub mod models;
pub mod prompt;
pub mod provider;
pub mod traits;

pub use extract::{extract, Extraction};
pub use models::*;
pub use prompt::{ComposedPrompt, PromptComposer, ToolContext};
pub use provider::create_adapter;
pub use traits::ProviderAdapter;
