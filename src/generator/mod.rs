//! Generator module - the orchestration entry point
//!
//! Runs tools, composes the prompt, calls the provider, and normalizes the
//! reply into a [`GenerationResult`](crate::core::GenerationResult).

pub mod facade;

pub use facade::{Generator, FALLBACK_LANGUAGE, LEARNING_RESOURCES};
