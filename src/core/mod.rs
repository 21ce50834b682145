//! Core module - shared infrastructure for CRAITE
//!
//! This module contains foundational types, configuration, and error handling
//! used throughout the crate.

pub mod config;
pub mod error;
pub mod types;

pub use config::{Config, ProviderConfig, ProviderKind};
pub use error::{CraiteError, Result};
pub use types::*;
