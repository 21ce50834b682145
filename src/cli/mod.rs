//! CLI module - command-line interface
//!
//! Command handlers behind the `craite` binary.

pub mod commands;

pub use commands::{BatchEntry, GenerateOptions};
