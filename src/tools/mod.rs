//! Tools module - Web3 helper tools
//!
//! Template lookups, static analysis scans, and the tool registry.

pub mod analysis;
pub mod registry;
pub mod templates;
pub mod tool;

pub use analysis::{GasOptimizationTool, SecurityAuditTool};
pub use registry::ToolRegistry;
pub use templates::{OpenZeppelinTool, SolidityDocsTool};
pub use tool::{parse_params, Tool};
