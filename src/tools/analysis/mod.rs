//! Static analysis tools
//!
//! Keyword scans over contract source: security hazards and gas usage.

pub mod gas;
pub mod scan;
pub mod security;

pub use gas::GasOptimizationTool;
pub use scan::{Check, PatternScan, ScanParams, Trigger};
pub use security::SecurityAuditTool;
