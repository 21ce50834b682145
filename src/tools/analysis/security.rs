//! Security audit tool
//!
//! Flags a handful of well-known Solidity hazards by keyword.

use serde_json::{json, Value};

use crate::core::ToolResult;
use crate::tools::analysis::scan::{Check, PatternScan, ScanParams, Trigger};
use crate::tools::tool::{parse_params, Tool};

const CHECKS: &[Check] = &[
    Check {
        kind: "reentrancy",
        level: "high",
        message: "Potential reentrancy vulnerability detected",
        advice: "Use checks-effects-interactions pattern or ReentrancyGuard",
        trigger: Trigger::any_of(&["call.value", ".call{value:"]),
    },
    Check {
        kind: "access_control",
        level: "medium",
        message: "tx.origin used for authentication",
        advice: "Use msg.sender for authentication instead of tx.origin",
        trigger: Trigger::all_of(&["tx.origin"]),
    },
    Check {
        kind: "timestamp_dependence",
        level: "low",
        message: "Block timestamp used, can be manipulated by miners",
        advice: "Avoid using block.timestamp for critical logic",
        trigger: Trigger::all_of(&["block.timestamp"]),
    },
    Check {
        kind: "delegatecall",
        level: "high",
        message: "Delegatecall usage detected, ensure target is trusted",
        advice: "Ensure delegatecall targets are trusted and immutable",
        trigger: Trigger::all_of(&["delegatecall"]),
    },
];

/// Points deducted per issue
pub const ISSUE_PENALTY: u32 = 20;

const SCAN: PatternScan = PatternScan::new(CHECKS, ISSUE_PENALTY);

/// Heuristic security scanner for Solidity sources
#[derive(Debug, Clone, Default)]
pub struct SecurityAuditTool;

impl SecurityAuditTool {
    /// Create a new security audit tool
    pub fn new() -> Self {
        Self
    }

    /// Scan source text. Checks only run for Solidity.
    pub fn audit(&self, code: &str, language: &str) -> Value {
        let findings = if language.eq_ignore_ascii_case("solidity") {
            SCAN.scan(code)
        } else {
            Vec::new()
        };

        let issues: Vec<Value> = findings
            .iter()
            .map(|check| {
                json!({
                    "type": check.kind,
                    "severity": check.level,
                    "message": check.message,
                })
            })
            .collect();
        let recommendations: Vec<&str> = findings.iter().map(|check| check.advice).collect();

        json!({
            "issues": issues,
            "score": SCAN.score(findings.len()),
            "recommendations": recommendations,
        })
    }
}

impl Tool for SecurityAuditTool {
    fn name(&self) -> &str {
        "security_audit"
    }

    fn description(&self) -> &str {
        "Automated security checks and vulnerability detection"
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "code": {
                    "type": "string",
                    "description": "Contract source to audit"
                },
                "query": {
                    "type": "string",
                    "description": "Scanned when code is absent"
                },
                "language": {
                    "type": "string",
                    "description": "Source language (default: solidity)"
                }
            }
        })
    }

    fn execute(&self, params: &Value) -> ToolResult {
        let params: ScanParams = match parse_params(params) {
            Ok(params) => params,
            Err(failure) => return failure,
        };

        let language = params.language.as_deref().unwrap_or("solidity");
        ToolResult::success(self.audit(params.source(), language))
    }
}
