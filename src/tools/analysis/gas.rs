//! Gas optimization tool

use serde_json::{json, Value};

use crate::core::ToolResult;
use crate::tools::analysis::scan::{Check, PatternScan, ScanParams, Trigger};
use crate::tools::tool::{parse_params, Tool};

// `message` carries the suggestion, `advice` the expected saving.
const CHECKS: &[Check] = &[
    Check {
        kind: "storage",
        level: "high",
        message: "Consider using bytes32 for fixed-length strings",
        advice: "~2000 per storage slot",
        trigger: Trigger::all_of(&["string "]).unless(&["string memory"]),
    },
    Check {
        kind: "loops",
        level: "medium",
        message: "Cache array length outside the loop",
        advice: "~100 per iteration",
        trigger: Trigger::all_of(&["for (", ".length"]),
    },
    Check {
        kind: "loops",
        level: "low",
        message: "Use ++i instead of i++ in loops",
        advice: "~5 per iteration",
        trigger: Trigger::all_of(&["i++"]),
    },
    Check {
        kind: "functions",
        level: "medium",
        message: "Use external instead of public for functions not called internally",
        advice: "~200 per call",
        trigger: Trigger::all_of(&["public"]).unless(&["external"]),
    },
    Check {
        kind: "storage",
        level: "high",
        message: "Minimize storage writes, batch updates when possible",
        advice: "~5000-20000 per storage slot",
        trigger: Trigger::all_of(&["storage", "="]),
    },
];

/// Points deducted per suggestion
pub const SUGGESTION_PENALTY: u32 = 10;

/// Flat estimate credited per suggestion
const GAS_PER_SUGGESTION: usize = 1000;

const SCAN: PatternScan = PatternScan::new(CHECKS, SUGGESTION_PENALTY);

/// Heuristic gas usage reviewer
#[derive(Debug, Clone, Default)]
pub struct GasOptimizationTool;

impl GasOptimizationTool {
    pub fn new() -> Self {
        Self
    }

    /// Suggest gas savings for a source text
    pub fn review(&self, code: &str) -> Value {
        let findings = SCAN.scan(code);

        let suggestions: Vec<Value> = findings
            .iter()
            .map(|check| {
                json!({
                    "type": check.kind,
                    "suggestion": check.message,
                    "impact": check.level,
                    "gas_saved": check.advice,
                })
            })
            .collect();

        json!({
            "suggestions": suggestions,
            "estimated_total_savings": format!("{} gas", findings.len() * GAS_PER_SUGGESTION),
            "optimization_score": SCAN.score(findings.len()),
        })
    }
}

impl Tool for GasOptimizationTool {
    fn name(&self) -> &str {
        "gas_optimization"
    }

    fn description(&self) -> &str {
        "Analyze and optimize gas consumption"
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "code": {
                    "type": "string",
                    "description": "Contract source to review"
                },
                "query": {
                    "type": "string",
                    "description": "Scanned when code is absent"
                }
            }
        })
    }

    fn execute(&self, params: &Value) -> ToolResult {
        let params: ScanParams = match parse_params(params) {
            Ok(params) => params,
            Err(failure) => return failure,
        };

        ToolResult::success(self.review(params.source()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suggestion_texts(data: &Value) -> Vec<String> {
        data["suggestions"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["suggestion"].as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_loop_suggestions_in_order() {
        let code = "for (uint i = 0; i < items.length; i++) { total += items[i]; }";
        let result = GasOptimizationTool::new().execute(&json!({ "code": code }));

        assert!(result.success);
        // `=` and `storage` both needed for the last check; only `=` is here
        assert_eq!(
            suggestion_texts(&result.data),
            vec![
                "Cache array length outside the loop",
                "Use ++i instead of i++ in loops"
            ]
        );
        assert_eq!(result.data["estimated_total_savings"], "2000 gas");
        assert_eq!(result.data["optimization_score"], 80);
    }

    #[test]
    fn test_public_without_external() {
        let code = "function total() public view returns (uint256) { return sum; }";
        let result = GasOptimizationTool::new().execute(&json!({ "code": code }));

        assert_eq!(result.data["suggestions"][0]["type"], "functions");
        assert_eq!(result.data["suggestions"][0]["gas_saved"], "~200 per call");
        assert_eq!(result.data["optimization_score"], 90);
    }

    #[test]
    fn test_string_memory_not_flagged() {
        let code = "function greet(string memory name) external pure {}";
        let result = GasOptimizationTool::new().execute(&json!({ "code": code }));

        assert!(result.data["suggestions"].as_array().unwrap().is_empty());
        assert_eq!(result.data["estimated_total_savings"], "0 gas");
        assert_eq!(result.data["optimization_score"], 100);
    }

    #[test]
    fn test_every_check_fires() {
        let code = "string name; public for (x.length) i++ storage = 1";
        let result = GasOptimizationTool::new().execute(&json!({ "code": code }));

        assert_eq!(result.data["suggestions"].as_array().unwrap().len(), 5);
        assert_eq!(result.data["suggestions"][4]["impact"], "high");
        assert_eq!(result.data["estimated_total_savings"], "5000 gas");
        assert_eq!(result.data["optimization_score"], 50);
    }

    #[test]
    fn test_invalid_params() {
        let result = GasOptimizationTool::new().execute(&json!({ "code": 7 }));
        assert!(!result.success);
    }
}
