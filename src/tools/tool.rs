//! Tool capability trait
//!
//! Tools are pure: they read their parameters and return a result envelope
//! without touching shared state.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::core::{ToolDefinition, ToolResult};

/// A named capability invocable through the registry
pub trait Tool: Send + Sync {
    /// Unique name the tool is registered under
    fn name(&self) -> &str;

    /// One-line description
    fn description(&self) -> &str;

    /// JSON Schema documenting the accepted parameters
    fn parameters(&self) -> Value;

    /// Run the tool. Failures are reported in the result, never as panics.
    fn execute(&self, params: &Value) -> ToolResult;

    /// Definition used for listings
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters(),
        }
    }
}

/// Decode a tool's typed parameters from the JSON envelope.
///
/// `null` is treated as an empty object so tools with all-optional
/// parameters accept it.
pub fn parse_params<T: DeserializeOwned>(params: &Value) -> Result<T, ToolResult> {
    let params = match params {
        Value::Null => Value::Object(Default::default()),
        other => other.clone(),
    };

    serde_json::from_value(params)
        .map_err(|e| ToolResult::failure(format!("invalid parameters: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Params {
        #[serde(default)]
        topic: Option<String>,
    }

    #[test]
    fn test_null_params_are_empty() {
        let params: Params = parse_params(&Value::Null).unwrap();
        assert!(params.topic.is_none());
    }

    #[test]
    fn test_wrong_type_is_failure_result() {
        let result = parse_params::<Params>(&json!({"topic": 42})).unwrap_err();
        assert!(!result.success);
        assert!(result.error.unwrap().starts_with("invalid parameters"));
    }
}
