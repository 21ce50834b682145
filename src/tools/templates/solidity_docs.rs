//! Solidity documentation lookup

use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::core::ToolResult;
use crate::tools::tool::{parse_params, Tool};

/// Topic -> (subtopic, summary)
const TOPICS: &[(&str, &[(&str, &str)])] = &[
    (
        "basics",
        &[
            ("variables", "State variables, local variables, and global variables"),
            ("functions", "Function modifiers, visibility, and state mutability"),
            ("events", "Event declaration and emission"),
            ("errors", "Custom errors and revert statements"),
        ],
    ),
    (
        "advanced",
        &[
            ("assembly", "Inline assembly and Yul"),
            ("storage", "Storage layout and optimization"),
            ("security", "Common vulnerabilities and mitigations"),
            ("patterns", "Design patterns and best practices"),
        ],
    ),
];

const VARIABLES_EXAMPLE: &str = r#"uint256 public totalSupply;  // State variable
function transfer(address to, uint256 amount) public {
    uint256 balance = balances[msg.sender];  // Local variable
    require(balance >= amount, "Insufficient balance");
    // msg.sender is a global variable
}
"#;

const FUNCTIONS_EXAMPLE: &str = r#"modifier onlyOwner() {
    require(msg.sender == owner, "Not the owner");
    _;
}

function mint(address to, uint256 amount) public onlyOwner {
    _mint(to, amount);
}
"#;

pub const REFERENCES: &[&str] = &[
    "https://docs.soliditylang.org/",
    "https://ethereum.org/en/developers/docs/smart-contracts/",
];

fn example_for(topic: &str, subtopic: Option<&str>) -> Option<&'static str> {
    match (topic, subtopic?) {
        ("basics", "variables") => Some(VARIABLES_EXAMPLE),
        ("basics", "functions") => Some(FUNCTIONS_EXAMPLE),
        _ => None,
    }
}

fn default_topic() -> String {
    "basics".to_string()
}

#[derive(Debug, Deserialize)]
struct DocsParams {
    #[serde(default = "default_topic")]
    topic: String,
    #[serde(default)]
    subtopic: Option<String>,
}

/// Canned Solidity language notes and examples
#[derive(Debug, Clone, Default)]
pub struct SolidityDocsTool;

impl SolidityDocsTool {
    pub fn new() -> Self {
        Self
    }

    /// Known topic names
    pub fn topics(&self) -> Vec<&'static str> {
        TOPICS.iter().map(|(name, _)| *name).collect()
    }
}

impl Tool for SolidityDocsTool {
    fn name(&self) -> &str {
        "solidity_docs"
    }

    fn description(&self) -> &str {
        "Access Solidity language documentation and best practices"
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "topic": {
                    "type": "string",
                    "enum": self.topics(),
                    "description": "Documentation topic (default: basics)"
                },
                "subtopic": {
                    "type": "string",
                    "description": "Entry within the topic, selects a code example"
                }
            }
        })
    }

    fn execute(&self, params: &Value) -> ToolResult {
        let params: DocsParams = match parse_params(params) {
            Ok(params) => params,
            Err(failure) => return failure,
        };

        let Some((_, entries)) = TOPICS.iter().find(|(name, _)| *name == params.topic) else {
            return ToolResult::failure(format!("unknown topic: {}", params.topic));
        };

        let content: Map<String, Value> = entries
            .iter()
            .map(|(subtopic, summary)| (subtopic.to_string(), json!(summary)))
            .collect();

        ToolResult::success(json!({
            "topic": params.topic,
            "content": content,
            "example": example_for(&params.topic, params.subtopic.as_deref()),
            "references": REFERENCES,
        }))
    }
}
