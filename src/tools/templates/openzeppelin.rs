//! OpenZeppelin contract templates
//!
//! Resolves a token standard plus optional extensions into the import list
//! and a starting template.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::core::ToolResult;
use crate::tools::tool::{parse_params, Tool};

/// A supported token standard
#[derive(Debug, Clone, Copy)]
pub struct ContractKind {
    /// Standard name (ERC20, ERC721, ERC1155)
    pub name: &'static str,
    /// Extensions that have an OpenZeppelin module
    pub features: &'static [&'static str],
    /// Starting template
    pub template: &'static str,
}

impl ContractKind {
    /// Import path of the base contract
    pub fn base_import(&self) -> String {
        format!(
            "import \"@openzeppelin/contracts/token/{0}/{0}.sol\";",
            self.name
        )
    }

    /// Import path of one extension
    pub fn extension_import(&self, feature: &str) -> String {
        format!(
            "import \"@openzeppelin/contracts/token/{0}/extensions/{0}{1}.sol\";",
            self.name, feature
        )
    }

    pub fn documentation(&self) -> String {
        format!(
            "https://docs.openzeppelin.com/contracts/4.x/api/token/{}",
            self.name.to_ascii_lowercase()
        )
    }

    pub fn supports(&self, feature: &str) -> bool {
        self.features.iter().any(|known| *known == feature)
    }
}

pub const CONTRACT_KINDS: &[ContractKind] = &[
    ContractKind {
        name: "ERC20",
        features: &["Mintable", "Burnable", "Pausable", "Snapshot", "Permit"],
        template: r#"pragma solidity ^0.8.0;

import "{base}";
{imports}

contract {name} is ERC20{features} {
    constructor() ERC20("{token_name}", "{symbol}") {
        {constructor_body}
    }

    {functions}
}"#,
    },
    ContractKind {
        name: "ERC721",
        features: &["Enumerable", "URIStorage", "Burnable", "Pausable"],
        template: r#"pragma solidity ^0.8.0;

import "{base}";
{imports}

contract {name} is ERC721{features} {
    constructor() ERC721("{token_name}", "{symbol}") {
        {constructor_body}
    }

    {functions}
}"#,
    },
    ContractKind {
        name: "ERC1155",
        features: &["Supply", "Burnable", "Pausable", "URIStorage"],
        template: r#"pragma solidity ^0.8.0;

import "{base}";
{imports}

contract {name} is ERC1155{features} {
    constructor() ERC1155("{uri}") {
        {constructor_body}
    }

    {functions}
}"#,
    },
];

/// Standard used when nothing names one
pub const DEFAULT_CONTRACT_KIND: &str = "ERC20";

/// Look up a standard by exact name
pub fn find_kind(name: &str) -> Option<&'static ContractKind> {
    CONTRACT_KINDS.iter().find(|kind| kind.name == name)
}

/// The standard mentioned earliest in free text, ignoring case
pub fn kind_in_text(text: &str) -> Option<&'static ContractKind> {
    let text = text.to_ascii_uppercase();
    CONTRACT_KINDS
        .iter()
        .filter_map(|kind| text.find(kind.name).map(|pos| (pos, kind)))
        .min_by_key(|(pos, _)| *pos)
        .map(|(_, kind)| kind)
}

#[derive(Debug, Deserialize)]
struct TemplateParams {
    #[serde(default)]
    contract_type: Option<String>,
    #[serde(default)]
    features: Vec<String>,
    #[serde(default)]
    query: Option<String>,
}

/// Template lookup for audited OpenZeppelin base contracts
#[derive(Debug, Clone, Default)]
pub struct OpenZeppelinTool;

impl OpenZeppelinTool {
    pub fn new() -> Self {
        Self
    }

    /// Build the template data for a standard and a requested feature list.
    /// Unsupported features are dropped.
    pub fn resolve(&self, kind: &ContractKind, features: &[String]) -> Value {
        let accepted: Vec<&str> = features
            .iter()
            .map(String::as_str)
            .filter(|feature| kind.supports(feature))
            .collect();

        let mut imports = vec![kind.base_import()];
        imports.extend(accepted.iter().map(|feature| kind.extension_import(feature)));

        json!({
            "contract_type": kind.name,
            "imports": imports,
            "features": accepted,
            "template": kind.template,
            "documentation": kind.documentation(),
        })
    }
}

impl Tool for OpenZeppelinTool {
    fn name(&self) -> &str {
        "openzeppelin_contracts"
    }

    fn description(&self) -> &str {
        "Access secure, audited smart contract templates from OpenZeppelin"
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "contract_type": {
                    "type": "string",
                    "enum": ["ERC20", "ERC721", "ERC1155"],
                    "description": "Token standard (default: inferred from query, else ERC20)"
                },
                "features": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Extensions to import (Mintable, Burnable, Pausable, ...)"
                },
                "query": {
                    "type": "string",
                    "description": "Free-text request used to infer the standard"
                }
            }
        })
    }

    fn execute(&self, params: &Value) -> ToolResult {
        let params: TemplateParams = match parse_params(params) {
            Ok(params) => params,
            Err(failure) => return failure,
        };

        let requested = params
            .contract_type
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty());

        let kind = match requested {
            Some(name) => find_kind(name),
            None => params
                .query
                .as_deref()
                .and_then(kind_in_text)
                .or_else(|| find_kind(DEFAULT_CONTRACT_KIND)),
        };

        match kind {
            Some(kind) => ToolResult::success(self.resolve(kind, &params.features)),
            None => ToolResult::failure(format!(
                "unknown contract type: {}",
                params.contract_type.unwrap_or_default()
            )),
        }
    }
}
