//! Response extraction
//!
//! Splits raw model output into code and surrounding prose.

use regex::Regex;
use std::sync::OnceLock;

/// Code and prose pulled out of a raw response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Interior of the first fenced block, or the whole text
    pub code: String,
    /// Everything except the first fenced block, trimmed
    pub explanation: Option<String>,
    /// Tag on the opening fence, if any
    pub language_hint: Option<String>,
}

fn fence_regex() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        Regex::new(r"```([\w+#.-]*)[ \t]*\r?\n([\s\S]*?)\r?\n```")
            .expect("fence pattern is valid")
    })
}

/// Extract the first fenced code block from `raw`.
///
/// Only the first block becomes `code`. Any later blocks stay verbatim in
/// the explanation.
pub fn extract(raw: &str) -> Extraction {
    let Some((block, captures)) = fence_regex()
        .captures(raw)
        .and_then(|caps| caps.get(0).map(|m| (m.range(), caps)))
    else {
        return Extraction {
            code: raw.to_string(),
            explanation: None,
            language_hint: None,
        };
    };

    let code = captures.get(2).map_or("", |m| m.as_str()).to_string();
    let language_hint = captures
        .get(1)
        .map(|m| m.as_str())
        .filter(|hint| !hint.is_empty())
        .map(str::to_string);

    let remainder = format!("{}{}", &raw[..block.start], &raw[block.end..]);
    let remainder = remainder.trim();

    Extraction {
        code,
        explanation: (!remainder.is_empty()).then(|| remainder.to_string()),
        language_hint,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_fences() {
        let extraction = extract("no fences here");
        assert_eq!(extraction.code, "no fences here");
        assert_eq!(extraction.explanation, None);
        assert_eq!(extraction.language_hint, None);
    }

    #[test]
    fn test_block_with_trailing_prose() {
        let extraction = extract("```js\nconst a=1;\n```\nThis sets a.");
        assert_eq!(extraction.code, "const a=1;");
        assert_eq!(extraction.explanation.as_deref(), Some("This sets a."));
        assert_eq!(extraction.language_hint.as_deref(), Some("js"));
    }

    #[test]
    fn test_block_only() {
        let extraction = extract("```\nfn main() {}\n```\n");
        assert_eq!(extraction.code, "fn main() {}");
        assert_eq!(extraction.explanation, None);
        assert_eq!(extraction.language_hint, None);
    }

    #[test]
    fn test_only_first_block_extracted() {
        let raw = "Here is the token:\n```solidity\ncontract A {}\n```\nAnd a test:\n```js\nit('works');\n```";
        let extraction = extract(raw);

        assert_eq!(extraction.code, "contract A {}");
        let explanation = extraction.explanation.unwrap();
        assert!(explanation.starts_with("Here is the token:"));
        assert!(explanation.contains("And a test:"));
        assert!(explanation.contains("```js\nit('works');\n```"));
        assert!(!explanation.contains("contract A {}"));
    }

    #[test]
    fn test_multiline_interior_kept_intact() {
        let raw = "```solidity\npragma solidity ^0.8.0;\n\ncontract A {\n}\n```";
        assert_eq!(extract(raw).code, "pragma solidity ^0.8.0;\n\ncontract A {\n}");
    }

    #[test]
    fn test_unclosed_fence_falls_back() {
        let raw = "```rust\nfn main() {}";
        let extraction = extract(raw);
        assert_eq!(extraction.code, raw);
        assert_eq!(extraction.explanation, None);
    }
}
