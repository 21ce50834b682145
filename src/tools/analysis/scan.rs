//! Substring-based pattern scanning
//!
//! Heuristic only: each check fires on keyword presence/absence in the raw
//! source text. There is no parsing, so the trigger strings and their order
//! are the whole contract.

use serde::Deserialize;

/// Keyword condition for one check
#[derive(Debug, Clone, Copy)]
pub struct Trigger {
    /// Every one of these must be present
    all: &'static [&'static str],
    /// At least one of these must be present (ignored when empty)
    any: &'static [&'static str],
    /// None of these may be present
    none: &'static [&'static str],
}

impl Trigger {
    /// Fires when any of `needles` is present
    pub const fn any_of(needles: &'static [&'static str]) -> Self {
        Self {
            all: &[],
            any: needles,
            none: &[],
        }
    }

    /// Fires when all of `needles` are present
    pub const fn all_of(needles: &'static [&'static str]) -> Self {
        Self {
            all: needles,
            any: &[],
            none: &[],
        }
    }

    /// Additionally require that none of `needles` is present
    pub const fn unless(self, needles: &'static [&'static str]) -> Self {
        Self {
            none: needles,
            ..self
        }
    }

    /// Evaluate against source text
    pub fn matches(&self, code: &str) -> bool {
        self.all.iter().all(|needle| code.contains(needle))
            && (self.any.is_empty() || self.any.iter().any(|needle| code.contains(needle)))
            && !self.none.iter().any(|needle| code.contains(needle))
    }
}

/// One heuristic check
#[derive(Debug, Clone, Copy)]
pub struct Check {
    /// Finding category (reentrancy, loops, ...)
    pub kind: &'static str,
    /// Severity or impact label
    pub level: &'static str,
    /// Human-readable message
    pub message: &'static str,
    /// Follow-up advice (mitigation, expected saving)
    pub advice: &'static str,
    /// When the check fires
    pub trigger: Trigger,
}

/// An ordered list of checks with a per-finding score penalty
#[derive(Debug, Clone, Copy)]
pub struct PatternScan {
    checks: &'static [Check],
    penalty: u32,
}

impl PatternScan {
    pub const fn new(checks: &'static [Check], penalty: u32) -> Self {
        Self { checks, penalty }
    }

    /// Points deducted per finding
    pub fn penalty(&self) -> u32 {
        self.penalty
    }

    /// Checks that fire, in definition order
    pub fn scan(&self, code: &str) -> Vec<&'static Check> {
        self.checks
            .iter()
            .filter(|check| check.trigger.matches(code))
            .collect()
    }

    /// `max(0, 100 - penalty * findings)`
    pub fn score(&self, findings: usize) -> u32 {
        let deducted = u32::try_from(findings)
            .unwrap_or(u32::MAX)
            .saturating_mul(self.penalty);
        100u32.saturating_sub(deducted)
    }
}

/// Parameters shared by the scanning tools
#[derive(Debug, Deserialize)]
pub struct ScanParams {
    /// Source to scan
    #[serde(default)]
    pub code: Option<String>,
    /// Free-text request; scanned when `code` is absent
    #[serde(default)]
    pub query: Option<String>,
    /// Source language
    #[serde(default)]
    pub language: Option<String>,
}

impl ScanParams {
    /// Text to scan: `code`, else `query`, else empty
    pub fn source(&self) -> &str {
        self.code
            .as_deref()
            .or(self.query.as_deref())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHECKS: &[Check] = &[
        Check {
            kind: "second_in_text",
            level: "low",
            message: "beta",
            advice: "",
            trigger: Trigger::all_of(&["beta"]),
        },
        Check {
            kind: "first_in_text",
            level: "high",
            message: "alpha",
            advice: "",
            trigger: Trigger::all_of(&["alpha", "gamma"]).unless(&["delta"]),
        },
    ];

    const SCAN: PatternScan = PatternScan::new(CHECKS, 40);

    #[test]
    fn test_findings_follow_definition_order() {
        let kinds: Vec<_> = SCAN
            .scan("alpha gamma beta")
            .iter()
            .map(|c| c.kind)
            .collect();
        assert_eq!(kinds, vec!["second_in_text", "first_in_text"]);
    }

    #[test]
    fn test_absence_condition() {
        assert!(SCAN.scan("alpha gamma delta").is_empty());
    }

    #[test]
    fn test_any_of() {
        let trigger = Trigger::any_of(&["x", "y"]);
        assert!(trigger.matches("only y"));
        assert!(!trigger.matches("neither"));
    }

    #[test]
    fn test_score_floors_at_zero() {
        assert_eq!(SCAN.score(0), 100);
        assert_eq!(SCAN.score(2), 20);
        assert_eq!(SCAN.score(3), 0);
    }

    #[test]
    fn test_code_preferred_over_query() {
        let params = ScanParams {
            code: Some("code".into()),
            query: Some("query".into()),
            language: None,
        };
        assert_eq!(params.source(), "code");
    }
}
