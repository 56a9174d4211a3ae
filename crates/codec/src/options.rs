//! Walk options.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default nesting bound.
pub const DEFAULT_MAX_DEPTH: usize = 5;

/// What to do when nesting passes `max_depth`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepthPolicy {
    /// Stop descending and leave deeper fields at their zero value.
    #[default]
    Truncate,
    /// Fail the walk with `Error::DepthExceeded`.
    Error,
}

impl DepthPolicy {
    /// Lowercase name as used in config files and env vars.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Truncate => "truncate",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for DepthPolicy {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Unknown depth policy name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown depth policy `{0}` (expected `truncate` or `error`)")]
pub struct ParseDepthPolicyError(pub String);

impl FromStr for DepthPolicy {
    type Err = ParseDepthPolicyError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "truncate" => Ok(Self::Truncate),
            "error" => Ok(Self::Error),
            _ => Err(ParseDepthPolicyError(raw.to_owned())),
        }
    }
}

/// Options shared by decode and encode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct CodecOptions {
    /// Report scalar fields with no source key as `UnmatchedKey`.
    pub strict_unmatched: bool,
    /// Nesting bound for records and sequence elements.
    pub max_depth: usize,
    /// Behavior past `max_depth`.
    pub depth_policy: DepthPolicy,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            strict_unmatched: false,
            max_depth: DEFAULT_MAX_DEPTH,
            depth_policy: DepthPolicy::Truncate,
        }
    }
}

impl CodecOptions {
    /// Options with strict unmatched-key reporting switched on or off.
    #[must_use]
    pub const fn with_strict_unmatched(mut self, strict: bool) -> Self {
        self.strict_unmatched = strict;
        self
    }

    /// Options with a different nesting bound.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Options with a different depth policy.
    #[must_use]
    pub const fn with_depth_policy(mut self, policy: DepthPolicy) -> Self {
        self.depth_policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn defaults_are_lenient() {
        let options = CodecOptions::default();
        assert!(!options.strict_unmatched);
        assert_eq!(options.max_depth, 5);
        assert_eq!(options.depth_policy, DepthPolicy::Truncate);
    }

    #[test]
    fn deserializes_camel_case_with_defaults() -> Result<(), Box<dyn Error>> {
        let options: CodecOptions =
            serde_json::from_str(r#"{"strictUnmatched": true, "depthPolicy": "error"}"#)?;
        assert!(options.strict_unmatched);
        assert_eq!(options.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(options.depth_policy, DepthPolicy::Error);
        Ok(())
    }

    #[test]
    fn rejects_unknown_fields() {
        let parsed = serde_json::from_str::<CodecOptions>(r#"{"maxDepht": 3}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn depth_policy_parses_any_case() -> Result<(), ParseDepthPolicyError> {
        assert_eq!("Truncate".parse::<DepthPolicy>()?, DepthPolicy::Truncate);
        assert_eq!(" ERROR ".parse::<DepthPolicy>()?, DepthPolicy::Error);
        assert!("skip".parse::<DepthPolicy>().is_err());
        Ok(())
    }

    #[test]
    fn builders_chain() {
        let options = CodecOptions::default()
            .with_strict_unmatched(true)
            .with_max_depth(8)
            .with_depth_policy(DepthPolicy::Error);
        assert!(options.strict_unmatched);
        assert_eq!(options.max_depth, 8);
        assert_eq!(options.depth_policy.to_string(), "error");
    }
}
