//! Environment variable parsing and env-to-config merging.
//!
//! Parsing is strict: a variable that is set must carry a valid value.

use crate::schema::{ValidatedVmxConfig, VmxConfig};
use std::collections::BTreeMap;
use std::fmt;
use vmx_codec::DepthPolicy;
use vmx_shared::{ErrorCode, ErrorEnvelope};

/// Env var: report scalar fields with no source key.
pub const ENV_STRICT_UNMATCHED: &str = "VMX_STRICT_UNMATCHED";
/// Env var: nesting bound.
pub const ENV_MAX_DEPTH: &str = "VMX_MAX_DEPTH";
/// Env var: behavior past the nesting bound (`truncate` or `error`).
pub const ENV_DEPTH_POLICY: &str = "VMX_DEPTH_POLICY";

/// Overrides read from the environment; `None` leaves the config value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VmxEnv {
    /// `VMX_STRICT_UNMATCHED`.
    pub strict_unmatched: Option<bool>,
    /// `VMX_MAX_DEPTH`.
    pub max_depth: Option<usize>,
    /// `VMX_DEPTH_POLICY`.
    pub depth_policy: Option<DepthPolicy>,
}

impl VmxEnv {
    /// Parse env overrides from a key/value map (useful for tests and fixtures).
    pub fn from_map(map: &BTreeMap<String, String>) -> Result<Self, EnvParseError> {
        Ok(Self {
            strict_unmatched: parse_optional_bool(map, ENV_STRICT_UNMATCHED)?,
            max_depth: parse_optional_usize(map, ENV_MAX_DEPTH)?,
            depth_policy: parse_optional_depth_policy(map, ENV_DEPTH_POLICY)?,
        })
    }

    /// Parse env overrides from the current process environment.
    pub fn from_std_env() -> Result<Self, EnvParseError> {
        let mut map = BTreeMap::new();
        for name in [ENV_STRICT_UNMATCHED, ENV_MAX_DEPTH, ENV_DEPTH_POLICY] {
            if let Ok(value) = std::env::var(name) {
                map.insert(name.to_owned(), value);
            }
        }
        Self::from_map(&map)
    }

    /// True when no variable was set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.strict_unmatched.is_none() && self.max_depth.is_none() && self.depth_policy.is_none()
    }
}

/// Apply env overrides on top of `config`, then validate the result.
pub fn apply_env_overrides(
    mut config: VmxConfig,
    env: &VmxEnv,
) -> Result<ValidatedVmxConfig, ErrorEnvelope> {
    merge_env(&mut config, env);
    config.validate().map_err(ErrorEnvelope::from)
}

pub(crate) const fn merge_env(config: &mut VmxConfig, env: &VmxEnv) {
    if let Some(strict) = env.strict_unmatched {
        config.codec.strict_unmatched = strict;
    }
    if let Some(max_depth) = env.max_depth {
        config.codec.max_depth = max_depth;
    }
    if let Some(policy) = env.depth_policy {
        config.codec.depth_policy = policy;
    }
}

/// Validation failures when parsing env variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvParseError {
    /// An env var was present but empty after trimming.
    EmptyValue {
        /// Env var name.
        var: &'static str,
    },
    /// Boolean env var had an invalid value.
    InvalidBool {
        /// Env var name.
        var: &'static str,
        /// Raw input value.
        value: String,
    },
    /// Integer env var had an invalid value.
    InvalidInt {
        /// Env var name.
        var: &'static str,
        /// Raw input value.
        value: String,
    },
    /// Enum env var had an invalid value.
    InvalidEnum {
        /// Env var name.
        var: &'static str,
        /// Raw input value.
        value: String,
    },
}

impl EnvParseError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::EmptyValue { .. } => ErrorCode::new("config", "empty_env_var"),
            Self::InvalidBool { .. } => ErrorCode::new("config", "invalid_env_bool"),
            Self::InvalidInt { .. } => ErrorCode::new("config", "invalid_env_int"),
            Self::InvalidEnum { .. } => ErrorCode::new("config", "invalid_env_enum"),
        }
    }
}

impl fmt::Display for EnvParseError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyValue { var } => write!(formatter, "{var} must be non-empty"),
            Self::InvalidBool { var, .. } => write!(formatter, "{var} must be a boolean"),
            Self::InvalidInt { var, .. } => write!(formatter, "{var} must be an integer"),
            Self::InvalidEnum { var, .. } => write!(formatter, "{var} has an unsupported value"),
        }
    }
}

impl std::error::Error for EnvParseError {}

impl From<EnvParseError> for ErrorEnvelope {
    fn from(error: EnvParseError) -> Self {
        let code = error.error_code();
        let message = error.to_string();
        let envelope = Self::expected(code, message);

        match error {
            EnvParseError::EmptyValue { var } => envelope.with_metadata("env_var", var),
            EnvParseError::InvalidBool { var, value }
            | EnvParseError::InvalidInt { var, value }
            | EnvParseError::InvalidEnum { var, value } => envelope
                .with_metadata("env_var", var)
                .with_metadata("value", value),
        }
    }
}

fn non_empty<'a>(
    map: &'a BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<&'a str>, EnvParseError> {
    let Some(raw) = map.get(var) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EnvParseError::EmptyValue { var });
    }
    Ok(Some(trimmed))
}

fn parse_optional_bool(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<bool>, EnvParseError> {
    let Some(trimmed) = non_empty(map, var)? else {
        return Ok(None);
    };

    match trimmed.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(Some(true)),
        "false" | "0" | "no" | "off" => Ok(Some(false)),
        _ => Err(EnvParseError::InvalidBool {
            var,
            value: trimmed.to_owned(),
        }),
    }
}

fn parse_optional_usize(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<usize>, EnvParseError> {
    let Some(trimmed) = non_empty(map, var)? else {
        return Ok(None);
    };

    trimmed
        .parse::<usize>()
        .map(Some)
        .map_err(|_| EnvParseError::InvalidInt {
            var,
            value: trimmed.to_owned(),
        })
}

fn parse_optional_depth_policy(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<DepthPolicy>, EnvParseError> {
    let Some(trimmed) = non_empty(map, var)? else {
        return Ok(None);
    };

    trimmed
        .parse::<DepthPolicy>()
        .map(Some)
        .map_err(|_| EnvParseError::InvalidEnum {
            var,
            value: trimmed.to_owned(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    fn map(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect()
    }

    #[test]
    fn empty_map_changes_nothing() -> Result<(), Box<dyn Error>> {
        let env = VmxEnv::from_map(&BTreeMap::new())?;
        assert!(env.is_empty());
        let config = apply_env_overrides(VmxConfig::default(), &env)?;
        assert_eq!(config.into_inner(), VmxConfig::default());
        Ok(())
    }

    #[test]
    fn parses_every_variable() -> Result<(), EnvParseError> {
        let env = VmxEnv::from_map(&map(&[
            (ENV_STRICT_UNMATCHED, " yes "),
            (ENV_MAX_DEPTH, "9"),
            (ENV_DEPTH_POLICY, "Error"),
        ]))?;
        assert_eq!(
            env,
            VmxEnv {
                strict_unmatched: Some(true),
                max_depth: Some(9),
                depth_policy: Some(DepthPolicy::Error),
            }
        );
        Ok(())
    }

    #[test]
    fn rejects_blank_and_garbage() {
        assert_eq!(
            VmxEnv::from_map(&map(&[(ENV_MAX_DEPTH, "  ")])).err(),
            Some(EnvParseError::EmptyValue { var: ENV_MAX_DEPTH })
        );
        assert!(matches!(
            VmxEnv::from_map(&map(&[(ENV_STRICT_UNMATCHED, "maybe")])),
            Err(EnvParseError::InvalidBool { .. })
        ));
        assert!(matches!(
            VmxEnv::from_map(&map(&[(ENV_MAX_DEPTH, "-1")])),
            Err(EnvParseError::InvalidInt { .. })
        ));
        assert!(matches!(
            VmxEnv::from_map(&map(&[(ENV_DEPTH_POLICY, "skip")])),
            Err(EnvParseError::InvalidEnum { .. })
        ));
    }

    #[test]
    fn env_depth_is_still_validated() -> Result<(), Box<dyn Error>> {
        let env = VmxEnv::from_map(&map(&[(ENV_MAX_DEPTH, "64")]))?;
        let error = apply_env_overrides(VmxConfig::default(), &env).err();
        assert_eq!(
            error.map(|error| error.code),
            Some(ErrorCode::new("config", "limit_out_of_range"))
        );
        Ok(())
    }

    #[test]
    fn envelope_names_the_variable() {
        let envelope = ErrorEnvelope::from(EnvParseError::InvalidEnum {
            var: ENV_DEPTH_POLICY,
            value: "skip".to_owned(),
        });
        assert_eq!(envelope.code, ErrorCode::new("config", "invalid_env_enum"));
        assert_eq!(
            envelope.metadata.get("env_var").map(String::as_str),
            Some(ENV_DEPTH_POLICY)
        );
    }
}
