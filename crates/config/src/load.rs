//! Config loading helpers (file + env + overrides).
//!
//! The loader is responsible for deterministic merge order and surfacing
//! user-facing errors as typed `ErrorEnvelope`s.

use crate::env::merge_env;
use crate::{ValidatedVmxConfig, VmxConfig, VmxEnv};
use std::path::Path;
use tracing::debug;
use vmx_codec::DepthPolicy;
use vmx_shared::{ErrorCode, ErrorEnvelope, ResultExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Json,
    Toml,
}

/// Explicit per-invocation overrides (the CLI flags).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VmxOverrides {
    /// Force strict unmatched-key reporting.
    pub strict_unmatched: Option<bool>,
    /// Replace the nesting bound.
    pub max_depth: Option<usize>,
    /// Replace the depth policy.
    pub depth_policy: Option<DepthPolicy>,
}

impl VmxOverrides {
    const fn apply(&self, config: &mut VmxConfig) {
        if let Some(strict) = self.strict_unmatched {
            config.codec.strict_unmatched = strict;
        }
        if let Some(max_depth) = self.max_depth {
            config.codec.max_depth = max_depth;
        }
        if let Some(policy) = self.depth_policy {
            config.codec.depth_policy = policy;
        }
    }
}

/// Load the config from sources using a deterministic precedence order.
///
/// Precedence (highest wins):
/// - explicit overrides (`VmxOverrides`)
/// - env overrides (`VmxEnv`)
/// - config JSON (file content)
/// - defaults (`VmxConfig::default()`)
///
/// Validation runs once, after every layer is merged.
pub fn load_vmx_config_from_sources(
    config_json: Option<&str>,
    overrides: &VmxOverrides,
    env: &VmxEnv,
) -> Result<ValidatedVmxConfig, ErrorEnvelope> {
    let config = match config_json {
        None => VmxConfig::default(),
        Some(input) => parse_config_unvalidated(input, ConfigFormat::Json)?,
    };
    finish(config, overrides, env)
}

/// Load the config from an optional file path (`.toml` or `.json`).
pub fn load_vmx_config_from_path(
    config_path: Option<&Path>,
    overrides: &VmxOverrides,
    env: &VmxEnv,
) -> Result<ValidatedVmxConfig, ErrorEnvelope> {
    let config = match config_path {
        None => VmxConfig::default(),
        Some(path) => {
            let format = detect_config_format(path)?;
            let config_text = read_config_file(path)?;
            debug!(path = %path.display(), format = ?format, "loading config file");
            parse_config_unvalidated(&config_text, format)?
        },
    };
    finish(config, overrides, env)
}

/// Load the config from std env and an optional file path.
pub fn load_vmx_config_std_env(
    config_path: Option<&Path>,
    overrides: &VmxOverrides,
) -> Result<ValidatedVmxConfig, ErrorEnvelope> {
    let env = VmxEnv::from_std_env().into_envelope()?;
    load_vmx_config_from_path(config_path, overrides, &env)
}

/// Serialize the config as deterministic pretty JSON (with trailing newline).
pub fn to_pretty_json(config: &VmxConfig) -> Result<String, ErrorEnvelope> {
    let mut output = serde_json::to_string_pretty(config).map_err(|error| {
        ErrorEnvelope::unexpected(
            ErrorCode::internal(),
            format!("failed to serialize config: {error}"),
        )
    })?;
    output.push('\n');
    Ok(output)
}

/// Serialize the config as deterministic pretty TOML (with trailing newline).
pub fn to_pretty_toml(config: &VmxConfig) -> Result<String, ErrorEnvelope> {
    let mut output = toml::to_string_pretty(config).map_err(|error| {
        ErrorEnvelope::unexpected(
            ErrorCode::new("config", "serialize_toml"),
            format!("failed to serialize config TOML: {error}"),
        )
    })?;
    output.push('\n');
    Ok(output)
}

fn finish(
    mut config: VmxConfig,
    overrides: &VmxOverrides,
    env: &VmxEnv,
) -> Result<ValidatedVmxConfig, ErrorEnvelope> {
    merge_env(&mut config, env);
    overrides.apply(&mut config);
    let validated = config.validate().map_err(ErrorEnvelope::from)?;
    debug!(options = ?validated.codec_options(), "effective codec options");
    Ok(validated)
}

fn parse_config_unvalidated(input: &str, format: ConfigFormat) -> Result<VmxConfig, ErrorEnvelope> {
    match format {
        ConfigFormat::Json => serde_json::from_str(input).map_err(|error| {
            ErrorEnvelope::expected(
                ErrorCode::new("config", "invalid_json"),
                format!("invalid config JSON: {error}"),
            )
            .with_metadata("source", "config")
        }),
        ConfigFormat::Toml => toml::from_str(input).map_err(|error| {
            ErrorEnvelope::expected(
                ErrorCode::new("config", "invalid_toml"),
                format!("invalid config TOML: {error}"),
            )
            .with_metadata("source", "config")
        }),
    }
}

fn read_config_file(path: &Path) -> Result<String, ErrorEnvelope> {
    std::fs::read_to_string(path).map_err(|error| {
        let code = match error.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::new("config", "config_file_not_found"),
            std::io::ErrorKind::PermissionDenied => {
                ErrorCode::new("config", "config_file_permission_denied")
            },
            _ => ErrorCode::new("config", "config_file_io"),
        };

        ErrorEnvelope::expected(code, format!("failed to read config file: {error}"))
            .with_metadata("path", path.to_string_lossy().to_string())
    })
}

fn detect_config_format(path: &Path) -> Result<ConfigFormat, ErrorEnvelope> {
    let ext = path
        .extension()
        .and_then(|value| value.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        None | Some("json") => Ok(ConfigFormat::Json),
        Some("toml") => Ok(ConfigFormat::Toml),
        Some(other) => Err(ErrorEnvelope::expected(
            ErrorCode::new("config", "unsupported_format"),
            "unsupported config format; use .json or .toml",
        )
        .with_metadata("extension", other.to_string())),
    }
}
