//! Config file schema, defaults, and validation.
//!
//! A config file carries a schema version and a `codec` section whose keys
//! mirror `CodecOptions`:
//!
//! ```toml
//! version = 1
//!
//! [codec]
//! strictUnmatched = true
//! maxDepth = 8
//! depthPolicy = "error"
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use vmx_codec::CodecOptions;
use vmx_shared::{ErrorCode, ErrorEnvelope};

/// Current supported configuration schema version.
pub const CURRENT_CONFIG_VERSION: u32 = 1;

/// Smallest accepted `maxDepth`.
pub const MAX_DEPTH_MIN: usize = 1;
/// Largest accepted `maxDepth`.
pub const MAX_DEPTH_MAX: usize = 32;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct VmxConfig {
    /// Schema version for forward-compatible migrations.
    pub version: u32,
    /// Codec walk options.
    pub codec: CodecOptions,
}

impl Default for VmxConfig {
    fn default() -> Self {
        Self {
            version: CURRENT_CONFIG_VERSION,
            codec: CodecOptions::default(),
        }
    }
}

impl VmxConfig {
    /// Validate the config.
    pub fn validate(self) -> Result<ValidatedVmxConfig, ConfigSchemaError> {
        if self.version != CURRENT_CONFIG_VERSION {
            return Err(ConfigSchemaError::UnsupportedVersion {
                found: self.version,
                supported: CURRENT_CONFIG_VERSION,
            });
        }

        let max_depth = self.codec.max_depth;
        if !(MAX_DEPTH_MIN..=MAX_DEPTH_MAX).contains(&max_depth) {
            return Err(ConfigSchemaError::LimitOutOfRange {
                section: "codec",
                field: "maxDepth",
                value: max_depth,
                min: MAX_DEPTH_MIN,
                max: MAX_DEPTH_MAX,
            });
        }

        Ok(ValidatedVmxConfig { raw: self })
    }
}

/// Config that passed [`VmxConfig::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedVmxConfig {
    raw: VmxConfig,
}

impl ValidatedVmxConfig {
    /// Codec options ready to hand to a decoder or encoder.
    #[must_use]
    pub const fn codec_options(&self) -> &CodecOptions {
        &self.raw.codec
    }

    /// Consume the wrapper and return the raw config.
    #[must_use]
    pub fn into_inner(self) -> VmxConfig {
        self.raw
    }
}

impl AsRef<VmxConfig> for ValidatedVmxConfig {
    fn as_ref(&self) -> &VmxConfig {
        &self.raw
    }
}

impl std::ops::Deref for ValidatedVmxConfig {
    type Target = VmxConfig;

    fn deref(&self) -> &Self::Target {
        &self.raw
    }
}

/// Validation failures for a parsed config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSchemaError {
    /// The config version is not supported by this binary.
    UnsupportedVersion {
        /// Version found in the config.
        found: u32,
        /// Version supported by this crate.
        supported: u32,
    },
    /// A numeric limit is out of bounds.
    LimitOutOfRange {
        /// Schema section (e.g. `codec`).
        section: &'static str,
        /// Field name in the config file (e.g. `maxDepth`).
        field: &'static str,
        /// Value provided.
        value: usize,
        /// Minimum allowed value.
        min: usize,
        /// Maximum allowed value.
        max: usize,
    },
}

impl ConfigSchemaError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::UnsupportedVersion { .. } => ErrorCode::new("config", "unsupported_version"),
            Self::LimitOutOfRange { .. } => ErrorCode::new("config", "limit_out_of_range"),
        }
    }
}

impl fmt::Display for ConfigSchemaError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedVersion { found, supported } => write!(
                formatter,
                "unsupported config version {found} (supported: {supported})"
            ),
            Self::LimitOutOfRange {
                section,
                field,
                value,
                min,
                max,
            } => write!(
                formatter,
                "{section}.{field} must be between {min} and {max} (got {value})"
            ),
        }
    }
}

impl std::error::Error for ConfigSchemaError {}

impl From<ConfigSchemaError> for ErrorEnvelope {
    fn from(error: ConfigSchemaError) -> Self {
        let code = error.error_code();
        let message = error.to_string();
        let envelope = Self::expected(code, message);

        match error {
            ConfigSchemaError::UnsupportedVersion { found, supported } => envelope
                .with_metadata("found", found.to_string())
                .with_metadata("supported", supported.to_string()),
            ConfigSchemaError::LimitOutOfRange {
                section,
                field,
                value,
                min,
                max,
            } => envelope
                .with_metadata("section", section)
                .with_metadata("field", field)
                .with_metadata("value", value.to_string())
                .with_metadata("min", min.to_string())
                .with_metadata("max", max.to_string()),
        }
    }
}

/// Parse and validate a JSON config.
pub fn parse_vmx_config_json(input: &str) -> Result<ValidatedVmxConfig, ErrorEnvelope> {
    let config: VmxConfig = serde_json::from_str(input).map_err(|error| {
        ErrorEnvelope::expected(
            ErrorCode::new("config", "invalid_json"),
            format!("invalid config JSON: {error}"),
        )
    })?;
    config.validate().map_err(ErrorEnvelope::from)
}

/// Parse and validate a TOML config.
pub fn parse_vmx_config_toml(input: &str) -> Result<ValidatedVmxConfig, ErrorEnvelope> {
    let config: VmxConfig = toml::from_str(input).map_err(|error| {
        ErrorEnvelope::expected(
            ErrorCode::new("config", "invalid_toml"),
            format!("invalid config TOML: {error}"),
        )
    })?;
    config.validate().map_err(ErrorEnvelope::from)
}
