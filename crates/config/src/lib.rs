//! # vmx-config
//!
//! Loads and validates the codec options used by the `vmx` CLI from config
//! files (`.toml` / `.json`), `VMX_*` environment variables, and explicit
//! overrides. This crate depends on `codec` and `shared` only.

/// Environment variable parsing and merging.
pub mod env;
/// Config loading helpers (file + env + overrides).
pub mod load;
/// Configuration schema types and helpers.
pub mod schema;

pub use schema::{
    CURRENT_CONFIG_VERSION, ConfigSchemaError, MAX_DEPTH_MAX, MAX_DEPTH_MIN, ValidatedVmxConfig,
    VmxConfig, parse_vmx_config_json, parse_vmx_config_toml,
};

pub use env::{
    ENV_DEPTH_POLICY, ENV_MAX_DEPTH, ENV_STRICT_UNMATCHED, EnvParseError, VmxEnv,
    apply_env_overrides,
};
pub use load::{
    VmxOverrides, load_vmx_config_from_path, load_vmx_config_from_sources,
    load_vmx_config_std_env, to_pretty_json, to_pretty_toml,
};

/// Returns the config crate version.
#[must_use]
pub const fn config_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;
    use vmx_codec::codec_crate_version;
    use vmx_shared::shared_crate_version;

    #[test]
    fn config_crate_compiles() {
        let version = config_crate_version();
        assert!(!version.is_empty());
    }

    #[test]
    fn config_can_use_codec_and_shared() {
        assert!(!codec_crate_version().is_empty());
        assert!(!shared_crate_version().is_empty());
    }
}
