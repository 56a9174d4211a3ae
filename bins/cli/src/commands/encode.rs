//! Encode command handler.

use super::read_input;
use crate::CliOutput;
use crate::error::{CliError, ExitCode};
use crate::format::{OutputMode, to_pretty_json_line};
use crate::model::VirtualMachine;
use std::path::Path;
use vmx_codec::{CodecOptions, Encoder, text};
use vmx_shared::{ErrorCode, ErrorEnvelope};

/// Read the built-in model from JSON and print it as VMX text.
pub fn run_encode(
    mode: OutputMode,
    path: &Path,
    options: &CodecOptions,
) -> Result<CliOutput, CliError> {
    let bytes = read_input(path)?;
    let vm: VirtualMachine = serde_json::from_slice(&bytes).map_err(|error| {
        ErrorEnvelope::expected(
            ErrorCode::new("cli", "invalid_model_json"),
            format!("invalid virtual machine JSON: {error}"),
        )
        .with_metadata("line", error.line().to_string())
    })?;
    let pairs = Encoder::new(options.clone()).encode_pairs(&vm)?;

    let stdout = if mode.is_json() {
        to_pretty_json_line(&serde_json::json!({
            "status": "ok",
            "count": pairs.len(),
            "pairs": pairs,
        }))?
    } else {
        text::write_pairs(&pairs)
    };

    Ok(CliOutput {
        stdout,
        stderr: String::new(),
        exit_code: ExitCode::Ok,
    })
}
