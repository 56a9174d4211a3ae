//! Decode command handler.

use super::read_input;
use crate::CliOutput;
use crate::error::{CliError, ExitCode};
use crate::format::{OutputMode, to_pretty_json_line};
use crate::model::VirtualMachine;
use std::path::Path;
use vmx_codec::{CodecOptions, Decoder, text};

/// Decode a `.vmx` file into the built-in model and print it as JSON.
pub fn run_decode(
    mode: OutputMode,
    path: &Path,
    options: &CodecOptions,
) -> Result<CliOutput, CliError> {
    let bytes = read_input(path)?;
    let pairs = text::parse_pairs_bytes(&bytes).map_err(vmx_codec::Error::from)?;
    let vm: VirtualMachine = Decoder::new(options.clone()).decode(pairs)?;

    let stdout = if mode.is_json() {
        to_pretty_json_line(&serde_json::json!({
            "status": "ok",
            "record": vm,
        }))?
    } else {
        to_pretty_json_line(&vm)?
    };

    Ok(CliOutput {
        stdout,
        stderr: String::new(),
        exit_code: ExitCode::Ok,
    })
}
