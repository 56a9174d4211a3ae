//! Pairs command handler.

use super::read_input;
use crate::CliOutput;
use crate::error::{CliError, ExitCode};
use crate::format::{OutputMode, to_pretty_json_line};
use std::path::Path;
use vmx_codec::path::normalize_key;
use vmx_codec::{RawPair, text};

/// Parse a file and list its pairs with lowercased keys.
pub fn run_pairs(mode: OutputMode, path: &Path) -> Result<CliOutput, CliError> {
    let bytes = read_input(path)?;
    let pairs = text::parse_pairs_bytes(&bytes).map_err(vmx_codec::Error::from)?;

    let stdout = if mode.is_json() {
        let normalized: Vec<RawPair> = pairs
            .iter()
            .map(|pair| RawPair::new(normalize_key(&pair.key), pair.value.as_str()))
            .collect();
        to_pretty_json_line(&serde_json::json!({
            "status": "ok",
            "count": normalized.len(),
            "pairs": normalized,
        }))?
    } else {
        text::write_normalized(&pairs)
    };

    Ok(CliOutput {
        stdout,
        stderr: String::new(),
        exit_code: ExitCode::Ok,
    })
}
