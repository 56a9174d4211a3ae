//! Info command handler.

use crate::CliOutput;
use crate::error::{CliError, ExitCode};
use crate::format::{OutputMode, to_pretty_json_line};
use vmx_codec::{CodecOptions, codec_crate_version};
use vmx_config::config_crate_version;

/// Run the info command.
pub fn run_info(mode: OutputMode, options: &CodecOptions) -> Result<CliOutput, CliError> {
    let stdout = if mode.is_json() {
        format_info_json(options)?
    } else {
        format_info_text(options)
    };

    Ok(CliOutput {
        stdout,
        stderr: String::new(),
        exit_code: ExitCode::Ok,
    })
}

fn format_info_text(options: &CodecOptions) -> String {
    format!(
        "status: ok\nname: {}\nversion: {}\ncodec: {}\nconfig: {}\nstrictUnmatched: {}\nmaxDepth: {}\ndepthPolicy: {}\n",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        codec_crate_version(),
        config_crate_version(),
        options.strict_unmatched,
        options.max_depth,
        options.depth_policy,
    )
}

fn format_info_json(options: &CodecOptions) -> Result<String, CliError> {
    let payload = serde_json::json!({
        "status": "ok",
        "build": {
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "codecVersion": codec_crate_version(),
            "configVersion": config_crate_version(),
        },
        "codec": options,
    });
    Ok(to_pretty_json_line(&payload)?)
}
