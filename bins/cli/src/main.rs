//! CLI binary entrypoint.

mod commands;
mod error;
mod format;
mod model;

use clap::{Args, Parser, Subcommand};
use commands::{run_decode, run_encode, run_info, run_keys, run_pairs};
use error::{CliError, ExitCode};
use format::{OutputArgs, OutputMode};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use vmx_codec::{CodecOptions, DepthPolicy};
use vmx_config::{VmxOverrides, load_vmx_config_std_env};
use vmx_shared::ErrorEnvelope;

#[derive(Debug, Parser)]
#[command(
    name = "vmx",
    version,
    about = "Read, write, and inspect VMX key/value files",
    long_about = None
)]
struct Cli {
    #[command(flatten)]
    output: OutputArgs,

    #[command(flatten)]
    codec: CodecArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Args)]
struct CodecArgs {
    /// Optional config file path (JSON/TOML).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Fail when a model field has no matching key.
    #[arg(long, global = true)]
    strict: bool,
    /// Nesting bound for records and sequence elements.
    #[arg(long, global = true)]
    max_depth: Option<usize>,
    /// What to do past the nesting bound (`truncate` or `error`).
    #[arg(long, global = true)]
    depth_policy: Option<DepthPolicy>,
}

impl CodecArgs {
    fn overrides(&self) -> VmxOverrides {
        VmxOverrides {
            strict_unmatched: self.strict.then_some(true),
            max_depth: self.max_depth,
            depth_policy: self.depth_policy,
        }
    }

    /// Effective options: flags over env over config file over defaults.
    fn load_options(&self) -> Result<CodecOptions, CliError> {
        let config = load_vmx_config_std_env(self.config.as_deref(), &self.overrides())?;
        Ok(config.codec_options().clone())
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Parse a file and list its pairs with lowercased keys.
    Pairs {
        /// Input file (`-` for stdin).
        file: PathBuf,
    },
    /// Decode a `.vmx` file into the virtual machine model and print JSON.
    Decode {
        /// Input file (`-` for stdin).
        file: PathBuf,
    },
    /// Read the virtual machine model from JSON and print VMX text.
    Encode {
        /// Input JSON file (`-` for stdin).
        file: PathBuf,
    },
    /// List the keys the virtual machine model reads and writes.
    Keys,
    /// Show version details and the effective codec options.
    Info,
}

pub(crate) struct CliOutput {
    stdout: String,
    stderr: String,
    exit_code: ExitCode,
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.output.verbose);
    let mode = OutputMode::from_args(&cli.output);

    let result = run(&cli, mode).or_else(|error| match error {
        CliError::Envelope(envelope) => Ok(format_error_output(mode, &envelope)),
        other => Err(other),
    });

    match result {
        Ok(output) => match write_output(&output) {
            Ok(()) => std::process::ExitCode::from(output.exit_code.as_u8()),
            Err(error) => exit_with_error(&error),
        },
        Err(error) => exit_with_error(&error),
    }
}

/// Logs go to stderr so stdout stays parseable. `RUST_LOG` applies unless
/// `--verbose` forces debug.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn exit_with_error(error: &CliError) -> std::process::ExitCode {
    let _ = writeln!(io::stderr(), "error: {error}");
    std::process::ExitCode::from(error.exit_code().as_u8())
}

fn run(cli: &Cli, mode: OutputMode) -> Result<CliOutput, CliError> {
    match &cli.command {
        Commands::Pairs { file } => run_pairs(mode, file),
        Commands::Decode { file } => run_decode(mode, file, &cli.codec.load_options()?),
        Commands::Encode { file } => run_encode(mode, file, &cli.codec.load_options()?),
        Commands::Keys => run_keys(mode, cli.codec.load_options()?.max_depth),
        Commands::Info => run_info(mode, &cli.codec.load_options()?),
    }
}

pub(crate) fn format_error_output(mode: OutputMode, error: &ErrorEnvelope) -> CliOutput {
    let stdout = if mode.is_json() {
        let payload = serde_json::json!({
            "status": "error",
            "error": error,
        });

        // This is a CLI boundary, so JSON serialization errors are internal.
        let mut output = serde_json::to_string_pretty(&payload).unwrap_or_else(|_| {
            "{\"status\":\"error\",\"error\":{\"code\":\"core:internal\",\"message\":\"internal error\"}}".to_string()
        });
        output.push('\n');
        output
    } else {
        format_error_text(error)
    };

    CliOutput {
        stdout,
        stderr: String::new(),
        exit_code: ExitCode::for_envelope(error),
    }
}

fn format_error_text(error: &ErrorEnvelope) -> String {
    let mut out = String::new();
    out.push_str("status: error\n");
    out.push_str("code: ");
    out.push_str(&error.code.to_string());
    out.push('\n');
    out.push_str("message: ");
    out.push_str(&error.message);
    out.push('\n');
    out.push_str("kind: ");
    out.push_str(&error.kind.to_string());
    out.push('\n');

    if !error.metadata.is_empty() {
        out.push_str("meta:\n");
        for (key, value) in &error.metadata {
            out.push_str("  ");
            out.push_str(key);
            out.push_str(": ");
            out.push_str(value);
            out.push('\n');
        }
    }

    if error.is_aggregate() {
        out.push_str("causes:\n");
        for cause in &error.causes {
            out.push_str("  - ");
            out.push_str(&cause.code.to_string());
            if let Some(path) = cause.metadata.get("path") {
                out.push_str(" at ");
                out.push_str(path);
            }
            out.push_str(": ");
            out.push_str(&cause.message);
            out.push('\n');
        }
    }

    out
}

fn write_output(output: &CliOutput) -> Result<(), CliError> {
    let mut stdout = io::stdout();
    stdout.write_all(output.stdout.as_bytes())?;

    if !output.stderr.is_empty() {
        let mut stderr = io::stderr();
        stderr.write_all(output.stderr.as_bytes())?;
        stderr.flush()?;
    }

    Ok(())
}
