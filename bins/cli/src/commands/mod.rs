//! CLI command handlers.

pub mod decode;
pub mod encode;
pub mod info;
pub mod keys;
pub mod pairs;

pub use decode::run_decode;
pub use encode::run_encode;
pub use info::run_info;
pub use keys::run_keys;
pub use pairs::run_pairs;

use crate::error::CliError;
use std::io::Read;
use std::path::Path;

/// Read a command input; `-` reads stdin.
pub(crate) fn read_input(path: &Path) -> Result<Vec<u8>, CliError> {
    if path == Path::new("-") {
        let mut buffer = Vec::new();
        std::io::stdin().read_to_end(&mut buffer)?;
        return Ok(buffer);
    }
    Ok(std::fs::read(path)?)
}
