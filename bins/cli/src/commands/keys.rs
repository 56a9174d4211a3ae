//! Keys command handler.

use crate::CliOutput;
use crate::error::{CliError, ExitCode};
use crate::format::{OutputMode, to_pretty_json_line};
use crate::model::VirtualMachine;
use vmx_codec::{KeyPattern, Record};

/// List every key the built-in model reads and writes.
pub fn run_keys(mode: OutputMode, max_depth: usize) -> Result<CliOutput, CliError> {
    let schema = vmx_codec::check_tree(VirtualMachine::record_schema)
        .map_err(vmx_codec::Error::from)?;
    let patterns = schema
        .key_patterns(max_depth)
        .map_err(vmx_codec::Error::from)?;

    let stdout = if mode.is_json() {
        let keys: Vec<serde_json::Value> = patterns
            .iter()
            .map(|pattern| {
                serde_json::json!({
                    "key": pattern.path,
                    "field": pattern.field,
                    "type": pattern.kind.to_string(),
                    "omitEmpty": pattern.omit_empty,
                })
            })
            .collect();
        to_pretty_json_line(&serde_json::json!({
            "status": "ok",
            "type": schema.type_name(),
            "keys": keys,
        }))?
    } else {
        format_keys_text(&patterns)
    };

    Ok(CliOutput {
        stdout,
        stderr: String::new(),
        exit_code: ExitCode::Ok,
    })
}

fn format_keys_text(patterns: &[KeyPattern]) -> String {
    let width = patterns
        .iter()
        .map(|pattern| pattern.path.len())
        .max()
        .unwrap_or_default();
    let mut out = String::new();
    for pattern in patterns {
        let omit = if pattern.omit_empty { " omitempty" } else { "" };
        out.push_str(&format!("{:<width$}  {}{omit}\n", pattern.path, pattern.kind));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use vmx_codec::ScalarKind;

    #[test]
    fn text_listing_aligns_types() {
        let patterns = vec![
            KeyPattern {
                path: "memsize".to_owned(),
                field: "memsize",
                kind: ScalarKind::Str,
                omit_empty: false,
            },
            KeyPattern {
                path: "ethernet<n>.present".to_owned(),
                field: "present",
                kind: ScalarKind::Bool,
                omit_empty: true,
            },
        ];
        assert_eq!(
            format_keys_text(&patterns),
            "memsize              string\nethernet<n>.present  bool omitempty\n"
        );
    }
}
