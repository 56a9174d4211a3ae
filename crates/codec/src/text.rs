//! Line-oriented VMX text.
//!
//! ```text
//! .encoding = "UTF-8"
//! # comment
//! displayName = "my vm"
//! ethernet0.present = "TRUE"
//! ```
//!
//! Each non-blank, non-comment line is `key = "value"` with exactly one `=`.
//! Values are double-quoted and may carry backslash escapes. The writer
//! escapes `=` inside values so every written line parses back.

use crate::error::{RecordError, RecordErrorReason};
use crate::path::normalize_key;
use crate::store::RawPair;

const COMMENT_PREFIX: char = '#';
const SEPARATOR: char = '=';

/// Parse VMX text into pairs, in source order.
pub fn parse_pairs(input: &str) -> Result<Vec<RawPair>, RecordError> {
    let mut pairs = Vec::new();
    for (offset, line) in input.lines().enumerate() {
        if line.starts_with(COMMENT_PREFIX) || line.trim().is_empty() {
            continue;
        }
        let number = offset + 1;
        let reject = |reason| RecordError {
            line: number,
            reason,
            text: line.to_owned(),
        };

        let mut parts = line.split(SEPARATOR);
        let (Some(key), Some(value)) = (parts.next(), parts.next()) else {
            return Err(reject(RecordErrorReason::MissingSeparator));
        };
        if parts.next().is_some() {
            return Err(reject(RecordErrorReason::ExtraSeparator));
        }

        let key = key.trim();
        if key.is_empty() {
            return Err(reject(RecordErrorReason::EmptyKey));
        }
        let value = unquote(value.trim()).ok_or_else(|| reject(RecordErrorReason::BadQuoting))?;
        pairs.push(RawPair::new(key, value));
    }
    Ok(pairs)
}

/// Parse raw bytes; invalid UTF-8 is reported on the line where it occurs.
pub fn parse_pairs_bytes(input: &[u8]) -> Result<Vec<RawPair>, RecordError> {
    match std::str::from_utf8(input) {
        Ok(text) => parse_pairs(text),
        Err(error) => {
            let valid = input.get(..error.valid_up_to()).unwrap_or_default();
            let line = valid.iter().filter(|byte| **byte == b'\n').count() + 1;
            let start = valid
                .iter()
                .rposition(|byte| *byte == b'\n')
                .map_or(0, |newline| newline + 1);
            let text = input
                .get(start..)
                .unwrap_or_default()
                .split(|byte| *byte == b'\n')
                .next()
                .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
                .unwrap_or_default();
            Err(RecordError {
                line,
                reason: RecordErrorReason::InvalidUtf8,
                text,
            })
        },
    }
}

/// Render pairs as VMX text.
pub fn write_pairs(pairs: &[RawPair]) -> String {
    let mut out = String::new();
    for pair in pairs {
        out.push_str(&pair.key);
        out.push_str(" = \"");
        escape_into(&pair.value, &mut out);
        out.push_str("\"\n");
    }
    out
}

fn escape_into(value: &str, out: &mut String) {
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            SEPARATOR => out.push_str("\\x3d"),
            _ => out.push(ch),
        }
    }
}

/// Strip the surrounding double quotes and resolve escapes.
fn unquote(raw: &str) -> Option<String> {
    let inner = raw.strip_prefix('"')?.strip_suffix('"')?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => return None,
            '\\' => out.push(unescape(&mut chars)?),
            _ => out.push(ch),
        }
    }
    Some(out)
}

fn unescape(chars: &mut std::str::Chars<'_>) -> Option<char> {
    let escaped = chars.next()?;
    let ch = match escaped {
        '\\' => '\\',
        '"' => '"',
        '\'' => '\'',
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        'a' => '\u{07}',
        'b' => '\u{08}',
        'f' => '\u{0C}',
        'v' => '\u{0B}',
        'x' => hex_char(chars, 2)?,
        'u' => hex_char(chars, 4)?,
        'U' => hex_char(chars, 8)?,
        '0'..='7' => {
            let mut code = escaped.to_digit(8)?;
            for _ in 0..2 {
                code = code * 8 + chars.next()?.to_digit(8)?;
            }
            if code > 0o377 {
                return None;
            }
            char::from_u32(code)?
        },
        _ => return None,
    };
    Some(ch)
}

fn hex_char(chars: &mut std::str::Chars<'_>, digits: usize) -> Option<char> {
    let mut code = 0u32;
    for _ in 0..digits {
        code = code * 16 + chars.next()?.to_digit(16)?;
    }
    char::from_u32(code)
}

/// Debug-friendly listing used by the CLI: `key = "value"` per pair with
/// lowercased keys, matching what lookups see.
pub fn write_normalized(pairs: &[RawPair]) -> String {
    let mut out = String::new();
    for pair in pairs {
        out.push_str(&normalize_key(&pair.key));
        out.push_str(" = \"");
        escape_into(&pair.value, &mut out);
        out.push_str("\"\n");
    }
    out
}
