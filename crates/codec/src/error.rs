//! Codec error types.
//!
//! Schema and record errors are fatal: they abort the whole operation.
//! Field errors are collected during a walk and reported together as
//! [`Error::Fields`] once the walk finishes.

use crate::tag::TagError;
use std::fmt;
use thiserror::Error;
use vmx_shared::{ErrorCode, ErrorEnvelope};

/// Declared width of an integer field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntegerWidth {
    /// Bit width (8, 16, 32, 64, or the pointer width).
    pub bits: u32,
    /// Whether negative values are allowed.
    pub signed: bool,
}

impl fmt::Display for IntegerWidth {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.signed { "signed" } else { "unsigned" };
        write!(formatter, "{}-bit {sign}", self.bits)
    }
}

/// Failure converting a raw value into a scalar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScalarError {
    /// Anything other than `true`/`false` (any case).
    #[error("invalid boolean literal `{value}`")]
    InvalidBoolLiteral {
        /// Raw value.
        value: String,
    },
    /// Non-numeric or out-of-range integer text.
    #[error("invalid {width} integer literal `{value}`")]
    InvalidIntegerLiteral {
        /// Raw value.
        value: String,
        /// Declared width of the destination field.
        width: IntegerWidth,
    },
}

/// What went wrong with one field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldErrorKind {
    /// The raw value could not be coerced.
    #[error(transparent)]
    Scalar(#[from] ScalarError),
    /// Strict mode: no key in the source for this scalar field.
    #[error("no matching key in source")]
    UnmatchedKey,
}

/// Per-field failure, located by key path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{path}`: {kind}")]
pub struct FieldError {
    /// Key path of the failing field (lowercased, as looked up).
    pub path: String,
    /// Failure detail.
    pub kind: FieldErrorKind,
}

/// Every field failure from one walk, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: Vec<FieldError>,
}

impl FieldErrors {
    pub(crate) fn push(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    /// Number of collected errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// True when nothing failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Collected errors.
    #[must_use]
    pub fn as_slice(&self) -> &[FieldError] {
        &self.errors
    }

    /// Iterate collected errors.
    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.errors.iter()
    }
}

impl<'a> IntoIterator for &'a FieldErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{} field error(s)", self.errors.len())?;
        for (position, error) in self.errors.iter().enumerate() {
            let lead = if position == 0 { ": " } else { "; " };
            write!(formatter, "{lead}{error}")?;
        }
        Ok(())
    }
}

/// Why a source line was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RecordErrorReason {
    /// No `=` on the line.
    #[error("missing `=` separator")]
    MissingSeparator,
    /// More than one `=` on the line.
    #[error("more than one `=` separator")]
    ExtraSeparator,
    /// Nothing before the `=`.
    #[error("empty key")]
    EmptyKey,
    /// The value is not a valid double-quoted literal.
    #[error("value is not a valid quoted string")]
    BadQuoting,
    /// The input is not UTF-8.
    #[error("invalid UTF-8")]
    InvalidUtf8,
}

/// A malformed source record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid record on line {line}: {reason}: `{text}`")]
pub struct RecordError {
    /// 1-based line (or pair position) in the source.
    pub line: usize,
    /// Rejection reason.
    pub reason: RecordErrorReason,
    /// Offending text.
    pub text: String,
}

/// Schema authoring errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A field annotation does not follow the tag grammar.
    #[error("malformed tag on `{type_name}::{field}`: {source}")]
    MalformedTag {
        /// Record type.
        type_name: &'static str,
        /// Field name.
        field: &'static str,
        /// Grammar failure.
        source: TagError,
    },
    /// Two fields of one record claim the same external key.
    #[error("`{type_name}` fields `{first}` and `{second}` both map to key `{key}`")]
    DuplicateKey {
        /// Record type.
        type_name: &'static str,
        /// Lowercased key both fields claim.
        key: String,
        /// Field declared first.
        first: &'static str,
        /// Field declared second.
        second: &'static str,
    },
}

/// Top-level codec error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The schema is unusable.
    #[error(transparent)]
    Schema(#[from] SchemaError),
    /// A source line is malformed; the destination was not touched.
    #[error(transparent)]
    Record(#[from] RecordError),
    /// One or more fields failed; the destination may be partially populated.
    #[error("{0}")]
    Fields(FieldErrors),
    /// Nesting went past the configured bound under the `error` depth policy.
    #[error("nesting exceeds {max_depth} levels at `{path}`")]
    DepthExceeded {
        /// Path of the record that would have been entered.
        path: String,
        /// Configured bound.
        max_depth: usize,
    },
}

impl Error {
    /// Field failures, empty for every other error kind.
    #[must_use]
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Self::Fields(errors) => errors.as_slice(),
            _ => &[],
        }
    }

    fn error_code(&self) -> ErrorCode {
        match self {
            Self::Schema(SchemaError::MalformedTag { .. }) => ErrorCode::new("vmx", "malformed_tag"),
            Self::Schema(SchemaError::DuplicateKey { .. }) => ErrorCode::new("vmx", "duplicate_key"),
            Self::Record(_) => ErrorCode::new("vmx", "invalid_record"),
            Self::Fields(_) => ErrorCode::new("vmx", "field_errors"),
            Self::DepthExceeded { .. } => ErrorCode::new("vmx", "depth_exceeded"),
        }
    }
}

impl FieldError {
    fn error_code(&self) -> ErrorCode {
        match &self.kind {
            FieldErrorKind::Scalar(ScalarError::InvalidBoolLiteral { .. }) => {
                ErrorCode::new("vmx", "invalid_bool_literal")
            },
            FieldErrorKind::Scalar(ScalarError::InvalidIntegerLiteral { .. }) => {
                ErrorCode::new("vmx", "invalid_integer_literal")
            },
            FieldErrorKind::UnmatchedKey => ErrorCode::new("vmx", "unmatched_key"),
        }
    }
}

impl From<&FieldError> for ErrorEnvelope {
    fn from(error: &FieldError) -> Self {
        let envelope = Self::expected(error.error_code(), error.kind.to_string())
            .with_metadata("path", error.path.clone());
        match &error.kind {
            FieldErrorKind::Scalar(ScalarError::InvalidIntegerLiteral { width, .. }) => envelope
                .with_metadata("bits", width.bits.to_string())
                .with_metadata("signed", width.signed.to_string()),
            _ => envelope,
        }
    }
}

impl From<Error> for ErrorEnvelope {
    fn from(error: Error) -> Self {
        let code = error.error_code();
        match error {
            Error::Schema(ref schema) => {
                let envelope = Self::invariant(code, schema.to_string());
                match schema {
                    SchemaError::MalformedTag {
                        type_name, field, ..
                    } => envelope
                        .with_metadata("type", *type_name)
                        .with_metadata("field", *field),
                    SchemaError::DuplicateKey { type_name, key, .. } => envelope
                        .with_metadata("type", *type_name)
                        .with_metadata("key", key.clone()),
                }
            },
            Error::Record(ref record) => Self::expected(code, record.to_string())
                .with_metadata("line", record.line.to_string()),
            Error::Fields(ref errors) => {
                let mut envelope = Self::expected(
                    code,
                    format!("{} field error(s) while mapping record", errors.len()),
                );
                for field in errors {
                    envelope = envelope.with_cause(Self::from(field));
                }
                envelope
            },
            Error::DepthExceeded {
                ref path,
                max_depth,
            } => Self::expected(code, error.to_string())
                .with_metadata("path", path.clone())
                .with_metadata("maxDepth", max_depth.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vmx_shared::ErrorKind;

    fn bool_error(path: &str) -> FieldError {
        FieldError {
            path: path.to_owned(),
            kind: ScalarError::InvalidBoolLiteral {
                value: "yes".to_owned(),
            }
            .into(),
        }
    }

    #[test]
    fn field_errors_render_every_path() {
        let mut errors = FieldErrors::default();
        errors.push(bool_error("mem.hotadd"));
        errors.push(FieldError {
            path: "memsize".to_owned(),
            kind: FieldErrorKind::UnmatchedKey,
        });

        let rendered = Error::Fields(errors).to_string();
        assert_eq!(
            rendered,
            "2 field error(s): `mem.hotadd`: invalid boolean literal `yes`; `memsize`: no matching key in source"
        );
    }

    #[test]
    fn integer_errors_carry_width() {
        let error = ScalarError::InvalidIntegerLiteral {
            value: "300".to_owned(),
            width: IntegerWidth {
                bits: 8,
                signed: false,
            },
        };
        assert_eq!(error.to_string(), "invalid 8-bit unsigned integer literal `300`");
    }

    #[test]
    fn aggregate_envelope_keeps_each_cause() {
        let mut errors = FieldErrors::default();
        errors.push(bool_error("ethernet0.present"));
        let envelope = ErrorEnvelope::from(Error::Fields(errors));

        assert_eq!(envelope.kind, ErrorKind::Expected);
        assert_eq!(envelope.code, ErrorCode::new("vmx", "field_errors"));
        assert_eq!(envelope.causes.len(), 1);
        assert_eq!(
            envelope
                .causes
                .first()
                .and_then(|cause| cause.metadata.get("path"))
                .map(String::as_str),
            Some("ethernet0.present")
        );
    }

    #[test]
    fn record_envelope_reports_line() {
        let error = Error::Record(RecordError {
            line: 4,
            reason: RecordErrorReason::MissingSeparator,
            text: "notakeyvalueline".to_owned(),
        });
        let envelope = ErrorEnvelope::from(error);
        assert_eq!(envelope.code, ErrorCode::new("vmx", "invalid_record"));
        assert_eq!(envelope.metadata.get("line").map(String::as_str), Some("4"));
    }

    #[test]
    fn schema_errors_are_invariants() {
        let error = Error::Schema(SchemaError::MalformedTag {
            type_name: "Vm",
            field: "name",
            source: TagError::EmptyKey {
                tag: "vmx:\"\"".to_owned(),
            },
        });
        let envelope = ErrorEnvelope::from(error);
        assert_eq!(envelope.kind, ErrorKind::Invariant);
        assert_eq!(envelope.metadata.get("field").map(String::as_str), Some("name"));
    }
}
