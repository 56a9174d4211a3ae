//! # vmx-shared
//!
//! Shared result types and error handling for the vmx-codec workspace.
//!
//! Every crate in the workspace reports user-facing failures as an
//! [`ErrorEnvelope`]: a stable `namespace:code` pair, a message, diagnostic
//! metadata, and (for aggregate failures) the list of individual causes.
//!
//! This crate only depends on external crates, so it is safe to import
//! anywhere.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod errors;
pub mod result;

pub use errors::{ErrorCode, ErrorEnvelope, ErrorKind, ErrorMetadata};
pub use result::{Result, ResultExt};

/// Returns the shared crate version.
#[must_use]
pub const fn shared_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::errors::{ErrorCode, ErrorEnvelope, ErrorKind};
    use super::result::Result;

    #[test]
    fn shared_error_types_are_available() {
        let error = ErrorEnvelope::expected(ErrorCode::invalid_input(), "invalid");
        assert_eq!(error.kind, ErrorKind::Expected);
    }

    #[test]
    fn shared_result_defaults_to_envelope() {
        let value: Result<i32> = Ok(5);
        assert!(matches!(value, Ok(5)));
        assert!(!super::shared_crate_version().is_empty());
    }
}
