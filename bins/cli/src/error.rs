use std::fmt;
use vmx_shared::{ErrorEnvelope, ErrorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Ok = 0,
    InvalidInput = 2,
    Io = 3,
    Internal = 1,
}

impl ExitCode {
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Exit code for a structured failure.
    #[must_use]
    pub const fn for_envelope(envelope: &ErrorEnvelope) -> Self {
        match envelope.kind {
            ErrorKind::Expected => Self::InvalidInput,
            ErrorKind::Invariant | ErrorKind::Unexpected => Self::Internal,
        }
    }
}

#[derive(Debug)]
pub enum CliError {
    /// A codec or config failure, reported on stdout in the selected format.
    Envelope(ErrorEnvelope),
    Io(std::io::Error),
    Serialization(serde_json::Error),
}

impl CliError {
    #[must_use]
    pub const fn exit_code(&self) -> ExitCode {
        match self {
            Self::Envelope(envelope) => ExitCode::for_envelope(envelope),
            Self::Io(_) => ExitCode::Io,
            Self::Serialization(_) => ExitCode::Internal,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Envelope(envelope) => write!(formatter, "{envelope}"),
            Self::Io(error) => write!(formatter, "io error: {error}"),
            Self::Serialization(error) => write!(formatter, "serialization error: {error}"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error)
    }
}

impl From<ErrorEnvelope> for CliError {
    fn from(envelope: ErrorEnvelope) -> Self {
        Self::Envelope(envelope)
    }
}

impl From<vmx_codec::Error> for CliError {
    fn from(error: vmx_codec::Error) -> Self {
        Self::Envelope(error.into())
    }
}
