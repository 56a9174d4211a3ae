//! # vmx-codec
//!
//! Schema-driven mapping between flat VMX key/value text and typed records.
//!
//! ```ignore
//! use vmx_codec::Vmx;
//!
//! #[derive(Debug, Default, Vmx)]
//! struct VirtualMachine {
//!     #[vmx("displayName")]
//!     display_name: String,
//!     #[vmx("memsize,omitempty")]
//!     memsize: u32,
//!     #[vmx("ethernet")]
//!     ethernet: Vec<Ethernet>,
//! }
//!
//! #[derive(Debug, Default, Vmx)]
//! struct Ethernet {
//!     #[vmx("present")]
//!     present: bool,
//! }
//!
//! let vm: VirtualMachine = vmx_codec::from_str("ethernet0.present = \"TRUE\"\n")?;
//! let text = vmx_codec::to_string(&vm)?;
//! ```
//!
//! Keys match case-insensitively on decode and keep the schema's spelling on
//! encode. Sequence elements are discovered from key suffixes (`ethernet0`,
//! `scsi0:1`, `usb:0`) and written back with `0, 1, 2...` indices.

extern crate self as vmx_codec;

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod index;
pub mod options;
pub mod path;
pub mod record;
pub mod scalar;
pub mod schema;
pub mod store;
pub mod tag;
pub mod text;

mod walk;

pub use decoder::Decoder;
pub use encoder::Encoder;
pub use error::{
    Error, FieldError, FieldErrorKind, FieldErrors, IntegerWidth, RecordError, RecordErrorReason,
    ScalarError, SchemaError,
};
pub use index::discover_indices;
pub use options::{CodecOptions, DEFAULT_MAX_DEPTH, DepthPolicy};
pub use path::KeyPath;
pub use record::{Field, FieldKind, Record, Sequence, Slot, SlotMut};
pub use scalar::{Scalar, ScalarKind};
pub use schema::{FieldDecl, KeyPattern, Schema, SchemaCell, SchemaFn, SchemaNode, check_tree};
pub use store::{FlatStore, RawPair};
pub use tag::{FieldTag, TagError, parse_tag};
pub use vmx_derive::Vmx;

/// Decode VMX text into a new record with default options.
pub fn from_str<T: Record + Default>(input: &str) -> Result<T, Error> {
    from_str_with(input, &CodecOptions::default())
}

/// Decode VMX text into a new record.
pub fn from_str_with<T: Record + Default>(input: &str, options: &CodecOptions) -> Result<T, Error> {
    let pairs = text::parse_pairs(input)?;
    Decoder::new(options.clone()).decode(pairs)
}

/// Decode VMX bytes into a new record with default options.
pub fn from_slice<T: Record + Default>(input: &[u8]) -> Result<T, Error> {
    let pairs = text::parse_pairs_bytes(input)?;
    Decoder::default().decode(pairs)
}

/// Encode a record as VMX text with default options.
pub fn to_string<T: Record>(source: &T) -> Result<String, Error> {
    to_string_with(source, &CodecOptions::default())
}

/// Encode a record as VMX text.
pub fn to_string_with<T: Record>(source: &T, options: &CodecOptions) -> Result<String, Error> {
    Encoder::new(options.clone()).encode_string(source)
}

/// Encode a record as VMX bytes with default options.
pub fn to_vec<T: Record>(source: &T) -> Result<Vec<u8>, Error> {
    to_string(source).map(String::into_bytes)
}

/// Returns the codec crate version.
#[must_use]
pub const fn codec_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
