//! Decode entry point.

use crate::error::Error;
use crate::options::CodecOptions;
use crate::record::Record;
use crate::schema::check_tree;
use crate::store::{FlatStore, RawPair};
use crate::walk::{DecodeWalk, WalkContext};
use tracing::debug;

/// Populates records from raw pairs.
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    options: CodecOptions,
}

impl Decoder {
    /// Decoder with the given options.
    #[must_use]
    pub const fn new(options: CodecOptions) -> Self {
        Self { options }
    }

    /// Options in effect.
    #[must_use]
    pub const fn options(&self) -> &CodecOptions {
        &self.options
    }

    /// Decode `pairs` into `target`.
    ///
    /// Record and schema errors are reported before `target` is touched.
    /// Field errors are collected across the whole walk and returned as one
    /// [`Error::Fields`]; `target` may then be partially populated.
    pub fn decode_pairs<T, I>(&self, pairs: I, target: &mut T) -> Result<(), Error>
    where
        T: Record,
        I: IntoIterator<Item = RawPair>,
    {
        let store = FlatStore::try_from_pairs(pairs)?;
        let schema = check_tree(T::record_schema)?;
        debug!(
            record = schema.type_name(),
            keys = store.len(),
            strict = self.options.strict_unmatched,
            "decoding record"
        );

        let mut walk = DecodeWalk::new(&store, &self.options);
        walk.record(target, &WalkContext::root())?;
        let errors = walk.finish();

        debug!(record = schema.type_name(), errors = errors.len(), "decoded record");
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Fields(errors))
        }
    }

    /// Decode `pairs` into a fresh `T::default()`.
    pub fn decode<T, I>(&self, pairs: I) -> Result<T, Error>
    where
        T: Record + Default,
        I: IntoIterator<Item = RawPair>,
    {
        let mut target = T::default();
        self.decode_pairs(pairs, &mut target)?;
        Ok(target)
    }
}
