//! Structural walker.
//!
//! Both directions follow the schema in declaration order and compose key
//! paths the same way. Decode pulls values out of a [`FlatStore`] into a
//! record; encode pushes a record's values out as [`RawPair`]s.

use crate::error::{Error, FieldError, FieldErrorKind, FieldErrors};
use crate::index::discover_indices;
use crate::options::{CodecOptions, DepthPolicy};
use crate::path::KeyPath;
use crate::record::{Record, Sequence, Slot, SlotMut};
use crate::scalar::Scalar;
use crate::store::{FlatStore, RawPair};
use tracing::trace;

/// Smallest capacity a grown sequence gets.
const MIN_SEQUENCE_CAPACITY: usize = 4;

/// Position of the walk: the path of the current record and how many
/// records deep it sits below the root.
#[derive(Debug, Clone)]
pub(crate) struct WalkContext {
    path: KeyPath,
    depth: usize,
}

impl WalkContext {
    pub(crate) const fn root() -> Self {
        Self {
            path: KeyPath::root(),
            depth: 0,
        }
    }

    /// Context for a nested record at `path`, or `None` when the depth bound
    /// truncates the walk.
    fn descend(&self, path: KeyPath, options: &CodecOptions) -> Result<Option<Self>, Error> {
        let depth = self.depth + 1;
        if depth > options.max_depth {
            return match options.depth_policy {
                DepthPolicy::Truncate => {
                    trace!(path = %path, max_depth = options.max_depth, "depth bound reached, truncating");
                    Ok(None)
                },
                DepthPolicy::Error => Err(Error::DepthExceeded {
                    path: path.to_string(),
                    max_depth: options.max_depth,
                }),
            };
        }
        Ok(Some(Self { path, depth }))
    }
}

/// Make room for one more element, growing geometrically.
pub(crate) fn grow_sequence(sequence: &mut dyn Sequence) {
    let len = sequence.len();
    if len >= sequence.capacity() {
        let target = (len * 2).max(MIN_SEQUENCE_CAPACITY);
        sequence.reserve_exact(target - len);
    }
}

pub(crate) struct DecodeWalk<'a> {
    store: &'a FlatStore,
    options: &'a CodecOptions,
    errors: FieldErrors,
}

impl<'a> DecodeWalk<'a> {
    pub(crate) fn new(store: &'a FlatStore, options: &'a CodecOptions) -> Self {
        Self {
            store,
            options,
            errors: FieldErrors::default(),
        }
    }

    pub(crate) fn finish(self) -> FieldErrors {
        self.errors
    }

    pub(crate) fn record(
        &mut self,
        record: &mut dyn Record,
        context: &WalkContext,
    ) -> Result<(), Error> {
        let schema = record.schema()?;
        for node in schema.nodes() {
            let path = context.path.child(node.key());
            let Some(slot) = record.slot_mut(node.index()) else {
                continue;
            };
            match slot {
                SlotMut::Scalar(scalar) => self.scalar(scalar, &path),
                SlotMut::Record(nested) => {
                    if let Some(inner) = context.descend(path, self.options)? {
                        self.record(nested, &inner)?;
                    }
                },
                SlotMut::Sequence(sequence) => self.sequence(sequence, &path, context)?,
                SlotMut::Map => trace!(path = %path, "map fields are not decoded"),
            }
        }
        Ok(())
    }

    fn scalar(&mut self, scalar: &mut dyn Scalar, path: &KeyPath) {
        let lookup = path.lookup_key();
        match self.store.get(&lookup) {
            None | Some("") if self.options.strict_unmatched => self.errors.push(FieldError {
                path: lookup,
                kind: FieldErrorKind::UnmatchedKey,
            }),
            None | Some("") => {},
            Some(raw) => {
                if let Err(error) = scalar.decode_raw(raw) {
                    self.errors.push(FieldError {
                        path: lookup,
                        kind: error.into(),
                    });
                }
            },
        }
    }

    fn sequence(
        &mut self,
        sequence: &mut dyn Sequence,
        path: &KeyPath,
        context: &WalkContext,
    ) -> Result<(), Error> {
        let tokens = discover_indices(self.store, path.as_str());
        trace!(path = %path, indices = ?tokens, "discovered sequence indices");

        for token in &tokens {
            let Some(inner) = context.descend(path.element(token), self.options)? else {
                return Ok(());
            };
            grow_sequence(sequence);
            let len = sequence.len();
            let errors_before = self.errors.len();
            if let Some(element) = sequence.push_default() {
                self.record(element, &inner)?;
            }
            if self.errors.len() > errors_before {
                trace!(path = %inner.path, "dropping element with field errors");
                sequence.truncate(len);
            }
        }
        Ok(())
    }
}

pub(crate) struct EncodeWalk<'a> {
    options: &'a CodecOptions,
    pairs: Vec<RawPair>,
}

impl<'a> EncodeWalk<'a> {
    pub(crate) const fn new(options: &'a CodecOptions) -> Self {
        Self {
            options,
            pairs: Vec::new(),
        }
    }

    pub(crate) fn finish(self) -> Vec<RawPair> {
        self.pairs
    }

    pub(crate) fn record(&mut self, record: &dyn Record, context: &WalkContext) -> Result<(), Error> {
        let schema = record.schema()?;
        for node in schema.nodes() {
            let path = context.path.child(node.key());
            let Some(slot) = record.slot(node.index()) else {
                continue;
            };
            match slot {
                Slot::Scalar(scalar) => {
                    if node.omit_empty() && scalar.is_zero() {
                        continue;
                    }
                    self.pairs
                        .push(RawPair::new(path.as_str(), scalar.encode_raw()));
                },
                Slot::Record(nested) => {
                    if let Some(inner) = context.descend(path, self.options)? {
                        self.record(nested, &inner)?;
                    }
                },
                Slot::Sequence(sequence) => self.sequence(sequence, &path, context)?,
                Slot::Map => trace!(path = %path, "map fields are not encoded"),
            }
        }
        Ok(())
    }

    fn sequence(
        &mut self,
        sequence: &dyn Sequence,
        path: &KeyPath,
        context: &WalkContext,
    ) -> Result<(), Error> {
        for index in 0..sequence.len() {
            let Some(inner) = context.descend(path.element(&index.to_string()), self.options)?
            else {
                return Ok(());
            };
            if let Some(element) = sequence.element(index) {
                self.record(element, &inner)?;
            }
        }
        Ok(())
    }
}
