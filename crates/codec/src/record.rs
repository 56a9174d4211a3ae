//! Field access traits the walker drives.
//!
//! `#[derive(Vmx)]` implements [`Record`] for user structs. Each mapped field
//! is exposed by declaration index as a [`Slot`] (read) or [`SlotMut`]
//! (write), so the walker never needs to know concrete field types.

use crate::error::SchemaError;
use crate::scalar::{Scalar, ScalarKind};
use crate::schema::{Schema, SchemaFn};
use std::collections::{BTreeMap, HashMap};

/// A struct whose fields map to flat keys.
pub trait Record {
    /// Schema of the implementing type, built on first use.
    fn record_schema() -> Result<&'static Schema, SchemaError>
    where
        Self: Sized;

    /// Schema of this value's type.
    fn schema(&self) -> Result<&'static Schema, SchemaError>;

    /// Read access to the field at a schema index.
    fn slot(&self, index: usize) -> Option<Slot<'_>>;

    /// Write access to the field at a schema index.
    fn slot_mut(&mut self, index: usize) -> Option<SlotMut<'_>>;
}

/// Shape of a field as seen by the schema.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    /// Leaf value.
    Scalar(ScalarKind),
    /// Nested struct.
    Record(SchemaFn),
    /// Sequence of nested structs; the schema is the element's.
    Sequence(SchemaFn),
    /// Map-typed field; recognized but never populated.
    Map,
}

/// Read access to one field.
pub enum Slot<'a> {
    /// Leaf value.
    Scalar(&'a dyn Scalar),
    /// Nested struct.
    Record(&'a dyn Record),
    /// Sequence of nested structs.
    Sequence(&'a dyn Sequence),
    /// Map-typed field.
    Map,
}

/// Write access to one field.
pub enum SlotMut<'a> {
    /// Leaf value.
    Scalar(&'a mut dyn Scalar),
    /// Nested struct.
    Record(&'a mut dyn Record),
    /// Sequence of nested structs.
    Sequence(&'a mut dyn Sequence),
    /// Map-typed field.
    Map,
}

/// Growable sequence of records.
pub trait Sequence {
    /// Number of elements.
    fn len(&self) -> usize;

    /// True when there are no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Allocated room.
    fn capacity(&self) -> usize;

    /// Make room for `additional` more elements, exactly.
    fn reserve_exact(&mut self, additional: usize);

    /// Element at `index`.
    fn element(&self, index: usize) -> Option<&dyn Record>;

    /// Append a zero-valued element and return it.
    fn push_default(&mut self) -> Option<&mut dyn Record>;

    /// Drop elements past `len`.
    fn truncate(&mut self, len: usize);
}

/// A type that can appear as a field of a [`Record`].
pub trait Field {
    /// Schema shape of the type.
    fn kind() -> FieldKind
    where
        Self: Sized;

    /// Read access.
    fn slot(&self) -> Slot<'_>;

    /// Write access.
    fn slot_mut(&mut self) -> SlotMut<'_>;
}

impl<T> Sequence for Vec<T>
where
    T: Record + Default + 'static,
{
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn capacity(&self) -> usize {
        Vec::capacity(self)
    }

    fn reserve_exact(&mut self, additional: usize) {
        Vec::reserve_exact(self, additional);
    }

    fn element(&self, index: usize) -> Option<&dyn Record> {
        self.get(index).map(|element| element as &dyn Record)
    }

    fn push_default(&mut self) -> Option<&mut dyn Record> {
        self.push(T::default());
        self.last_mut().map(|element| element as &mut dyn Record)
    }

    fn truncate(&mut self, len: usize) {
        Vec::truncate(self, len);
    }
}

impl<T> Field for Vec<T>
where
    T: Record + Default + 'static,
{
    fn kind() -> FieldKind {
        FieldKind::Sequence(T::record_schema)
    }

    fn slot(&self) -> Slot<'_> {
        Slot::Sequence(self)
    }

    fn slot_mut(&mut self) -> SlotMut<'_> {
        SlotMut::Sequence(self)
    }
}

impl<K, V, S> Field for HashMap<K, V, S> {
    fn kind() -> FieldKind {
        FieldKind::Map
    }

    fn slot(&self) -> Slot<'_> {
        Slot::Map
    }

    fn slot_mut(&mut self) -> SlotMut<'_> {
        SlotMut::Map
    }
}

impl<K, V> Field for BTreeMap<K, V> {
    fn kind() -> FieldKind {
        FieldKind::Map
    }

    fn slot(&self) -> Slot<'_> {
        Slot::Map
    }

    fn slot_mut(&mut self) -> SlotMut<'_> {
        SlotMut::Map
    }
}
