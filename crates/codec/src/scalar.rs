//! Scalar codec: raw text to typed leaves and back.

use crate::error::{IntegerWidth, ScalarError};
use crate::record::{Field, FieldKind, Slot, SlotMut};
use std::fmt;

/// Leaf type of a scalar field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// `true` / `false`.
    Bool,
    /// Verbatim text.
    Str,
    /// Base-10 integer of a declared width.
    Integer(IntegerWidth),
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => formatter.write_str("bool"),
            Self::Str => formatter.write_str("string"),
            Self::Integer(width) => {
                let prefix = if width.signed { 'i' } else { 'u' };
                write!(formatter, "{prefix}{}", width.bits)
            },
        }
    }
}

/// A leaf value the walker can read from and write to raw text.
pub trait Scalar {
    /// Leaf type.
    fn scalar_kind(&self) -> ScalarKind;

    /// Replace the value with the parsed raw text.
    fn decode_raw(&mut self, raw: &str) -> Result<(), ScalarError>;

    /// Textual form written between the quotes on encode.
    fn encode_raw(&self) -> String;

    /// Whether the value equals the type's zero value (`omitempty`).
    fn is_zero(&self) -> bool;
}

/// Parse a boolean literal; only `true`/`false` in any case are accepted.
pub fn parse_bool(raw: &str) -> Result<bool, ScalarError> {
    if raw.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(ScalarError::InvalidBoolLiteral {
            value: raw.to_owned(),
        })
    }
}

impl Scalar for String {
    fn scalar_kind(&self) -> ScalarKind {
        ScalarKind::Str
    }

    fn decode_raw(&mut self, raw: &str) -> Result<(), ScalarError> {
        raw.clone_into(self);
        Ok(())
    }

    fn encode_raw(&self) -> String {
        self.clone()
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl Scalar for bool {
    fn scalar_kind(&self) -> ScalarKind {
        ScalarKind::Bool
    }

    fn decode_raw(&mut self, raw: &str) -> Result<(), ScalarError> {
        *self = parse_bool(raw)?;
        Ok(())
    }

    fn encode_raw(&self) -> String {
        if *self { "true" } else { "false" }.to_owned()
    }

    fn is_zero(&self) -> bool {
        !*self
    }
}

macro_rules! integer_scalar {
    ($($ty:ty => $signed:expr),* $(,)?) => {
        $(
            impl Scalar for $ty {
                fn scalar_kind(&self) -> ScalarKind {
                    ScalarKind::Integer(IntegerWidth {
                        bits: <$ty>::BITS,
                        signed: $signed,
                    })
                }

                fn decode_raw(&mut self, raw: &str) -> Result<(), ScalarError> {
                    *self = raw.parse::<$ty>().map_err(|_| ScalarError::InvalidIntegerLiteral {
                        value: raw.to_owned(),
                        width: IntegerWidth {
                            bits: <$ty>::BITS,
                            signed: $signed,
                        },
                    })?;
                    Ok(())
                }

                fn encode_raw(&self) -> String {
                    self.to_string()
                }

                fn is_zero(&self) -> bool {
                    *self == 0
                }
            }
        )*
    };
}

integer_scalar! {
    i8 => true,
    i16 => true,
    i32 => true,
    i64 => true,
    isize => true,
    u8 => false,
    u16 => false,
    u32 => false,
    u64 => false,
    usize => false,
}

macro_rules! scalar_field {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Field for $ty {
                fn kind() -> FieldKind {
                    FieldKind::Scalar(Scalar::scalar_kind(&<$ty>::default()))
                }

                fn slot(&self) -> Slot<'_> {
                    Slot::Scalar(self)
                }

                fn slot_mut(&mut self) -> SlotMut<'_> {
                    SlotMut::Scalar(self)
                }
            }
        )*
    };
}

scalar_field!(String, bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
