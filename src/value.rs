//! The decoded shapes a directory entry can take.

use std::fmt;

use serde::ser::SerializeTupleStruct;
use serde::{Serialize, Serializer};

use crate::date::ExifDateTime;

/// A single numeric element of an entry, one variant per primitive type.
///
/// Rationals keep their `(numerator, denominator)` representation instead of
/// being collapsed to a float.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    Byte(u8),
    Short(u16),
    Long(u32),
    Rational(u32, u32),
    SByte(i8),
    SShort(i16),
    SLong(i32),
    SRational(i32, i32),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Scalar::Byte(v) => write!(f, "{v}"),
            Scalar::Short(v) => write!(f, "{v}"),
            Scalar::Long(v) => write!(f, "{v}"),
            Scalar::Rational(n, d) => write!(f, "{n}/{d}"),
            Scalar::SByte(v) => write!(f, "{v}"),
            Scalar::SShort(v) => write!(f, "{v}"),
            Scalar::SLong(v) => write!(f, "{v}"),
            Scalar::SRational(n, d) => write!(f, "{n}/{d}"),
        }
    }
}

impl Scalar {
    /// The value as an unsigned 32-bit integer, if it is one.
    pub fn as_u32(&self) -> Option<u32> {
        match *self {
            Scalar::Byte(v) => Some(v.into()),
            Scalar::Short(v) => Some(v.into()),
            Scalar::Long(v) => Some(v),
            _ => None,
        }
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            Scalar::Byte(v) => serializer.serialize_u8(v),
            Scalar::Short(v) => serializer.serialize_u16(v),
            Scalar::Long(v) => serializer.serialize_u32(v),
            Scalar::SByte(v) => serializer.serialize_i8(v),
            Scalar::SShort(v) => serializer.serialize_i16(v),
            Scalar::SLong(v) => serializer.serialize_i32(v),
            Scalar::Rational(n, d) => {
                let mut tup = serializer.serialize_tuple_struct("Rational", 2)?;
                tup.serialize_field(&n)?;
                tup.serialize_field(&d)?;
                tup.end()
            }
            Scalar::SRational(n, d) => {
                let mut tup = serializer.serialize_tuple_struct("SRational", 2)?;
                tup.serialize_field(&n)?;
                tup.serialize_field(&d)?;
                tup.end()
            }
        }
    }
}

/// A fully decoded entry value.
///
/// An entry whose payload decodes to exactly one numeric element is
/// collapsed to [`Value::Scalar`]; two or more elements stay a
/// [`Value::List`] of the same length.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Value {
    /// The entry carried a type code of `0` or above the known range.
    /// An explicit "no value", not a decode failure.
    Null,
    /// A single numeric element.
    Scalar(Scalar),
    /// Two or more numeric elements, in payload order.
    List(Vec<Scalar>),
    /// An ASCII entry, NUL-trimmed.
    Ascii(String),
    /// An UNDEFINED entry: the raw payload bytes, uninterpreted.
    Undefined(Vec<u8>),
    /// A date-classified tag, reparsed from its ASCII form.
    DateTime(ExifDateTime),
}

impl Value {
    /// The value as an unsigned 32-bit integer, if it is a single one.
    ///
    /// This is what the sub-IFD pointer accessors go through; pointer tags
    /// are stored as a single LONG.
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Value::Scalar(s) => s.as_u32(),
            _ => None,
        }
    }

    /// The value as text, if it is an ASCII entry.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Ascii(s) => Some(s),
            _ => None,
        }
    }

    /// The raw bytes of an UNDEFINED entry.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Undefined(b) => Some(b),
            _ => None,
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Scalar(s) => s.serialize(serializer),
            Value::List(values) => serializer.collect_seq(values),
            Value::Ascii(s) => serializer.serialize_str(s),
            Value::Undefined(bytes) => serializer.serialize_bytes(bytes),
            Value::DateTime(dt) => dt.serialize(serializer),
        }
    }
}
