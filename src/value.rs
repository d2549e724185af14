//! Raw column values and typed point field values.

use base64::Engine;
use ordered_float::OrderedFloat;

use crate::timestamp::WallClock;

/// A value decoded from one cell of a query result column.
///
/// Integer widths are kept as the server sent them; the column type resolver
/// decides what they become on the point.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// String value.
    String(String),

    /// 32-bit floating point value.
    Float(OrderedFloat<f32>),

    /// 64-bit floating point value.
    Double(OrderedFloat<f64>),

    /// Boolean value.
    Bool(bool),

    /// Signed 8-bit integer.
    Int8(i8),

    /// Signed 16-bit integer.
    Int16(i16),

    /// Signed 32-bit integer.
    Int32(i32),

    /// Signed 64-bit integer.
    Long(i64),

    /// Unsigned 8-bit integer.
    UInt8(u8),

    /// Unsigned 16-bit integer.
    UInt16(u16),

    /// Unsigned 32-bit integer.
    UInt32(u32),

    /// Unsigned 64-bit integer.
    UnsignedLong(u64),

    /// Duration value.
    Duration(chrono::Duration),

    /// Binary data.
    Binary(Vec<u8>),

    /// Wall-clock timestamp.
    Time(WallClock),

    /// Nanoseconds since the epoch, produced by resolving a timestamp column.
    EpochNanos(i128),

    /// Null value.
    Null,
}

impl Value {
    /// Returns the value as a string reference if it is a `String` variant.
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as a f64 if it is a `Double` variant.
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Value::Double(f) => Some(f.into_inner()),
            _ => None,
        }
    }

    /// Returns the value as a bool if it is a `Bool` variant.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the value as an i64 if it is a `Long` variant.
    pub fn as_long(&self) -> Option<i64> {
        match self {
            Value::Long(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value as a u64 if it is an `UnsignedLong` variant.
    pub fn as_unsigned_long(&self) -> Option<u64> {
        match self {
            Value::UnsignedLong(u) => Some(*u),
            _ => None,
        }
    }

    /// Returns the value as a byte slice if it is a `Binary` variant.
    pub fn as_binary(&self) -> Option<&[u8]> {
        match self {
            Value::Binary(b) => Some(b),
            _ => None,
        }
    }

    /// Returns true if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The exact value of any integer variant, regardless of width or sign.
    pub fn integer(&self) -> Option<i128> {
        match self {
            Value::Int8(i) => Some(i128::from(*i)),
            Value::Int16(i) => Some(i128::from(*i)),
            Value::Int32(i) => Some(i128::from(*i)),
            Value::Long(i) => Some(i128::from(*i)),
            Value::UInt8(u) => Some(i128::from(*u)),
            Value::UInt16(u) => Some(i128::from(*u)),
            Value::UInt32(u) => Some(i128::from(*u)),
            Value::UnsignedLong(u) => Some(i128::from(*u)),
            _ => None,
        }
    }

    /// The value of a floating point variant, widened to f64.
    pub fn floating(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(f64::from(f.into_inner())),
            Value::Double(d) => Some(d.into_inner()),
            _ => None,
        }
    }

    /// Returns true for every integer and floating point variant.
    pub fn is_numeric(&self) -> bool {
        self.integer().is_some() || self.floating().is_some()
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::String(s) => write!(f, "{}", s),
            Value::Float(v) => write!(f, "{}", v),
            Value::Double(d) => write!(f, "{}", d),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int8(i) => write!(f, "{}", i),
            Value::Int16(i) => write!(f, "{}", i),
            Value::Int32(i) => write!(f, "{}", i),
            Value::Long(i) => write!(f, "{}", i),
            Value::UInt8(u) => write!(f, "{}", u),
            Value::UInt16(u) => write!(f, "{}", u),
            Value::UInt32(u) => write!(f, "{}", u),
            Value::UnsignedLong(u) => write!(f, "{}", u),
            Value::Duration(d) => match d.num_nanoseconds() {
                Some(ns) => write!(f, "{}ns", ns),
                None => write!(f, "{}s", d.num_seconds()),
            },
            Value::Binary(b) => write!(
                f,
                "{}",
                base64::engine::general_purpose::STANDARD.encode(b)
            ),
            Value::Time(t) => write!(f, "{}", t),
            Value::EpochNanos(n) => write!(f, "{}", n),
            Value::Null => write!(f, "null"),
        }
    }
}

/// A typed field value on a point.
///
/// The kind is decided once, when the field is set, and drives how the value is
/// rendered in line protocol.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    /// Signed integer, rendered with an `i` suffix.
    Long(i64),
    /// Unsigned integer, rendered with a `u` suffix.
    UnsignedLong(u64),
    /// 32-bit float, rendered in shortest form.
    Float(f32),
    /// 64-bit float, rendered with 17 significant digits.
    Double(f64),
    /// Boolean, rendered as bare `true`/`false`.
    Bool(bool),
    /// String, rendered double-quoted.
    String(String),
    /// Any other value, kept as its display representation and rendered as a string.
    Raw(String),
}

impl FieldValue {
    /// Wrap any displayable value as a string field.
    pub fn display(value: impl std::fmt::Display) -> Self {
        FieldValue::Raw(value.to_string())
    }

    /// Convert a decoded column value. Nulls have no field representation.
    pub fn from_value(value: Value) -> Option<Self> {
        let field = match value {
            Value::Null => return None,
            Value::String(s) => FieldValue::String(s),
            Value::Float(f) => FieldValue::Float(f.into_inner()),
            Value::Double(d) => FieldValue::Double(d.into_inner()),
            Value::Bool(b) => FieldValue::Bool(b),
            Value::Int8(i) => FieldValue::Long(i64::from(i)),
            Value::Int16(i) => FieldValue::Long(i64::from(i)),
            Value::Int32(i) => FieldValue::Long(i64::from(i)),
            Value::Long(i) => FieldValue::Long(i),
            Value::UInt8(u) => FieldValue::UnsignedLong(u64::from(u)),
            Value::UInt16(u) => FieldValue::UnsignedLong(u64::from(u)),
            Value::UInt32(u) => FieldValue::UnsignedLong(u64::from(u)),
            Value::UnsignedLong(u) => FieldValue::UnsignedLong(u),
            Value::EpochNanos(n) => match i64::try_from(n) {
                Ok(n) => FieldValue::Long(n),
                Err(_) => FieldValue::display(n),
            },
            other @ (Value::Duration(_) | Value::Binary(_) | Value::Time(_)) => {
                FieldValue::display(other)
            }
        };
        Some(field)
    }

    /// Returns the value as an i64 if it is a `Long` variant.
    pub fn as_long(&self) -> Option<i64> {
        match self {
            FieldValue::Long(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value as a u64 if it is an `UnsignedLong` variant.
    pub fn as_unsigned_long(&self) -> Option<u64> {
        match self {
            FieldValue::UnsignedLong(u) => Some(*u),
            _ => None,
        }
    }

    /// Returns the value as a f32 if it is a `Float` variant.
    pub fn as_float(&self) -> Option<f32> {
        match self {
            FieldValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the value as a f64 if it is a `Double` variant.
    pub fn as_double(&self) -> Option<f64> {
        match self {
            FieldValue::Double(d) => Some(*d),
            _ => None,
        }
    }

    /// Returns the value as a bool if it is a `Bool` variant.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the text of a `String` or `Raw` variant.
    pub fn as_string(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) | FieldValue::Raw(s) => Some(s),
            _ => None,
        }
    }

    /// False for NaN and infinite floats, which line protocol cannot carry.
    pub fn is_finite(&self) -> bool {
        match self {
            FieldValue::Float(f) => f.is_finite(),
            FieldValue::Double(d) => d.is_finite(),
            _ => true,
        }
    }
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for FieldValue {
            fn from(value: $t) -> Self {
                FieldValue::Long(i64::from(value))
            }
        })*
    };
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for FieldValue {
            fn from(value: $t) -> Self {
                FieldValue::UnsignedLong(u64::from(value))
            }
        })*
    };
}

impl_from_signed!(i8, i16, i32, i64);
impl_from_unsigned!(u8, u16, u32, u64);

impl From<f32> for FieldValue {
    fn from(value: f32) -> Self {
        FieldValue::Float(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Double(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<&String> for FieldValue {
    fn from(value: &String) -> Self {
        FieldValue::String(value.clone())
    }
}
