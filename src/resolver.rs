//! Coercion of raw column values to the type their metadata declares.
//!
//! Resolution never fails. When a value does not match its declared type it
//! is returned unchanged and a warning is logged, so a server-side schema
//! change cannot break decoding.

use std::fmt::Display;

use tracing::warn;

use crate::timestamp::nano_time;
use crate::types::{ColumnType, FieldType};
use crate::value::Value;

/// Column treated as the point timestamp when it carries no metadata.
pub const TIME_COLUMN: &str = "time";

// 2^63 and 2^64, the first floats past the i64 and u64 ranges.
const I64_UPPER: f64 = 9_223_372_036_854_775_808.0;
const U64_UPPER: f64 = 18_446_744_073_709_551_616.0;

/// Coerce `value` according to `column_type`.
///
/// * Declared field types convert numeric values to `Long`, `UnsignedLong`
///   or `Double`, and check strings and booleans.
/// * Timestamp columns, and metadata-less columns named [`TIME_COLUMN`],
///   turn wall clocks into [`Value::EpochNanos`].
/// * Anything else passes through unchanged.
pub fn resolve(column_type: Option<ColumnType>, column_name: &str, value: Value) -> Value {
    if value.is_null() {
        return value;
    }

    match column_type {
        None => match value {
            Value::Time(clock) if column_name == TIME_COLUMN => {
                Value::EpochNanos(nano_time(&clock))
            }
            other => other,
        },
        Some(ColumnType::Timestamp) => match value {
            Value::Time(clock) => Value::EpochNanos(nano_time(&clock)),
            other => mismatch(column_name, "timestamp", other),
        },
        Some(ColumnType::Field(Some(field_type))) => resolve_field(field_type, column_name, value),
        Some(ColumnType::Field(None) | ColumnType::Tag | ColumnType::Measurement) => value,
    }
}

fn resolve_field(field_type: FieldType, column_name: &str, value: Value) -> Value {
    match field_type {
        FieldType::Integer => match to_long(&value) {
            Some(i) => Value::Long(i),
            None => mismatch(column_name, field_type, value),
        },
        FieldType::UInteger => match to_unsigned_long(&value) {
            Some(u) => Value::UnsignedLong(u),
            None => mismatch(column_name, field_type, value),
        },
        FieldType::Float => match to_double(&value) {
            Some(d) => Value::Double(d.into()),
            None => mismatch(column_name, field_type, value),
        },
        FieldType::String => match value {
            Value::String(_) => value,
            other => mismatch(column_name, field_type, other),
        },
        FieldType::Boolean => match value {
            Value::Bool(_) => value,
            other => mismatch(column_name, field_type, other),
        },
    }
}

fn to_long(value: &Value) -> Option<i64> {
    if let Some(i) = value.integer() {
        return i64::try_from(i).ok();
    }
    let f = value.floating()?;
    let rounded = f.round_ties_even();
    (rounded.is_finite() && rounded >= -I64_UPPER && rounded < I64_UPPER).then(|| rounded as i64)
}

fn to_unsigned_long(value: &Value) -> Option<u64> {
    if let Some(i) = value.integer() {
        return u64::try_from(i).ok();
    }
    let f = value.floating()?;
    let rounded = f.round_ties_even();
    (f >= 0.0 && rounded.is_finite() && rounded < U64_UPPER).then(|| rounded as u64)
}

fn to_double(value: &Value) -> Option<f64> {
    value
        .integer()
        .map(|i| i as f64)
        .or_else(|| value.floating())
}

fn mismatch(column_name: &str, expected: impl Display, value: Value) -> Value {
    warn!(
        column = column_name,
        expected = %expected,
        value = ?value,
        "column value does not match its declared type, keeping it unchanged"
    );
    value
}
