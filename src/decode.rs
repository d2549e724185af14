//! Extraction of raw values from Arrow arrays.

use arrow_array::Array;
use arrow_array::cast::AsArray;
use arrow_array::types::{
    Date32Type, Date64Type, DurationMicrosecondType, DurationMillisecondType,
    DurationNanosecondType, DurationSecondType, Float16Type, Float32Type, Float64Type, Int8Type,
    Int16Type, Int32Type, Int64Type, TimestampMicrosecondType, TimestampMillisecondType,
    TimestampNanosecondType, TimestampSecondType, UInt8Type, UInt16Type, UInt32Type, UInt64Type,
};
use arrow_schema::{DataType, TimeUnit};
use chrono::{DateTime, FixedOffset};
use ordered_float::OrderedFloat;
use tracing::warn;

use crate::timestamp::WallClock;
use crate::value::Value;

const SECONDS_PER_DAY: i64 = 86_400;

/// Read the value at `row` of `array`.
///
/// Null cells, out-of-range temporal values and unsupported Arrow types all
/// decode to [`Value::Null`]; the latter two are logged.
pub fn column_value(array: &dyn Array, row: usize) -> Value {
    if array.is_null(row) {
        return Value::Null;
    }

    match array.data_type() {
        DataType::Null => Value::Null,
        DataType::Boolean => Value::Bool(array.as_boolean().value(row)),
        DataType::Int8 => Value::Int8(array.as_primitive::<Int8Type>().value(row)),
        DataType::Int16 => Value::Int16(array.as_primitive::<Int16Type>().value(row)),
        DataType::Int32 => Value::Int32(array.as_primitive::<Int32Type>().value(row)),
        DataType::Int64 => Value::Long(array.as_primitive::<Int64Type>().value(row)),
        DataType::UInt8 => Value::UInt8(array.as_primitive::<UInt8Type>().value(row)),
        DataType::UInt16 => Value::UInt16(array.as_primitive::<UInt16Type>().value(row)),
        DataType::UInt32 => Value::UInt32(array.as_primitive::<UInt32Type>().value(row)),
        DataType::UInt64 => Value::UnsignedLong(array.as_primitive::<UInt64Type>().value(row)),
        DataType::Float16 => Value::Float(OrderedFloat::from(
            array.as_primitive::<Float16Type>().value(row).to_f32(),
        )),
        DataType::Float32 => Value::Float(OrderedFloat::from(
            array.as_primitive::<Float32Type>().value(row),
        )),
        DataType::Float64 => Value::Double(OrderedFloat::from(
            array.as_primitive::<Float64Type>().value(row),
        )),
        DataType::Utf8 => Value::String(array.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => Value::String(array.as_string::<i64>().value(row).to_string()),
        DataType::Utf8View => Value::String(array.as_string_view().value(row).to_string()),
        DataType::Binary => Value::Binary(array.as_binary::<i32>().value(row).to_vec()),
        DataType::LargeBinary => Value::Binary(array.as_binary::<i64>().value(row).to_vec()),
        DataType::Timestamp(unit, tz) => {
            let raw = match unit {
                TimeUnit::Second => array.as_primitive::<TimestampSecondType>().value(row),
                TimeUnit::Millisecond => {
                    array.as_primitive::<TimestampMillisecondType>().value(row)
                }
                TimeUnit::Microsecond => {
                    array.as_primitive::<TimestampMicrosecondType>().value(row)
                }
                TimeUnit::Nanosecond => {
                    array.as_primitive::<TimestampNanosecondType>().value(row)
                }
            };
            temporal(wall_clock(raw, unit, tz.as_deref()), array.data_type())
        }
        DataType::Date32 => {
            let days = i64::from(array.as_primitive::<Date32Type>().value(row));
            let utc = DateTime::from_timestamp(days * SECONDS_PER_DAY, 0);
            temporal(utc.map(|t| WallClock::Naive(t.naive_utc())), array.data_type())
        }
        DataType::Date64 => {
            let millis = array.as_primitive::<Date64Type>().value(row);
            let utc = DateTime::from_timestamp_millis(millis);
            temporal(utc.map(|t| WallClock::Naive(t.naive_utc())), array.data_type())
        }
        DataType::Duration(unit) => {
            let duration = match unit {
                TimeUnit::Second => chrono::Duration::try_seconds(
                    array.as_primitive::<DurationSecondType>().value(row),
                ),
                TimeUnit::Millisecond => chrono::Duration::try_milliseconds(
                    array.as_primitive::<DurationMillisecondType>().value(row),
                ),
                TimeUnit::Microsecond => Some(chrono::Duration::microseconds(
                    array.as_primitive::<DurationMicrosecondType>().value(row),
                )),
                TimeUnit::Nanosecond => Some(chrono::Duration::nanoseconds(
                    array.as_primitive::<DurationNanosecondType>().value(row),
                )),
            };
            match duration {
                Some(d) => Value::Duration(d),
                None => {
                    warn!(data_type = %array.data_type(), "duration out of range");
                    Value::Null
                }
            }
        }
        DataType::Dictionary(key_type, _) => dictionary_value(array, key_type, row),
        other => {
            warn!(data_type = %other, "unsupported column type");
            Value::Null
        }
    }
}

/// Resolve a dictionary-encoded cell through its key.
fn dictionary_value(array: &dyn Array, key_type: &DataType, row: usize) -> Value {
    macro_rules! lookup {
        ($key:ty) => {{
            let dict = array.as_dictionary::<$key>();
            match dict.key(row) {
                Some(key) => column_value(dict.values().as_ref(), key),
                None => Value::Null,
            }
        }};
    }

    match key_type {
        DataType::Int8 => lookup!(Int8Type),
        DataType::Int16 => lookup!(Int16Type),
        DataType::Int32 => lookup!(Int32Type),
        DataType::Int64 => lookup!(Int64Type),
        DataType::UInt8 => lookup!(UInt8Type),
        DataType::UInt16 => lookup!(UInt16Type),
        DataType::UInt32 => lookup!(UInt32Type),
        DataType::UInt64 => lookup!(UInt64Type),
        other => {
            warn!(key_type = %other, "unsupported dictionary key type");
            Value::Null
        }
    }
}

/// Build the wall clock for a raw Arrow timestamp.
///
/// Without a zone the clock numbers are naive. A fixed, non-zero offset
/// yields a zoned value; any other zone is an instant in UTC.
fn wall_clock(raw: i64, unit: &TimeUnit, tz: Option<&str>) -> Option<WallClock> {
    let utc = match unit {
        TimeUnit::Second => DateTime::from_timestamp(raw, 0)?,
        TimeUnit::Millisecond => DateTime::from_timestamp_millis(raw)?,
        TimeUnit::Microsecond => DateTime::from_timestamp_micros(raw)?,
        TimeUnit::Nanosecond => DateTime::from_timestamp_nanos(raw),
    };

    let clock = match tz {
        None => WallClock::Naive(utc.naive_utc()),
        Some(tz) => match tz.parse::<FixedOffset>() {
            Ok(offset) if offset.local_minus_utc() != 0 => {
                WallClock::Zoned(utc.with_timezone(&offset))
            }
            _ => WallClock::Utc(utc),
        },
    };
    Some(clock)
}

fn temporal(clock: Option<WallClock>, data_type: &DataType) -> Value {
    match clock {
        Some(clock) => Value::Time(clock),
        None => {
            warn!(data_type = %data_type, "temporal value out of range");
            Value::Null
        }
    }
}
