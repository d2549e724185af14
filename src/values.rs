//! Mutable point data.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::point::Point;
use crate::timestamp::Timestamp;
use crate::value::FieldValue;

/// Measurement, tags, fields and timestamp of a point, mutated in place.
///
/// This is what a query row decodes into, and what [`Point`] wraps immutably.
/// Tags and fields are kept ordered by key so line protocol output is
/// deterministic. A `PointValues` is plain owned data: share it across tasks
/// only behind your own synchronization.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointValues {
    pub(crate) measurement: Option<String>,
    pub(crate) tags: BTreeMap<String, String>,
    pub(crate) fields: BTreeMap<String, FieldValue>,
    pub(crate) timestamp: Option<Timestamp>,
}

impl PointValues {
    /// Create empty point values without a measurement.
    pub fn new() -> Self {
        Self::default()
    }

    /// The measurement name, if one was set.
    pub fn measurement(&self) -> Option<&str> {
        self.measurement.as_deref()
    }

    /// Set the measurement name. Fails if `measurement` is empty.
    pub fn set_measurement(&mut self, measurement: impl Into<String>) -> Result<&mut Self> {
        let measurement = measurement.into();
        if measurement.is_empty() {
            return Err(Error::invalid_argument("Measurement name cannot be empty"));
        }
        self.measurement = Some(measurement);
        Ok(self)
    }

    /// Get a tag value by key.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    /// Set a tag, replacing any previous value for `key`.
    ///
    /// An empty `value` removes the tag instead.
    pub fn set_tag(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let key = key.into();
        let value = value.into();
        if value.is_empty() {
            self.tags.remove(&key);
        } else {
            self.tags.insert(key, value);
        }
        self
    }

    /// Remove a tag, returning its previous value.
    pub fn remove_tag(&mut self, key: &str) -> Option<String> {
        self.tags.remove(key)
    }

    /// Tag keys in ascending order.
    pub fn tag_names(&self) -> impl Iterator<Item = &str> {
        self.tags.keys().map(String::as_str)
    }

    /// All tags in ascending key order.
    pub fn tags(&self) -> &BTreeMap<String, String> {
        &self.tags
    }

    /// Get a field by key.
    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// Get a `Double` field.
    pub fn double_field(&self, key: &str) -> Option<f64> {
        self.field(key).and_then(FieldValue::as_double)
    }

    /// Get a `Float` field.
    pub fn float_field(&self, key: &str) -> Option<f32> {
        self.field(key).and_then(FieldValue::as_float)
    }

    /// Get a `Long` field.
    pub fn long_field(&self, key: &str) -> Option<i64> {
        self.field(key).and_then(FieldValue::as_long)
    }

    /// Get an `UnsignedLong` field.
    pub fn unsigned_long_field(&self, key: &str) -> Option<u64> {
        self.field(key).and_then(FieldValue::as_unsigned_long)
    }

    /// Get a string field.
    pub fn string_field(&self, key: &str) -> Option<&str> {
        self.field(key).and_then(FieldValue::as_string)
    }

    /// Get a `Bool` field.
    pub fn bool_field(&self, key: &str) -> Option<bool> {
        self.field(key).and_then(FieldValue::as_bool)
    }

    /// Set a field, replacing any previous value (and kind) for `key`.
    ///
    /// Fails if `key` is empty.
    pub fn set_field(
        &mut self,
        key: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Result<&mut Self> {
        let key = key.into();
        if key.is_empty() {
            return Err(Error::invalid_argument("Field name cannot be empty"));
        }
        self.fields.insert(key, value.into());
        Ok(self)
    }

    /// Remove a field, returning its previous value.
    pub fn remove_field(&mut self, key: &str) -> Option<FieldValue> {
        self.fields.remove(key)
    }

    /// Field keys in ascending order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// All fields in ascending key order.
    pub fn fields(&self) -> &BTreeMap<String, FieldValue> {
        &self.fields
    }

    /// True if at least one field is set, including NaN or infinite ones.
    pub fn has_fields(&self) -> bool {
        !self.fields.is_empty()
    }

    /// The timestamp, if one was set.
    pub fn timestamp(&self) -> Option<Timestamp> {
        self.timestamp
    }

    /// Set the timestamp.
    pub fn set_timestamp(&mut self, timestamp: impl Into<Timestamp>) -> &mut Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// Clear the timestamp.
    pub fn clear_timestamp(&mut self) -> &mut Self {
        self.timestamp = None;
        self
    }

    /// Snapshot these values as an immutable [`Point`].
    ///
    /// `measurement` overrides the stored measurement. Fails if neither is set.
    pub fn as_point(&self, measurement: Option<&str>) -> Result<Point> {
        let mut values = self.clone();
        match measurement {
            Some(m) => {
                values.set_measurement(m)?;
            }
            None if values.measurement.is_none() => {
                return Err(Error::invalid_argument("Missing measurement"));
            }
            None => {}
        }
        Ok(Point::from_values(values))
    }
}
