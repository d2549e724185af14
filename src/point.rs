//! Immutable points and their builder.
//!
//! A [`Point`] is a cheap-to-clone snapshot. Every `with_*` method returns a
//! new point and leaves the receiver untouched, copying the underlying data
//! only when it is shared. A [`PointBuilder`] accumulates the same data in
//! place and hands out independent snapshots.
//!
//! ```
//! use influxdb_point::{Point, WritePrecision};
//!
//! let point = Point::new("h2o")?
//!     .with_tag("location", "europe")
//!     .with_field("level", 2i64)?
//!     .with_timestamp(123i64);
//!
//! assert_eq!(
//!     point.to_line_protocol(WritePrecision::Ns),
//!     "h2o,location=europe level=2i 123"
//! );
//! # Ok::<(), influxdb_point::Error>(())
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::line_protocol;
use crate::options::WriteOptions;
use crate::timestamp::Timestamp;
use crate::types::WritePrecision;
use crate::value::FieldValue;
use crate::values::PointValues;

/// An immutable point: measurement, tags, fields and an optional timestamp.
///
/// The measurement is always non-empty.
#[derive(Clone, Debug, PartialEq)]
pub struct Point {
    values: Arc<PointValues>,
}

impl Point {
    /// Create a point with the given measurement. Fails if it is empty.
    pub fn new(measurement: impl Into<String>) -> Result<Self> {
        let mut values = PointValues::new();
        values.set_measurement(measurement)?;
        Ok(Self::from_values(values))
    }

    /// Callers guarantee `values` carries a measurement.
    pub(crate) fn from_values(values: PointValues) -> Self {
        Self {
            values: Arc::new(values),
        }
    }

    fn update(&self, f: impl FnOnce(&mut PointValues)) -> Self {
        let mut next = self.clone();
        f(Arc::make_mut(&mut next.values));
        next
    }

    fn try_update(&self, f: impl FnOnce(&mut PointValues) -> Result<()>) -> Result<Self> {
        let mut next = self.clone();
        f(Arc::make_mut(&mut next.values))?;
        Ok(next)
    }

    /// The measurement name.
    pub fn measurement(&self) -> &str {
        self.values.measurement().unwrap_or_default()
    }

    /// A copy of this point with another measurement. Fails if it is empty.
    pub fn with_measurement(&self, measurement: impl Into<String>) -> Result<Self> {
        let measurement = measurement.into();
        self.try_update(|v| v.set_measurement(measurement).map(|_| ()))
    }

    /// Get a tag value by key.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.values.tag(key)
    }

    /// Tag keys in ascending order.
    pub fn tag_names(&self) -> impl Iterator<Item = &str> {
        self.values.tag_names()
    }

    /// A copy of this point with the tag set.
    ///
    /// An empty `value` removes the tag, or does nothing if it is absent.
    pub fn with_tag(&self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        self.update(|v| {
            v.set_tag(key, value);
        })
    }

    /// A copy of this point without the tag.
    pub fn remove_tag(&self, key: &str) -> Self {
        self.update(|v| {
            v.remove_tag(key);
        })
    }

    /// Get a field by key.
    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        self.values.field(key)
    }

    /// Get a `Double` field.
    pub fn double_field(&self, key: &str) -> Option<f64> {
        self.values.double_field(key)
    }

    /// Get a `Long` field.
    pub fn long_field(&self, key: &str) -> Option<i64> {
        self.values.long_field(key)
    }

    /// Get a `Float` field.
    pub fn float_field(&self, key: &str) -> Option<f32> {
        self.values.float_field(key)
    }

    /// Get an `UnsignedLong` field.
    pub fn unsigned_long_field(&self, key: &str) -> Option<u64> {
        self.values.unsigned_long_field(key)
    }

    /// Get a string field.
    pub fn string_field(&self, key: &str) -> Option<&str> {
        self.values.string_field(key)
    }

    /// Get a `Bool` field.
    pub fn bool_field(&self, key: &str) -> Option<bool> {
        self.values.bool_field(key)
    }

    /// Field keys in ascending order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.values.field_names()
    }

    /// A copy of this point with the field set, replacing any field of the same key.
    ///
    /// Fails if `key` is empty.
    pub fn with_field(&self, key: impl Into<String>, value: impl Into<FieldValue>) -> Result<Self> {
        let key = key.into();
        let value = value.into();
        self.try_update(|v| v.set_field(key, value).map(|_| ()))
    }

    /// A copy of this point without the field.
    pub fn remove_field(&self, key: &str) -> Self {
        self.update(|v| {
            v.remove_field(key);
        })
    }

    /// True if at least one field is set, including NaN or infinite ones.
    pub fn has_fields(&self) -> bool {
        self.values.has_fields()
    }

    /// The timestamp, if set.
    pub fn timestamp(&self) -> Option<Timestamp> {
        self.values.timestamp()
    }

    /// A copy of this point with the timestamp set.
    ///
    /// Integers are nanoseconds; see [`Point::with_timestamp_precision`] for
    /// other units.
    pub fn with_timestamp(&self, timestamp: impl Into<Timestamp>) -> Self {
        let timestamp = timestamp.into();
        self.update(|v| {
            v.set_timestamp(timestamp);
        })
    }

    /// A copy of this point with the timestamp set from `value` in `precision` units.
    pub fn with_timestamp_precision(&self, value: i64, precision: WritePrecision) -> Self {
        self.with_timestamp(Timestamp::from_precision(value, precision))
    }

    /// The underlying data.
    pub fn values(&self) -> &PointValues {
        &self.values
    }

    /// An owned, mutable copy of the underlying data.
    pub fn to_values(&self) -> PointValues {
        PointValues::clone(&self.values)
    }

    /// Encode as a line protocol line at `precision`.
    ///
    /// Returns an empty string when no finite field remains; such a point must
    /// not be written.
    pub fn to_line_protocol(&self, precision: WritePrecision) -> String {
        line_protocol::encode(self, &BTreeMap::new(), precision)
    }

    /// Encode with the precision and default tags from `options`.
    pub fn to_line_protocol_with(&self, options: &WriteOptions) -> String {
        line_protocol::encode(self, &options.default_tags, options.precision)
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_line_protocol(WritePrecision::Ns))
    }
}

/// Mutable accumulator producing [`Point`] snapshots.
///
/// Each call to [`PointBuilder::build`] returns an independent point; later
/// mutations of the builder do not affect points already built.
#[derive(Clone, Debug)]
pub struct PointBuilder {
    values: PointValues,
}

impl PointBuilder {
    /// Start a builder for `measurement`. Fails if it is empty.
    pub fn new(measurement: impl Into<String>) -> Result<Self> {
        let mut values = PointValues::new();
        values.set_measurement(measurement)?;
        Ok(Self { values })
    }

    /// Set a tag; an empty `value` removes it.
    pub fn tag(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.values.set_tag(key, value);
        self
    }

    /// Set a field, replacing any field of the same key. Fails if `key` is empty.
    pub fn field(
        &mut self,
        key: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Result<&mut Self> {
        self.values.set_field(key, value)?;
        Ok(self)
    }

    /// Set the timestamp.
    pub fn timestamp(&mut self, timestamp: impl Into<Timestamp>) -> &mut Self {
        self.values.set_timestamp(timestamp);
        self
    }

    /// Set the timestamp from `value` in `precision` units.
    pub fn timestamp_precision(&mut self, value: i64, precision: WritePrecision) -> &mut Self {
        self.values
            .set_timestamp(Timestamp::from_precision(value, precision));
        self
    }

    /// True if at least one field is set.
    pub fn has_fields(&self) -> bool {
        self.values.has_fields()
    }

    /// Snapshot the current state.
    pub fn build(&self) -> Point {
        Point::from_values(self.values.clone())
    }
}

impl TryFrom<PointValues> for Point {
    type Error = Error;

    fn try_from(values: PointValues) -> Result<Self> {
        values.as_point(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Construction tests
    // =========================================================================

    #[test]
    fn test_new_rejects_empty_measurement() {
        let err = Point::new("").unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert!(PointBuilder::new("").is_err());
    }

    #[test]
    fn test_with_field_rejects_empty_key() {
        let point = Point::new("h2o").unwrap();
        assert!(matches!(
            point.with_field("", 1i64).unwrap_err(),
            Error::InvalidArgument(_)
        ));
    }

    #[test]
    fn test_with_measurement() {
        let point = Point::new("h2o").unwrap();
        let renamed = point.with_measurement("co2").unwrap();
        assert_eq!(renamed.measurement(), "co2");
        assert_eq!(point.measurement(), "h2o");
        assert!(point.with_measurement("").is_err());
    }

    // =========================================================================
    // Copy-on-write tests
    // =========================================================================

    #[test]
    fn test_with_tag_leaves_original_untouched() {
        let base = Point::new("h2o").unwrap();
        let one = base.with_tag("x", "1");
        let two = base.with_tag("x", "2");

        assert_eq!(one.tag("x"), Some("1"));
        assert_eq!(two.tag("x"), Some("2"));
        assert_eq!(base.tag("x"), None);
        assert_ne!(one, two);
    }

    #[test]
    fn test_with_field_last_write_wins() {
        let point = Point::new("h2o")
            .unwrap()
            .with_field("level", 2i64)
            .unwrap()
            .with_field("level", 3i64)
            .unwrap();
        assert_eq!(point.long_field("level"), Some(3));
    }

    #[test]
    fn test_typed_field_getters() {
        let point = Point::new("h2o")
            .unwrap()
            .with_field("f", 0.5f32)
            .unwrap()
            .with_field("d", 0.5f64)
            .unwrap();

        assert_eq!(point.float_field("f"), Some(0.5));
        assert_eq!(point.double_field("f"), None);
        assert_eq!(point.double_field("d"), Some(0.5));
        assert_eq!(point.float_field("d"), None);
    }

    #[test]
    fn test_empty_tag_value_removes() {
        let point = Point::new("h2o")
            .unwrap()
            .with_tag("location", "europe")
            .with_tag("log", "to_delete")
            .with_tag("log", "");
        assert_eq!(point.tag_names().collect::<Vec<_>>(), vec!["location"]);

        let unchanged = point.with_tag("missing", "");
        assert_eq!(unchanged, point);
    }

    #[test]
    fn test_remove_returns_new_point() {
        let point = Point::new("h2o")
            .unwrap()
            .with_tag("host", "a")
            .with_field("value", 1.0)
            .unwrap();
        let stripped = point.remove_tag("host").remove_field("value");

        assert!(!stripped.has_fields());
        assert_eq!(stripped.tag("host"), None);
        assert!(point.has_fields());
        assert_eq!(point.tag("host"), Some("a"));
    }

    #[test]
    fn test_timestamp_precision() {
        let point = Point::new("h2o")
            .unwrap()
            .with_timestamp_precision(123, WritePrecision::S);
        assert_eq!(point.timestamp(), Some(Timestamp::from_nanos(123_000_000_000)));
    }

    #[test]
    fn test_to_values_is_detached() {
        let point = Point::new("h2o").unwrap().with_field("a", 1i64).unwrap();
        let mut values = point.to_values();
        values.set_field("a", 2i64).unwrap();

        assert_eq!(point.long_field("a"), Some(1));
        assert_eq!(values.long_field("a"), Some(2));
    }

    #[test]
    fn test_try_from_values() {
        let mut values = PointValues::new();
        assert!(Point::try_from(values.clone()).is_err());
        values.set_measurement("cpu").unwrap();
        assert_eq!(Point::try_from(values).unwrap().measurement(), "cpu");
    }

    // =========================================================================
    // Builder tests
    // =========================================================================

    #[test]
    fn test_builder_snapshots_are_independent() {
        let mut builder = PointBuilder::new("h2o").unwrap();
        builder.tag("location", "europe");
        builder.field("level", 1i64).unwrap();
        let first = builder.build();

        builder.field("level", 2i64).unwrap().tag("location", "");
        let second = builder.build();

        assert_eq!(first.long_field("level"), Some(1));
        assert_eq!(first.tag("location"), Some("europe"));
        assert_eq!(second.long_field("level"), Some(2));
        assert_eq!(second.tag("location"), None);
    }

    #[test]
    fn test_builder_has_fields() {
        let mut builder = PointBuilder::new("h2o").unwrap();
        assert!(!builder.has_fields());
        builder.field("value", f64::INFINITY).unwrap();
        assert!(builder.has_fields());
    }

    #[test]
    fn test_builder_timestamp() {
        let mut builder = PointBuilder::new("h2o").unwrap();
        builder.timestamp_precision(5, WritePrecision::Ms);
        assert_eq!(
            builder.build().timestamp(),
            Some(Timestamp::from_nanos(5_000_000))
        );
    }

    #[test]
    fn test_point_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Point>();
    }
}
