//! Conversion of Arrow record batch rows into point values.
//!
//! Each column is routed by its schema metadata (`iox::column::type`):
//! tags go to the tag set, timestamps to the timestamp slot, measurements to
//! the measurement name and everything else to the fields. Columns without
//! metadata are fields, except a wall-clock column named `time`, which is the
//! timestamp. A string column named `measurement` or `iox::measurement`
//! always names the measurement.

use arrow_array::RecordBatch;
use arrow_schema::Schema;
use tracing::warn;

use crate::decode::column_value;
use crate::resolver::resolve;
use crate::timestamp::Timestamp;
use crate::types::{COLUMN_TYPE_KEY, ColumnType};
use crate::value::{FieldValue, Value};
use crate::values::PointValues;

/// Column names that carry the measurement name.
pub const MEASUREMENT_COLUMNS: [&str; 2] = ["measurement", "iox::measurement"];

/// Decode row `row` of `batch`. Returns `None` if the row is out of bounds.
pub fn to_point_values(batch: &RecordBatch, row: usize) -> Option<PointValues> {
    if row >= batch.num_rows() {
        return None;
    }
    let layout = BatchLayout::new(batch.schema_ref());
    Some(layout.decode_row(batch, row))
}

/// Iterate over every row of `batch` as point values.
pub fn points(batch: &RecordBatch) -> RecordBatchPoints<'_> {
    RecordBatchPoints::new(batch)
}

/// Iterator decoding the rows of one record batch, in order.
///
/// Column metadata is parsed once, when the iterator is created.
pub struct RecordBatchPoints<'a> {
    batch: &'a RecordBatch,
    layout: BatchLayout,
    row: usize,
}

impl<'a> RecordBatchPoints<'a> {
    /// Create an iterator over `batch`.
    pub fn new(batch: &'a RecordBatch) -> Self {
        Self {
            batch,
            layout: BatchLayout::new(batch.schema_ref()),
            row: 0,
        }
    }
}

impl Iterator for RecordBatchPoints<'_> {
    type Item = PointValues;

    fn next(&mut self) -> Option<Self::Item> {
        if self.row >= self.batch.num_rows() {
            return None;
        }
        let values = self.layout.decode_row(self.batch, self.row);
        self.row += 1;
        Some(values)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.batch.num_rows().saturating_sub(self.row);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for RecordBatchPoints<'_> {}

/// How each column of a schema is routed.
struct BatchLayout {
    columns: Vec<ColumnLayout>,
}

struct ColumnLayout {
    name: String,
    measurement_alias: bool,
    column_type: Option<ColumnType>,
}

impl BatchLayout {
    fn new(schema: &Schema) -> Self {
        let columns = schema
            .fields()
            .iter()
            .map(|field| {
                let name = field.name().clone();
                let column_type = field
                    .metadata()
                    .get(COLUMN_TYPE_KEY)
                    .map(|meta| match meta.parse::<ColumnType>() {
                        Ok(column_type) => column_type,
                        Err(e) => {
                            warn!(
                                column = %name,
                                metadata = %meta,
                                error = %e,
                                "unrecognized column type, treating column as a field"
                            );
                            ColumnType::Field(None)
                        }
                    });
                ColumnLayout {
                    measurement_alias: MEASUREMENT_COLUMNS.contains(&name.as_str()),
                    name,
                    column_type,
                }
            })
            .collect();
        Self { columns }
    }

    fn decode_row(&self, batch: &RecordBatch, row: usize) -> PointValues {
        let mut point = PointValues::new();
        for (column, array) in self.columns.iter().zip(batch.columns()) {
            let raw = column_value(array.as_ref(), row);

            if column.measurement_alias {
                if let Value::String(measurement) = &raw {
                    set_measurement(&mut point, &column.name, measurement);
                    continue;
                }
            }

            let value = resolve(column.column_type, &column.name, raw);
            match column.column_type {
                None => match value {
                    Value::EpochNanos(nanos) => {
                        point.set_timestamp(Timestamp::from_nanos(nanos));
                    }
                    other => set_field(&mut point, &column.name, other),
                },
                Some(ColumnType::Field(_)) => set_field(&mut point, &column.name, value),
                Some(ColumnType::Tag) => match value {
                    Value::Null => {}
                    Value::String(tag) => {
                        point.set_tag(column.name.as_str(), tag);
                    }
                    other => {
                        point.set_tag(column.name.as_str(), other.to_string());
                    }
                },
                Some(ColumnType::Timestamp) => match value {
                    Value::Null => {}
                    Value::EpochNanos(nanos) => {
                        point.set_timestamp(Timestamp::from_nanos(nanos));
                    }
                    other => warn!(
                        column = %column.name,
                        value = ?other,
                        "timestamp column does not hold a wall clock, skipping"
                    ),
                },
                Some(ColumnType::Measurement) => match value {
                    Value::Null => {}
                    other => set_measurement(&mut point, &column.name, &other.to_string()),
                },
            }
        }
        point
    }
}

fn set_field(point: &mut PointValues, column: &str, value: Value) {
    let Some(field) = FieldValue::from_value(value) else {
        return;
    };
    if let Err(e) = point.set_field(column, field) {
        warn!(column = %column, error = %e, "skipping field column");
    }
}

fn set_measurement(point: &mut PointValues, column: &str, measurement: &str) {
    if let Err(e) = point.set_measurement(measurement) {
        warn!(column = %column, error = %e, "skipping measurement column");
    }
}
