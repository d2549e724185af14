//! # influxdb-point
//!
//! Points for InfluxDB: build them, encode them as line protocol, and decode
//! them back out of Arrow query results.
//!
//! ## Writing
//!
//! ```
//! use influxdb_point::{Point, WritePrecision};
//!
//! let point = Point::new("h2o")?
//!     .with_tag("location", "coyote creek")
//!     .with_field("level", 8.5f64)?
//!     .with_field("ok", true)?
//!     .with_timestamp_precision(1_700_000_000, WritePrecision::S);
//!
//! assert_eq!(
//!     point.to_line_protocol(WritePrecision::S),
//!     r"h2o,location=coyote\ creek level=8.5,ok=true 1700000000"
//! );
//! # Ok::<(), influxdb_point::Error>(())
//! ```
//!
//! An empty string from [`Point::to_line_protocol`] means the point has no
//! writable field (all NaN or infinite) and must not be sent.
//!
//! ## Reading
//!
//! ```ignore
//! use influxdb_point::points;
//!
//! // `batch` is an Arrow RecordBatch from an InfluxDB 3 SQL or InfluxQL query
//! for values in points(&batch) {
//!     let point = values.as_point(None)?;
//!     println!("{}", point.to_line_protocol(WritePrecision::Ns));
//! }
//! ```
//!
//! Columns are interpreted through the `iox::column::type` schema metadata.
//! Values that disagree with their declared type are kept as they are and a
//! warning is logged through `tracing`; decoding never fails.
//!
//! ## Features
//!
//! - **Immutable points**: [`Point`] is copy-on-write and safe to share
//! - **Exact encoding**: escaping, numeric suffixes and timestamp scaling
//!   follow the line protocol rules
//! - **No overflow**: timestamps are `i128` nanoseconds
//! - **Lenient decoding**: schema drift degrades to pass-through, not errors
//! - **Streaming**: [`point_stream`] decodes batches lazily as they arrive

pub mod converter;
pub mod decode;
pub mod error;
pub mod line_protocol;
pub mod options;
pub mod point;
pub mod resolver;
pub mod stream;
pub mod timestamp;
pub mod types;
pub mod value;
pub mod values;

// Re-export main types at crate root
pub use converter::{RecordBatchPoints, points, to_point_values};
pub use error::{Error, Result};
pub use options::WriteOptions;
pub use point::{Point, PointBuilder};
pub use stream::{collect_points, point_stream};
pub use timestamp::{Timestamp, WallClock};
pub use types::{ColumnType, FieldType, WritePrecision};
pub use value::{FieldValue, Value};
pub use values::PointValues;
