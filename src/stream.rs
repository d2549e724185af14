//! Streaming decode of record batches into point values.
//!
//! The query transport (Flight, IPC files, tests) owns the batch stream,
//! including its cancellation and backpressure. This module only turns each
//! batch into one [`PointValues`] per row, lazily, as the consumer polls.

use std::pin::Pin;

use arrow_array::RecordBatch;
use async_stream::stream;
use futures::{Stream, StreamExt};
use tracing::debug;

use crate::converter::points;
use crate::error::{Error, Result};
use crate::values::PointValues;

/// Decode a stream of record batches into a stream of point values.
///
/// Rows are yielded in batch order. An upstream error is yielded once and ends
/// the stream.
///
/// # Example
///
/// ```ignore
/// use futures::StreamExt;
/// use influxdb_point::point_stream;
///
/// // `batches` is any `Stream<Item = Result<RecordBatch, E>>`,
/// // e.g. the output of an Arrow Flight `do_get` call.
/// let mut stream = point_stream(batches);
/// while let Some(values) = stream.next().await {
///     let values = values?;
///     let point = values.as_point(None)?;
///     println!("{}", point.to_line_protocol(WritePrecision::Ns));
/// }
/// ```
pub fn point_stream<S, E>(batches: S) -> Pin<Box<dyn Stream<Item = Result<PointValues>> + Send>>
where
    S: Stream<Item = std::result::Result<RecordBatch, E>> + Send + 'static,
    E: Into<Error> + Send + 'static,
{
    let mut batches = Box::pin(batches);

    let s = stream! {
        while let Some(batch) = batches.next().await {
            match batch {
                Ok(batch) => {
                    debug!(
                        rows = batch.num_rows(),
                        columns = batch.num_columns(),
                        "decoding record batch"
                    );
                    for values in points(&batch) {
                        yield Ok(values);
                    }
                }
                Err(e) => {
                    yield Err(e.into());
                    break;
                }
            }
        }
    };

    Box::pin(s)
}

/// Decode a stream of record batches and collect every row.
///
/// **Warning**: This keeps all rows in memory. For large results, use
/// [`point_stream`] and process rows one at a time.
pub async fn collect_points<S, E>(batches: S) -> Result<Vec<PointValues>>
where
    S: Stream<Item = std::result::Result<RecordBatch, E>> + Send + 'static,
    E: Into<Error> + Send + 'static,
{
    let mut stream = point_stream(batches);
    let mut results = Vec::new();

    while let Some(item) = stream.next().await {
        results.push(item?);
    }

    Ok(results)
}
