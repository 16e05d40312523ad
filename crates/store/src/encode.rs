//! Batch serialization
//!
//! Serializes a batch of metrics as newline-delimited JSON into a
//! pooled byte buffer: each metric is one self-contained line, never a
//! wrapping array, so the sink can stream-parse the payload.

use bytes::{BufMut, BytesMut};

use crate::error::Result;
use crate::metric::Metric;

/// Append each metric as one JSON line
///
/// A serialization failure on any metric aborts the whole batch; the
/// caller discards the partially written buffer by releasing it to the
/// pool unsent.
pub(crate) fn encode_metrics(buf: &mut BytesMut, metrics: &[Metric]) -> Result<()> {
    for metric in metrics {
        serde_json::to_writer((&mut *buf).writer(), metric)?;
        buf.put_u8(b'\n');
    }
    Ok(())
}
