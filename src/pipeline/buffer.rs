//! Per-stream record buffers and CSV record formatting.
//!
//! Each reading is formatted at append time; a buffer holds finished record
//! lines until the next export clears it.

use crate::source::{Reading, StreamKind};
use chrono::{DateTime, Local, Utc};

/// Timestamp format used both inside records and in export filenames.
pub(crate) const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H:%M:%S";

/// Render a timestamp in local time, matching the on-disk format.
pub(crate) fn local_timestamp(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format(TIMESTAMP_FORMAT).to_string()
}

/// Format one reading as a CSV record line.
///
/// Accelerometer records keep a trailing comma after the last channel
/// (`ts,x,y,z,`); heart-rate records carry the single channel with no
/// trailing comma. Channel values use shortest-round-trip rendering that
/// keeps a decimal point on integral values (1.0 stays `1.0`).
pub fn format_record(reading: &Reading) -> String {
    let ts = local_timestamp(reading.timestamp);
    match reading.kind {
        StreamKind::Accelerometer => {
            let mut line = ts;
            line.push(',');
            for value in &reading.values {
                line.push_str(&format!("{value:?},"));
            }
            line.push('\n');
            line
        }
        StreamKind::HeartRate => match reading.values.first() {
            Some(value) => format!("{ts},{value:?}\n"),
            None => format!("{ts},\n"),
        },
    }
}

/// Growable store of formatted record lines for one stream.
///
/// Owned exclusively by the pipeline; appends never block and there is no
/// size bound between exports other than memory.
#[derive(Debug)]
pub struct StreamBuffer {
    kind: StreamKind,
    records: Vec<String>,
}

impl StreamBuffer {
    /// Create an empty buffer for one stream.
    pub fn new(kind: StreamKind) -> Self {
        Self {
            kind,
            records: Vec::new(),
        }
    }

    /// Which stream this buffer accumulates.
    pub fn kind(&self) -> StreamKind {
        self.kind
    }

    /// Format and append one reading.
    pub fn push(&mut self, reading: &Reading) {
        debug_assert_eq!(reading.kind, self.kind);
        self.records.push(format_record(reading));
    }

    /// Number of buffered records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the buffer holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Concatenated file content for export. Empty string when empty.
    pub fn contents(&self) -> String {
        self.records.concat()
    }

    /// Drop all buffered records, keeping the allocation.
    pub fn clear(&mut self) {
        self.records.clear();
    }
}
