//! The sampling-buffer-export pipeline.
//!
//! A [`Pipeline`] owns both stream buffers and the export state exclusively;
//! the event loop feeds it readings one at a time, so all buffer and state
//! mutation is serialized on one thread. Exports run synchronously on the
//! event path when the time trigger fires, and once more unconditionally at
//! shutdown.

pub mod buffer;
pub mod export;

pub use buffer::{format_record, StreamBuffer};
pub use export::{CsvExporter, ExportError};

use crate::source::{Reading, StreamKind};
use chrono::{DateTime, Duration, Utc};
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// Buffers, export trigger state, and the CSV writer for both streams.
pub struct Pipeline {
    accelerometer: StreamBuffer,
    heart_rate: StreamBuffer,
    exporter: CsvExporter,
    export_interval: Duration,
    /// Set by the first reading, advanced by every export.
    last_export: Option<DateTime<Utc>>,
}

impl Pipeline {
    /// Create a pipeline exporting under `<data_path>/SensorData`.
    pub fn new(data_path: &Path, export_interval: std::time::Duration) -> Self {
        Self {
            accelerometer: StreamBuffer::new(StreamKind::Accelerometer),
            heart_rate: StreamBuffer::new(StreamKind::HeartRate),
            exporter: CsvExporter::new(data_path),
            export_interval: Duration::from_std(export_interval)
                .unwrap_or_else(|_| Duration::hours(1)),
            last_export: None,
        }
    }

    /// Buffer one reading, then export if the time trigger fires.
    ///
    /// The reading's own timestamp drives the trigger clock; readings are
    /// delivered as they are produced, so it tracks wall time.
    pub fn handle_reading(&mut self, reading: &Reading) {
        // The very first reading of any kind starts the trigger clock.
        if self.last_export.is_none() {
            self.last_export = Some(reading.timestamp);
        }

        match reading.kind {
            StreamKind::Accelerometer => self.accelerometer.push(reading),
            StreamKind::HeartRate => self.heart_rate.push(reading),
        }

        if self.export_due(reading.timestamp) {
            self.export_at(reading.timestamp);
        }
    }

    /// Whether the periodic export trigger has fired as of `now`.
    fn export_due(&self, now: DateTime<Utc>) -> bool {
        match self.last_export {
            Some(last) => now - last > self.export_interval,
            None => false,
        }
    }

    /// Export both buffers using the current time as the shared stamp.
    pub fn export_now(&mut self) -> Vec<PathBuf> {
        self.export_at(Utc::now())
    }

    /// Export both buffers with one shared stamp for filenames and the
    /// trigger clock.
    ///
    /// A successfully written buffer is cleared; on directory or write
    /// failure the buffer is retained so its records go out with the next
    /// export. The trigger clock advances either way, so a persistently
    /// failing disk does not turn every event into an export attempt.
    pub fn export_at(&mut self, now: DateTime<Utc>) -> Vec<PathBuf> {
        debug!(
            accelerometer_records = self.accelerometer.len(),
            heart_rate_records = self.heart_rate.len(),
            "exporting stream buffers"
        );

        let mut written = Vec::new();
        for buffer in [&mut self.accelerometer, &mut self.heart_rate] {
            match self
                .exporter
                .write_stream(buffer.kind(), &buffer.contents(), now)
            {
                Ok(path) => {
                    buffer.clear();
                    written.push(path);
                }
                Err(e) => {
                    error!(stream = %buffer.kind(), error = %e, "export failed, retaining buffer");
                }
            }
        }

        // last_export never moves backwards
        if self.last_export.map_or(true, |last| now >= last) {
            self.last_export = Some(now);
        }
        written
    }

    /// Instant of the last export, if any export (or first reading) happened.
    pub fn last_export(&self) -> Option<DateTime<Utc>> {
        self.last_export
    }

    /// Number of records currently buffered for one stream.
    pub fn buffered(&self, kind: StreamKind) -> usize {
        match kind {
            StreamKind::Accelerometer => self.accelerometer.len(),
            StreamKind::HeartRate => self.heart_rate.len(),
        }
    }

    /// Directory exported files land in.
    pub fn export_dir(&self) -> &Path {
        self.exporter.dir()
    }
}
