//! CSV file export.
//!
//! Writes one file per stream per export under `<data_path>/SensorData/`,
//! named `<stream>_<timestamp>.csv`. The whole buffer content goes out in a
//! single blocking write, overwriting any same-named file.

use crate::pipeline::buffer::local_timestamp;
use crate::source::StreamKind;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::info;

/// Subdirectory of the data path that holds exported files.
const EXPORT_DIR_NAME: &str = "SensorData";

/// Errors raised while exporting a buffer to disk.
#[derive(Debug)]
pub enum ExportError {
    /// The export directory could not be created.
    DirectoryCreate(std::io::Error),
    /// Writing a stream file failed.
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::DirectoryCreate(e) => {
                write!(f, "could not create export directory: {e}")
            }
            ExportError::Write { path, source } => {
                write!(f, "could not write {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::DirectoryCreate(e) => Some(e),
            ExportError::Write { source, .. } => Some(source),
        }
    }
}

/// Writes stream buffers to timestamped CSV files.
pub struct CsvExporter {
    dir: PathBuf,
}

impl CsvExporter {
    /// Create an exporter rooted at `<data_path>/SensorData`.
    pub fn new(data_path: &Path) -> Self {
        Self {
            dir: data_path.join(EXPORT_DIR_NAME),
        }
    }

    /// Directory exported files land in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The file a stream export at `stamp` would produce.
    pub fn file_path(&self, kind: StreamKind, stamp: DateTime<Utc>) -> PathBuf {
        self.dir
            .join(format!("{}_{}.csv", kind.name(), local_timestamp(stamp)))
    }

    /// Write one stream's buffer content as a single file.
    ///
    /// The directory is created recursively if missing. An empty buffer
    /// still produces an (empty) file. Returns the path written.
    pub fn write_stream(
        &self,
        kind: StreamKind,
        contents: &str,
        stamp: DateTime<Utc>,
    ) -> Result<PathBuf, ExportError> {
        if !self.dir.is_dir() {
            std::fs::create_dir_all(&self.dir).map_err(ExportError::DirectoryCreate)?;
        }

        let path = self.file_path(kind, stamp);
        std::fs::write(&path, contents).map_err(|source| ExportError::Write {
            path: path.clone(),
            source,
        })?;

        info!(
            stream = %kind,
            path = %path.display(),
            records = contents.lines().count(),
            "export finished"
        );
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join("wear-sensor-logger-test")
            .join(format!("{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_writes_named_file() {
        let base = test_dir("export-basic");
        let exporter = CsvExporter::new(&base);
        let stamp = Utc::now();

        let path = exporter
            .write_stream(StreamKind::HeartRate, "a,1\nb,2\n", stamp)
            .unwrap();

        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("heart_rate_"));
        assert!(name.ends_with(".csv"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a,1\nb,2\n");
    }

    #[test]
    fn test_empty_buffer_still_exports_a_file() {
        let base = test_dir("export-empty");
        let exporter = CsvExporter::new(&base);

        let path = exporter
            .write_stream(StreamKind::HeartRate, "", Utc::now())
            .unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_same_stamp_overwrites() {
        let base = test_dir("export-overwrite");
        let exporter = CsvExporter::new(&base);
        let stamp = Utc::now();

        exporter
            .write_stream(StreamKind::Accelerometer, "old\n", stamp)
            .unwrap();
        let path = exporter
            .write_stream(StreamKind::Accelerometer, "new\n", stamp)
            .unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new\n");
    }

    #[test]
    fn test_directory_create_failure_reported() {
        let base = test_dir("export-blocked");
        std::fs::create_dir_all(&base).unwrap();
        // Occupy the SensorData name with a plain file so create_dir_all fails
        std::fs::write(base.join("SensorData"), "not a directory").unwrap();

        let exporter = CsvExporter::new(&base);
        let err = exporter
            .write_stream(StreamKind::Accelerometer, "x\n", Utc::now())
            .unwrap_err();
        assert!(matches!(err, ExportError::DirectoryCreate(_)));
    }
}
