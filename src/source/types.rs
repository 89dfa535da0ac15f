//! Reading and stream types shared by all sensor sources.
//!
//! Every reading carries an explicit [`StreamKind`] tag so downstream code
//! dispatches on an enum rather than on driver-reported type strings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which physical sensor a reading originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StreamKind {
    Accelerometer,
    HeartRate,
}

impl StreamKind {
    /// Stream name used in export filenames.
    pub fn name(&self) -> &'static str {
        match self {
            StreamKind::Accelerometer => "accelerometer",
            StreamKind::HeartRate => "heart_rate",
        }
    }
}

impl std::fmt::Display for StreamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Requested delivery rate, mirroring the driver delay classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RateHint {
    Normal,
    Ui,
    Game,
    Fastest,
}

impl RateHint {
    /// Nominal interval between readings for this rate class.
    pub fn interval(&self) -> std::time::Duration {
        match self {
            RateHint::Normal => std::time::Duration::from_millis(200),
            RateHint::Ui => std::time::Duration::from_millis(60),
            RateHint::Game => std::time::Duration::from_millis(20),
            RateHint::Fastest => std::time::Duration::from_millis(5),
        }
    }
}

/// A single timestamped multi-channel sensor reading.
///
/// Immutable once produced. The accelerometer delivers a driver-determined
/// number of channels (three on typical hardware); heart rate delivers one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reading {
    /// Timestamp when the reading was produced
    pub timestamp: DateTime<Utc>,
    /// Which sensor stream this reading belongs to
    pub kind: StreamKind,
    /// Channel values in driver order
    pub values: Vec<f64>,
}

impl Reading {
    /// Create a reading stamped with the current time.
    pub fn now(kind: StreamKind, values: Vec<f64>) -> Self {
        Self {
            timestamp: Utc::now(),
            kind,
            values,
        }
    }
}

/// Errors reported by a sensor source at subscribe time.
#[derive(Debug)]
pub enum SourceError {
    /// The requested sensor does not exist on this device.
    SensorNotPresent(StreamKind),
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceError::SensorNotPresent(kind) => {
                write!(f, "no {kind} sensor found on this device")
            }
        }
    }
}

impl std::error::Error for SourceError {}
