//! Wearable sensor logger - background collection of accelerometer and
//! heart-rate streams with periodic CSV export.
//!
//! The accelerometer stream is sampled continuously; the heart-rate stream
//! is duty-cycled (short active windows on a fixed period) to limit power
//! draw. Readings are formatted into per-stream buffers and flushed to
//! timestamped CSV files when the export interval elapses, plus once more at
//! shutdown.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Wearable Sensor Logger                   │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐   ┌──────────────┐   ┌──────────────┐       │
//! │  │SensorSource │──▶│   Pipeline   │──▶│  CsvExporter │       │
//! │  │  (readings) │   │ (buffers +   │   │ (SensorData/ │       │
//! │  └─────────────┘   │  trigger)    │   │   *.csv)     │       │
//! │         ▲          └──────────────┘   └──────────────┘       │
//! │         │                                                    │
//! │  ┌─────────────┐                                             │
//! │  │ Duty-cycle  │  subscribe/unsubscribe heart rate only      │
//! │  │ scheduler   │                                             │
//! │  └─────────────┘                                             │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use wear_sensor_logger::{
//!     duty_cycle::{DutyCycleConfig, DutyCycleScheduler},
//!     pipeline::Pipeline,
//!     source::{RateHint, SensorSource, SimulatedSource, SimulatedSourceConfig, StreamKind},
//! };
//!
//! let source = Arc::new(SimulatedSource::new(SimulatedSourceConfig::default()));
//! source
//!     .subscribe(StreamKind::Accelerometer, RateHint::Normal)
//!     .expect("no accelerometer");
//!
//! let mut pipeline = Pipeline::new(std::path::Path::new("./data"), std::time::Duration::from_secs(3600));
//! let mut scheduler = DutyCycleScheduler::start(source.clone(), DutyCycleConfig::default());
//!
//! // Readings arrive on source.receiver() and are fed to pipeline.handle_reading().
//! # scheduler.stop();
//! ```

pub mod config;
pub mod duty_cycle;
pub mod pipeline;
pub mod source;

// Re-export key types at crate root for convenience
pub use config::{Config, ConfigError};
pub use duty_cycle::{DutyCycleConfig, DutyCycleScheduler};
pub use pipeline::{CsvExporter, ExportError, Pipeline, StreamBuffer};
pub use source::{RateHint, Reading, SensorSource, SimulatedSource, SourceError, StreamKind};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
