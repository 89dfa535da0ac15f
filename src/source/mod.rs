//! Sensor source abstraction for the wearable sensor logger.
//!
//! A [`SensorSource`] is the boundary to the host's sensor subsystem: the
//! pipeline subscribes to streams and receives [`Reading`]s over a bounded
//! channel. The crate ships a [`SimulatedSource`] so the logger can run
//! end-to-end on hardware without the wearable's sensor drivers.

pub mod simulated;
pub mod types;

// Re-export commonly used types
pub use simulated::{SimulatedSource, SimulatedSourceConfig};
pub use types::{RateHint, Reading, SourceError, StreamKind};

use crossbeam_channel::Receiver;

/// Boundary to the host sensor subsystem.
///
/// Implementations deliver readings for every currently subscribed stream on
/// the channel returned by [`receiver`](SensorSource::receiver). Subscribe
/// and unsubscribe may be called from any thread; the duty-cycle scheduler
/// toggles the heart-rate stream while the event loop drains readings.
pub trait SensorSource: Send + Sync {
    /// Begin delivery of readings for one stream.
    ///
    /// Returns [`SourceError::SensorNotPresent`] if the device lacks the
    /// sensor. Subscribing an already-subscribed stream is a no-op.
    fn subscribe(&self, kind: StreamKind, rate: RateHint) -> Result<(), SourceError>;

    /// Stop delivery of readings for one stream. Idempotent.
    fn unsubscribe(&self, kind: StreamKind);

    /// Channel on which readings for all subscribed streams arrive.
    fn receiver(&self) -> &Receiver<Reading>;
}
