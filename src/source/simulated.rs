//! Simulated sensor source.
//!
//! Generates deterministic synthetic readings so the logger can run without
//! the wearable's sensor drivers: a gravity-plus-wiggle accelerometer signal
//! and a slow-sine heart rate. Presence of each stream is configurable so
//! the "sensor not present" path can be exercised.

use crate::source::types::{RateHint, Reading, SourceError, StreamKind};
use crate::source::SensorSource;
use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Instant;
use tracing::debug;

/// Which simulated streams exist on the "device".
#[derive(Debug, Clone)]
pub struct SimulatedSourceConfig {
    pub accelerometer_present: bool,
    pub heart_rate_present: bool,
}

impl Default for SimulatedSourceConfig {
    fn default() -> Self {
        Self {
            accelerometer_present: true,
            heart_rate_present: true,
        }
    }
}

/// Per-stream generator state.
struct StreamSlot {
    subscribed: Arc<AtomicBool>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl StreamSlot {
    fn new() -> Self {
        Self {
            subscribed: Arc::new(AtomicBool::new(false)),
            handle: Mutex::new(None),
        }
    }
}

/// A sensor source backed by synthetic signal generators.
pub struct SimulatedSource {
    config: SimulatedSourceConfig,
    sender: Sender<Reading>,
    receiver: Receiver<Reading>,
    accelerometer: StreamSlot,
    heart_rate: StreamSlot,
}

impl SimulatedSource {
    /// Create a new simulated source.
    pub fn new(config: SimulatedSourceConfig) -> Self {
        // Bounded channel to cap memory if the consumer stalls
        let (sender, receiver) = bounded(10_000);
        Self {
            config,
            sender,
            receiver,
            accelerometer: StreamSlot::new(),
            heart_rate: StreamSlot::new(),
        }
    }

    fn slot(&self, kind: StreamKind) -> &StreamSlot {
        match kind {
            StreamKind::Accelerometer => &self.accelerometer,
            StreamKind::HeartRate => &self.heart_rate,
        }
    }

    fn present(&self, kind: StreamKind) -> bool {
        match kind {
            StreamKind::Accelerometer => self.config.accelerometer_present,
            StreamKind::HeartRate => self.config.heart_rate_present,
        }
    }
}

impl SensorSource for SimulatedSource {
    fn subscribe(&self, kind: StreamKind, rate: RateHint) -> Result<(), SourceError> {
        if !self.present(kind) {
            return Err(SourceError::SensorNotPresent(kind));
        }

        let slot = self.slot(kind);
        if slot.subscribed.swap(true, Ordering::SeqCst) {
            // Already delivering for this stream
            return Ok(());
        }

        debug!(stream = %kind, "subscribing simulated stream");

        let subscribed = slot.subscribed.clone();
        let sender = self.sender.clone();
        let interval = rate.interval();

        let handle = thread::spawn(move || {
            let start = Instant::now();
            while subscribed.load(Ordering::SeqCst) {
                let t = start.elapsed().as_secs_f64();
                let reading = Reading::now(kind, synth_values(kind, t));
                // Drop readings rather than block if the consumer stalls
                let _ = sender.try_send(reading);
                thread::sleep(interval);
            }
        });

        *slot.handle.lock().unwrap() = Some(handle);
        Ok(())
    }

    fn unsubscribe(&self, kind: StreamKind) {
        let slot = self.slot(kind);
        if !slot.subscribed.swap(false, Ordering::SeqCst) {
            return;
        }
        debug!(stream = %kind, "unsubscribing simulated stream");
        if let Some(handle) = slot.handle.lock().unwrap().take() {
            let _ = handle.join();
        }
    }

    fn receiver(&self) -> &Receiver<Reading> {
        &self.receiver
    }
}

impl Drop for SimulatedSource {
    fn drop(&mut self) {
        self.unsubscribe(StreamKind::Accelerometer);
        self.unsubscribe(StreamKind::HeartRate);
    }
}

/// Deterministic channel values for a stream at elapsed time `t` seconds.
fn synth_values(kind: StreamKind, t: f64) -> Vec<f64> {
    use std::f64::consts::TAU;
    match kind {
        StreamKind::Accelerometer => vec![
            (TAU * 0.5 * t).sin() * 0.6,
            (TAU * 0.5 * t).cos() * 0.6,
            9.81 + (TAU * 1.3 * t).sin() * 0.2,
        ],
        // Resting rate with a slow one-minute swing
        StreamKind::HeartRate => vec![72.0 + 8.0 * (TAU * t / 60.0).sin()],
    }
}
