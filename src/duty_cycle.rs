//! Duty-cycle scheduler for the heart-rate stream.
//!
//! Heart-rate sensing is power-hungry, so the stream is only subscribed for
//! a short active window out of every period; the accelerometer stays on for
//! the whole run. The scheduler waits on a shutdown channel instead of
//! sleeping, so cancellation takes effect immediately even mid-window.

use crate::source::{RateHint, SensorSource, StreamKind};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, warn};

/// Timing of the heart-rate duty cycle.
#[derive(Debug, Clone)]
pub struct DutyCycleConfig {
    /// Delay before the first active window
    pub initial_delay: Duration,
    /// How long the heart-rate stream stays subscribed each period
    pub active_window: Duration,
    /// Rest between active windows
    pub rest_window: Duration,
}

impl Default for DutyCycleConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(3),
            active_window: Duration::from_secs(10),
            rest_window: Duration::from_secs(5),
        }
    }
}

impl DutyCycleConfig {
    /// Full cycle length (active + rest).
    pub fn period(&self) -> Duration {
        self.active_window + self.rest_window
    }
}

/// Background thread toggling the heart-rate subscription.
pub struct DutyCycleScheduler {
    shutdown_tx: Sender<()>,
    handle: Option<JoinHandle<()>>,
}

impl DutyCycleScheduler {
    /// Start the scheduler on its own thread.
    pub fn start(source: Arc<dyn SensorSource>, config: DutyCycleConfig) -> Self {
        let (shutdown_tx, shutdown_rx) = bounded(1);
        let handle = thread::spawn(move || run_cycle(source, config, shutdown_rx));
        Self {
            shutdown_tx,
            handle: Some(handle),
        }
    }

    /// Cancel the scheduler without waiting out an in-flight window.
    ///
    /// The shutdown path forces the heart-rate unsubscribe; a window that
    /// was active is simply abandoned early.
    pub fn stop(&mut self) {
        let _ = self.shutdown_tx.try_send(());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for DutyCycleScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Wait for `timeout` or a shutdown signal. Returns true when cancelled.
fn cancelled(shutdown: &Receiver<()>, timeout: Duration) -> bool {
    match shutdown.recv_timeout(timeout) {
        Ok(()) => true,
        Err(RecvTimeoutError::Timeout) => false,
        Err(RecvTimeoutError::Disconnected) => true,
    }
}

fn run_cycle(source: Arc<dyn SensorSource>, config: DutyCycleConfig, shutdown: Receiver<()>) {
    if cancelled(&shutdown, config.initial_delay) {
        return;
    }

    loop {
        match source.subscribe(StreamKind::HeartRate, RateHint::Normal) {
            Ok(()) => {
                debug!("heart rate window open");
                let stopped = cancelled(&shutdown, config.active_window);
                source.unsubscribe(StreamKind::HeartRate);
                debug!("heart rate window closed");
                if stopped {
                    return;
                }
            }
            Err(e) => {
                // Retry timer-driven on the next period, indefinitely
                warn!(error = %e, "heart rate subscribe failed, retrying next period");
                if cancelled(&shutdown, config.active_window) {
                    return;
                }
            }
        }

        if cancelled(&shutdown, config.rest_window) {
            return;
        }
    }
}
