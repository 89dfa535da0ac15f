//! Wearable sensor logger CLI
//!
//! Background collection of accelerometer and heart-rate readings with
//! periodic CSV export.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use wear_sensor_logger::{
    config::Config,
    duty_cycle::DutyCycleScheduler,
    pipeline::Pipeline,
    source::{RateHint, SensorSource, SimulatedSource, SimulatedSourceConfig, StreamKind},
    VERSION,
};

#[derive(Parser)]
#[command(name = "wear-logger")]
#[command(version = VERSION)]
#[command(about = "Background sensor logger with duty-cycled sampling and CSV export", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start collecting sensor data (runs until Ctrl+C)
    Start {
        /// Base directory for exported files (defaults to the configured data path)
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Export interval in seconds (defaults to the configured interval)
        #[arg(long)]
        export_interval: Option<u64>,

        /// Pretend the device has no accelerometer
        #[arg(long)]
        no_accelerometer: bool,

        /// Pretend the device has no heart-rate sensor
        #[arg(long)]
        no_heart_rate: bool,
    },

    /// Show current configuration and exported file counts
    Status,

    /// Show configuration
    Config,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Start {
            data_dir,
            export_interval,
            no_accelerometer,
            no_heart_rate,
        } => {
            cmd_start(data_dir, export_interval, no_accelerometer, no_heart_rate);
        }
        Commands::Status => {
            cmd_status();
        }
        Commands::Config => {
            cmd_config();
        }
    }
}

fn cmd_start(
    data_dir: Option<PathBuf>,
    export_interval: Option<u64>,
    no_accelerometer: bool,
    no_heart_rate: bool,
) {
    println!("Wearable Sensor Logger v{VERSION}");
    println!();

    // Load or create configuration, with CLI overrides
    let mut config = Config::load().unwrap_or_default();
    if let Some(dir) = data_dir {
        config.data_path = dir;
    }
    if let Some(secs) = export_interval {
        config.export_interval = Duration::from_secs(secs);
    }
    if let Err(e) = config.ensure_directories() {
        eprintln!("Warning: Could not create directories: {e}");
    }

    println!("Starting collection...");
    println!("  Data path: {:?}", config.data_path);
    println!("  Export interval: {}s", config.export_interval.as_secs());
    println!(
        "  Heart-rate duty cycle: {}s on / {}s off",
        config.duty_active_window.as_secs(),
        config.duty_rest_window.as_secs()
    );
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    // Stands in for the device sensor subsystem
    let source: Arc<dyn SensorSource> = Arc::new(SimulatedSource::new(SimulatedSourceConfig {
        accelerometer_present: !no_accelerometer,
        heart_rate_present: !no_heart_rate,
    }));

    // The accelerometer has no duty cycle: subscribed for the whole run
    let accelerometer_on = match source.subscribe(StreamKind::Accelerometer, RateHint::Normal) {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "accelerometer unavailable, stream skipped");
            false
        }
    };

    let mut pipeline = Pipeline::new(&config.data_path, config.export_interval);
    let mut scheduler = DutyCycleScheduler::start(source.clone(), config.duty_cycle());

    // Set up Ctrl+C handler
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl+C handler");

    let mut accelerometer_readings: u64 = 0;
    let mut heart_rate_readings: u64 = 0;

    // Main event loop: the single consumer of all buffer and export state
    let receiver = source.receiver().clone();
    while running.load(Ordering::SeqCst) {
        match receiver.recv_timeout(Duration::from_millis(100)) {
            Ok(reading) => {
                match reading.kind {
                    StreamKind::Accelerometer => accelerometer_readings += 1,
                    StreamKind::HeartRate => heart_rate_readings += 1,
                }
                pipeline.handle_reading(&reading);
            }
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => {}
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => {
                warn!("sensor source disconnected unexpectedly");
                break;
            }
        }
    }

    // Shutdown: final export first, then sensor teardown
    println!();
    println!("Stopping collection...");
    info!("final export before teardown");
    let written = pipeline.export_now();

    if accelerometer_on {
        source.unsubscribe(StreamKind::Accelerometer);
    }
    scheduler.stop();

    println!();
    println!("Session summary:");
    println!("  Accelerometer readings: {accelerometer_readings}");
    println!("  Heart-rate readings: {heart_rate_readings}");
    println!("  Files written at shutdown: {}", written.len());
    for path in &written {
        println!("    {}", path.display());
    }
}

fn cmd_status() {
    let config = Config::load().unwrap_or_default();

    println!("Wearable Sensor Logger Status");
    println!("=============================");
    println!();
    println!("Configuration:");
    println!("  Data path: {:?}", config.data_path);
    println!("  Export interval: {}s", config.export_interval.as_secs());
    println!(
        "  Heart-rate duty cycle: {}s on / {}s off (initial delay {}s)",
        config.duty_active_window.as_secs(),
        config.duty_rest_window.as_secs(),
        config.duty_initial_delay.as_secs()
    );
    println!();

    // Count exported files per stream
    let export_dir = config.data_path.join("SensorData");
    let files: Vec<PathBuf> = std::fs::read_dir(&export_dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| p.extension().map(|e| e == "csv").unwrap_or(false))
                .collect()
        })
        .unwrap_or_default();

    if files.is_empty() {
        println!("No exported data found in {export_dir:?}");
        println!("Run 'wear-logger start' to begin collecting data.");
        return;
    }

    let count_for = |prefix: &str| {
        files
            .iter()
            .filter(|p| {
                p.file_name()
                    .map(|n| n.to_string_lossy().starts_with(prefix))
                    .unwrap_or(false)
            })
            .count()
    };

    println!("Exported files in {export_dir:?}:");
    println!("  Accelerometer: {}", count_for("accelerometer_"));
    println!("  Heart rate: {}", count_for("heart_rate_"));
}

fn cmd_config() {
    let config = Config::load().unwrap_or_default();

    println!("Configuration");
    println!("=============");
    println!();
    println!("Config file: {:?}", Config::config_path());
    println!();
    println!(
        "{}",
        serde_json::to_string_pretty(&config).unwrap_or_else(|_| "Error".to_string())
    );
}
