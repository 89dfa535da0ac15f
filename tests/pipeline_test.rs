//! End-to-end tests for the sampling-buffer-export pipeline.

use chrono::{DateTime, Local, TimeZone, Utc};
use std::path::PathBuf;
use std::time::Duration;
use wear_sensor_logger::{Pipeline, Reading, StreamKind};

fn test_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir()
        .join("wear-sensor-logger-test")
        .join(format!("it-{}-{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

fn ts(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_760_000_000 + secs, 0).unwrap()
}

fn local_stamp(t: DateTime<Utc>) -> String {
    t.with_timezone(&Local)
        .format("%Y-%m-%d_%H:%M:%S")
        .to_string()
}

fn accel(secs: i64, values: Vec<f64>) -> Reading {
    Reading {
        timestamp: ts(secs),
        kind: StreamKind::Accelerometer,
        values,
    }
}

#[test]
fn shutdown_export_writes_buffered_readings() {
    // Three accelerometer readings, then shutdown before the periodic
    // trigger ever fires: one file per stream, stamped with the shutdown
    // instant, with one CSV line per reading in arrival order.
    let base = test_dir("shutdown");
    let mut pipeline = Pipeline::new(&base, Duration::from_secs(3600));

    pipeline.handle_reading(&accel(0, vec![1.0, 2.0, 3.0]));
    pipeline.handle_reading(&accel(1, vec![1.1, 2.1, 3.1]));
    pipeline.handle_reading(&accel(2, vec![1.2, 2.2, 3.2]));

    let shutdown = ts(10);
    let written = pipeline.export_at(shutdown);
    assert_eq!(written.len(), 2);

    let accel_path = base
        .join("SensorData")
        .join(format!("accelerometer_{}.csv", local_stamp(shutdown)));
    let content = std::fs::read_to_string(&accel_path).unwrap();
    assert_eq!(
        content,
        format!(
            "{},1.0,2.0,3.0,\n{},1.1,2.1,3.1,\n{},1.2,2.2,3.2,\n",
            local_stamp(ts(0)),
            local_stamp(ts(1)),
            local_stamp(ts(2))
        )
    );

    // Zero heart-rate readings still export as an empty file
    let hr_path = base
        .join("SensorData")
        .join(format!("heart_rate_{}.csv", local_stamp(shutdown)));
    assert_eq!(std::fs::read_to_string(&hr_path).unwrap(), "");

    // Export cleared everything
    assert_eq!(pipeline.buffered(StreamKind::Accelerometer), 0);
    assert_eq!(pipeline.buffered(StreamKind::HeartRate), 0);
}

#[test]
fn one_line_per_reading_in_order() {
    let base = test_dir("ordering");
    let mut pipeline = Pipeline::new(&base, Duration::from_secs(3600));

    let count = 25;
    for i in 0..count {
        pipeline.handle_reading(&accel(i, vec![i as f64, 0.5, 9.8]));
    }

    let written = pipeline.export_at(ts(100));
    let accel_file = written
        .iter()
        .find(|p| p.to_string_lossy().contains("accelerometer_"))
        .expect("accelerometer file written");

    let content = std::fs::read_to_string(accel_file).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), count as usize);
    for (i, line) in lines.iter().enumerate() {
        let expected_prefix = format!("{},{:?},", local_stamp(ts(i as i64)), i as f64);
        assert!(
            line.starts_with(&expected_prefix),
            "line {i} was {line:?}, expected prefix {expected_prefix:?}"
        );
        assert!(line.ends_with(','), "accelerometer line keeps trailing comma");
    }
    assert!(content.ends_with('\n'), "trailing newline per record");
}

#[test]
fn readings_split_cleanly_across_exports() {
    // Nothing is both exported and retained, and nothing is lost: readings
    // appended after an export only appear in the next one.
    let base = test_dir("split");
    let mut pipeline = Pipeline::new(&base, Duration::from_secs(3600));

    pipeline.handle_reading(&accel(0, vec![1.0, 1.0, 1.0]));
    let first = pipeline.export_at(ts(5));

    pipeline.handle_reading(&accel(6, vec![2.0, 2.0, 2.0]));
    let second = pipeline.export_at(ts(10));

    let file_of = |paths: &[PathBuf]| {
        paths
            .iter()
            .find(|p| p.to_string_lossy().contains("accelerometer_"))
            .cloned()
            .expect("accelerometer file")
    };

    let first_content = std::fs::read_to_string(file_of(&first)).unwrap();
    let second_content = std::fs::read_to_string(file_of(&second)).unwrap();

    assert_eq!(first_content.lines().count(), 1);
    assert_eq!(second_content.lines().count(), 1);
    assert!(first_content.contains(",1.0,1.0,1.0,"));
    assert!(second_content.contains(",2.0,2.0,2.0,"));
    assert!(!second_content.contains(",1.0,1.0,1.0,"));
}

#[test]
fn periodic_trigger_exports_on_the_event_path() {
    let base = test_dir("periodic");
    let mut pipeline = Pipeline::new(&base, Duration::from_secs(60));

    pipeline.handle_reading(&accel(0, vec![0.0, 0.0, 9.8]));
    pipeline.handle_reading(&accel(30, vec![0.1, 0.0, 9.8]));
    // This reading crosses the interval and pays the export latency itself
    pipeline.handle_reading(&accel(61, vec![0.2, 0.0, 9.8]));

    assert_eq!(pipeline.buffered(StreamKind::Accelerometer), 0);
    assert_eq!(pipeline.last_export(), Some(ts(61)));

    let exported = base
        .join("SensorData")
        .join(format!("accelerometer_{}.csv", local_stamp(ts(61))));
    let content = std::fs::read_to_string(&exported).unwrap();
    // All three readings, including the one that fired the trigger
    assert_eq!(content.lines().count(), 3);
}

#[test]
fn last_export_is_monotonic_across_repeated_exports() {
    let base = test_dir("monotonic-it");
    let mut pipeline = Pipeline::new(&base, Duration::from_secs(3600));

    let mut previous = None;
    for i in 0..5 {
        pipeline.handle_reading(&accel(i * 100, vec![0.0, 0.0, 9.8]));
        let stamp = ts(i * 100 + 50);
        pipeline.export_at(stamp);
        let current = pipeline.last_export().unwrap();
        assert_eq!(current, stamp);
        if let Some(prev) = previous {
            assert!(current > prev);
        }
        previous = Some(current);
    }
}

#[test]
fn heart_rate_records_carry_single_channel() {
    let base = test_dir("heart-rate");
    let mut pipeline = Pipeline::new(&base, Duration::from_secs(3600));

    pipeline.handle_reading(&Reading {
        timestamp: ts(0),
        kind: StreamKind::HeartRate,
        values: vec![68.0],
    });
    pipeline.handle_reading(&Reading {
        timestamp: ts(1),
        kind: StreamKind::HeartRate,
        values: vec![70.5],
    });

    let written = pipeline.export_at(ts(2));
    let hr_file = written
        .iter()
        .find(|p| p.to_string_lossy().contains("heart_rate_"))
        .expect("heart rate file written");

    let content = std::fs::read_to_string(hr_file).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with(",68.0"));
    assert!(lines[1].ends_with(",70.5"));
}
