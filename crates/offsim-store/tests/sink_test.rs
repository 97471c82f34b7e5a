//! Integration tests for the file and memory sinks.

use std::fs;

use chrono::{TimeZone, Utc};
use offsim_core::sink::{Level, LogRecord, LogStream, RecordSink};
use offsim_store::{FileSink, MemorySink, SinkConfig};
use serde_json::json;

fn config(dir: &tempfile::TempDir, append: bool) -> SinkConfig {
    SinkConfig {
        log_dir: dir.path().join("logs"),
        append,
    }
}

#[test]
fn file_sink_creates_one_file_per_stream() {
    let dir = tempfile::tempdir().unwrap();
    let sink = FileSink::open(&config(&dir, true)).unwrap();

    for stream in LogStream::ALL {
        assert!(sink.path(stream).exists(), "{}", stream.file_name());
    }
    assert_eq!(sink.log_dir(), dir.path().join("logs"));
}

#[test]
fn file_sink_writes_json_and_text_lines() {
    let dir = tempfile::tempdir().unwrap();
    let sink = FileSink::open(&config(&dir, true)).unwrap();
    let at = Utc.with_ymd_and_hms(2025, 6, 4, 9, 30, 0).unwrap();

    sink.emit(LogRecord::json(
        LogStream::SystemAccess,
        at,
        json!({"user_id": "EMP100001", "system": "email"}),
    ))
    .unwrap();
    sink.emit(LogRecord::text(
        LogStream::AccountManagement,
        at,
        Level::Warn,
        "Account email:email of EMP100001 left active",
    ))
    .unwrap();
    sink.flush().unwrap();

    let access = fs::read_to_string(sink.path(LogStream::SystemAccess)).unwrap();
    let lines: Vec<&str> = access.lines().collect();
    assert_eq!(lines.len(), 1);
    let value: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(value["log_type"], "SYSTEM_ACCESS");
    assert_eq!(value["user_id"], "EMP100001");

    let accounts = fs::read_to_string(sink.path(LogStream::AccountManagement)).unwrap();
    assert_eq!(
        accounts.trim_end(),
        "2025-06-04 09:30:00 - account_management - WARNING - Account email:email of EMP100001 left active"
    );
}

#[test]
fn reopening_appends_or_truncates() {
    let dir = tempfile::tempdir().unwrap();
    let at = Utc.with_ymd_and_hms(2025, 6, 4, 9, 30, 0).unwrap();
    let write_one = |append: bool| {
        let sink = FileSink::open(&config(&dir, append)).unwrap();
        sink.emit(LogRecord::text(LogStream::Error, at, Level::Error, "boom"))
            .unwrap();
        sink.flush().unwrap();
        sink.path(LogStream::Error)
    };

    write_one(true);
    let path = write_one(true);
    assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 2);

    let path = write_one(false);
    assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 1);
}

#[test]
fn dropping_the_sink_flushes() {
    let dir = tempfile::tempdir().unwrap();
    let at = Utc.with_ymd_and_hms(2025, 6, 4, 9, 30, 0).unwrap();
    let path = {
        let sink = FileSink::open(&config(&dir, true)).unwrap();
        sink.emit(LogRecord::json(LogStream::HrDatabase, at, json!({"operation": "noop"})))
            .unwrap();
        sink.path(LogStream::HrDatabase)
    };
    assert_eq!(fs::read_to_string(path).unwrap().lines().count(), 1);
}

#[test]
fn memory_sink_filters_by_stream() {
    let sink = MemorySink::new();
    let at = Utc.with_ymd_and_hms(2025, 6, 4, 9, 30, 0).unwrap();
    sink.emit(LogRecord::json(LogStream::SystemAccess, at, json!({"n": 1})))
        .unwrap();
    sink.emit(LogRecord::json(LogStream::SystemAccess, at, json!({"n": 2})))
        .unwrap();
    sink.emit(LogRecord::text(LogStream::Performance, at, Level::Info, "ok"))
        .unwrap();

    assert_eq!(sink.count(LogStream::SystemAccess), 2);
    assert_eq!(sink.count(LogStream::Performance), 1);
    assert_eq!(sink.count(LogStream::Error), 0);
    assert_eq!(sink.records().len(), 3);
    assert!(sink.lines(LogStream::Performance)[0].ends_with(" - INFO - ok"));
}
