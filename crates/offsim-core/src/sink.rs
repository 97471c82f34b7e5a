//! Output record streams.
//!
//! Generators hand finished records to a [`RecordSink`]; the store crate
//! decides where the lines end up.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

use crate::CONFIG_VERSION;
use crate::error::SimResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RecordFormat {
    Json,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogStream {
    HrDatabase,
    SystemAccess,
    AuditMonitor,
    SecurityEvents,
    AccountManagement,
    ViolationAlert,
    DataSync,
    DataCollection,
    Performance,
    Error,
}

impl LogStream {
    pub const ALL: [LogStream; 10] = [
        LogStream::HrDatabase,
        LogStream::SystemAccess,
        LogStream::AuditMonitor,
        LogStream::SecurityEvents,
        LogStream::AccountManagement,
        LogStream::ViolationAlert,
        LogStream::DataSync,
        LogStream::DataCollection,
        LogStream::Performance,
        LogStream::Error,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            LogStream::HrDatabase => "hr_database.log",
            LogStream::SystemAccess => "system_access.log",
            LogStream::AuditMonitor => "audit_monitor.log",
            LogStream::SecurityEvents => "security_events.log",
            LogStream::AccountManagement => "account_management.log",
            LogStream::ViolationAlert => "violation_alert.log",
            LogStream::DataSync => "data_sync.log",
            LogStream::DataCollection => "data_collection.log",
            LogStream::Performance => "performance.log",
            LogStream::Error => "error.log",
        }
    }

    pub fn format(&self) -> RecordFormat {
        match self {
            LogStream::HrDatabase
            | LogStream::SystemAccess
            | LogStream::AuditMonitor
            | LogStream::SecurityEvents => RecordFormat::Json,
            _ => RecordFormat::Text,
        }
    }

    /// Tag written into the `log_type` field / text prefix.
    pub fn log_type(&self) -> &'static str {
        match self {
            LogStream::HrDatabase => "HR_DATABASE",
            LogStream::SystemAccess => "SYSTEM_ACCESS",
            LogStream::AuditMonitor => "AUDIT_EVENT",
            LogStream::SecurityEvents => "SECURITY_EVENT",
            LogStream::AccountManagement => "account_management",
            LogStream::ViolationAlert => "violation_alert",
            LogStream::DataSync => "data_sync",
            LogStream::DataCollection => "data_collection",
            LogStream::Performance => "performance",
            LogStream::Error => "error",
        }
    }
}

impl fmt::Display for LogStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.log_type())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Level::Info => "INFO",
            Level::Warn => "WARNING",
            Level::Error => "ERROR",
        })
    }
}

#[derive(Debug, Clone)]
pub enum LogRecord {
    Json {
        stream: LogStream,
        timestamp: DateTime<Utc>,
        payload: Value,
    },
    Text {
        stream: LogStream,
        timestamp: DateTime<Utc>,
        level: Level,
        message: String,
    },
}

impl LogRecord {
    pub fn json(stream: LogStream, timestamp: DateTime<Utc>, payload: Value) -> Self {
        LogRecord::Json {
            stream,
            timestamp,
            payload,
        }
    }

    pub fn text(
        stream: LogStream,
        timestamp: DateTime<Utc>,
        level: Level,
        message: impl Into<String>,
    ) -> Self {
        LogRecord::Text {
            stream,
            timestamp,
            level,
            message: message.into(),
        }
    }

    pub fn stream(&self) -> LogStream {
        match self {
            LogRecord::Json { stream, .. } | LogRecord::Text { stream, .. } => *stream,
        }
    }

    /// Render the record as a single line (no trailing newline).
    ///
    /// JSON records carry `timestamp`, `log_type` and `config_version`
    /// followed by the payload's fields; a non-object payload is nested
    /// under `payload`.
    pub fn render(&self) -> SimResult<String> {
        match self {
            LogRecord::Json {
                stream,
                timestamp,
                payload,
            } => {
                let mut object = Map::new();
                object.insert(
                    "timestamp".into(),
                    Value::String(timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)),
                );
                object.insert("log_type".into(), Value::String(stream.log_type().into()));
                object.insert("config_version".into(), Value::String(CONFIG_VERSION.into()));
                match payload {
                    Value::Object(fields) => {
                        for (key, value) in fields {
                            object.insert(key.clone(), value.clone());
                        }
                    }
                    other => {
                        object.insert("payload".into(), other.clone());
                    }
                }
                Ok(serde_json::to_string(&Value::Object(object))?)
            }
            LogRecord::Text {
                stream,
                timestamp,
                level,
                message,
            } => Ok(format!(
                "{} - {} - {} - {}",
                timestamp.format("%Y-%m-%d %H:%M:%S"),
                stream,
                level,
                message
            )),
        }
    }
}

pub trait RecordSink: Send + Sync {
    fn emit(&self, record: LogRecord) -> SimResult<()>;
    fn flush(&self) -> SimResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 4, 9, 30, 0).unwrap()
    }

    #[test]
    fn json_record_carries_envelope_fields() {
        let record = LogRecord::json(
            LogStream::HrDatabase,
            ts(),
            json!({"employee_id": "EMP000001", "action": "onboarded"}),
        );
        let line = record.render().unwrap();
        let value: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["log_type"], "HR_DATABASE");
        assert_eq!(value["config_version"], CONFIG_VERSION);
        assert_eq!(value["employee_id"], "EMP000001");
        assert_eq!(value["timestamp"], "2025-06-04T09:30:00.000Z");
    }

    #[test]
    fn scalar_payload_is_nested() {
        let record = LogRecord::json(LogStream::AuditMonitor, ts(), json!(42));
        let value: Value = serde_json::from_str(&record.render().unwrap()).unwrap();
        assert_eq!(value["payload"], 42);
    }

    #[test]
    fn text_record_format() {
        let record = LogRecord::text(LogStream::DataSync, ts(), Level::Info, "sync ok");
        assert_eq!(
            record.render().unwrap(),
            "2025-06-04 09:30:00 - data_sync - INFO - sync ok"
        );
    }

    #[test]
    fn json_streams_are_the_structured_ones() {
        let json: Vec<_> = LogStream::ALL
            .iter()
            .filter(|s| s.format() == RecordFormat::Json)
            .collect();
        assert_eq!(json.len(), 4);
    }
}
