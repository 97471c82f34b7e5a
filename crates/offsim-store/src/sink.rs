//! Line-delimited log sinks.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use offsim_core::error::SimResult;
use offsim_core::sink::{LogRecord, LogStream, RecordSink};
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::error::StoreError;

/// Where and how log streams are written.
#[derive(Debug, Clone)]
pub struct SinkConfig {
    /// Directory holding one file per stream.
    pub log_dir: PathBuf,
    /// Append to existing files instead of truncating them.
    pub append: bool,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("logs"),
            append: true,
        }
    }
}

/// Writes every stream to its own file under the log directory.
pub struct FileSink {
    log_dir: PathBuf,
    writers: Mutex<BTreeMap<LogStream, BufWriter<File>>>,
}

impl FileSink {
    /// Create the log directory and open one file per stream.
    pub fn open(config: &SinkConfig) -> Result<Self, StoreError> {
        info!(log_dir = %config.log_dir.display(), append = config.append, "Opening log sink");

        fs::create_dir_all(&config.log_dir)?;

        let mut writers = BTreeMap::new();
        for stream in LogStream::ALL {
            let path = config.log_dir.join(stream.file_name());
            let file = OpenOptions::new()
                .create(true)
                .write(true)
                .append(config.append)
                .truncate(!config.append)
                .open(&path)?;
            writers.insert(stream, BufWriter::new(file));
        }

        Ok(Self {
            log_dir: config.log_dir.clone(),
            writers: Mutex::new(writers),
        })
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn path(&self, stream: LogStream) -> PathBuf {
        self.log_dir.join(stream.file_name())
    }
}

impl RecordSink for FileSink {
    fn emit(&self, record: LogRecord) -> SimResult<()> {
        let line = record.render()?;
        let mut writers = self.writers.lock();
        let writer = writers
            .get_mut(&record.stream())
            .ok_or_else(|| StoreError::NotFound {
                entity: "log_stream".into(),
                id: record.stream().to_string(),
            })?;
        writeln!(writer, "{line}").map_err(StoreError::from)?;
        Ok(())
    }

    fn flush(&self) -> SimResult<()> {
        let mut writers = self.writers.lock();
        for writer in writers.values_mut() {
            writer.flush().map_err(StoreError::from)?;
        }
        debug!(log_dir = %self.log_dir.display(), "Flushed log sink");
        Ok(())
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        for writer in self.writers.get_mut().values_mut() {
            let _ = writer.flush();
        }
    }
}

/// Keeps records in memory.
#[derive(Default)]
pub struct MemorySink {
    records: Mutex<Vec<LogRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().clone()
    }

    /// Rendered lines of one stream.
    pub fn lines(&self, stream: LogStream) -> Vec<String> {
        self.records
            .lock()
            .iter()
            .filter(|r| r.stream() == stream)
            .filter_map(|r| r.render().ok())
            .collect()
    }

    pub fn count(&self, stream: LogStream) -> usize {
        self.records
            .lock()
            .iter()
            .filter(|r| r.stream() == stream)
            .count()
    }
}

impl RecordSink for MemorySink {
    fn emit(&self, record: LogRecord) -> SimResult<()> {
        // Render eagerly so malformed payloads fail at the call site.
        record.render()?;
        self.records.lock().push(record);
        Ok(())
    }

    fn flush(&self) -> SimResult<()> {
        Ok(())
    }
}
