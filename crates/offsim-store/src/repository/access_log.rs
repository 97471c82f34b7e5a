//! Append-only in-memory implementation of [`AccessLogRepository`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use offsim_core::error::SimResult;
use offsim_core::models::access_log::AccessLogEntry;
use offsim_core::repository::{AccessLogRepository, PaginatedResult, Pagination};
use parking_lot::RwLock;

use super::paginate;

#[derive(Debug, Clone, Default)]
pub struct MemoryAccessLogRepository {
    entries: Arc<RwLock<Vec<AccessLogEntry>>>,
}

impl MemoryAccessLogRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AccessLogRepository for MemoryAccessLogRepository {
    fn append(&self, entries: Vec<AccessLogEntry>) -> SimResult<()> {
        self.entries.write().extend(entries);
        Ok(())
    }

    fn list(&self, pagination: Pagination) -> SimResult<PaginatedResult<AccessLogEntry>> {
        Ok(paginate(&self.entries.read(), &pagination))
    }

    fn list_all(&self) -> SimResult<Vec<AccessLogEntry>> {
        Ok(self.entries.read().clone())
    }

    fn count_since(&self, since: DateTime<Utc>) -> u64 {
        self.entries
            .read()
            .iter()
            .filter(|e| e.timestamp >= since)
            .count() as u64
    }

    fn count(&self) -> u64 {
        self.entries.read().len() as u64
    }
}
