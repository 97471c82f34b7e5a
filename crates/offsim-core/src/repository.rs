//! Repository trait definitions for data access abstraction.
//!
//! Employees move between an active and a resigned collection but are
//! never deleted. Access logs, alerts and incidents are append-only.

use chrono::{DateTime, Utc};

use crate::error::SimResult;
use crate::ids::EmployeeId;
use crate::models::{
    access_log::AccessLogEntry,
    alert::{SecurityIncident, ViolationAlert},
    employee::Employee,
    transfer::TransferRecord,
};

/// Pagination parameters for list queries.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

impl Pagination {
    pub fn new(offset: u64, limit: u64) -> Self {
        Self { offset, limit }
    }

    /// The page following this one.
    pub fn next(&self) -> Self {
        Self {
            offset: self.offset + self.limit,
            limit: self.limit,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

impl<T> PaginatedResult<T> {
    pub fn has_more(&self) -> bool {
        self.offset + (self.items.len() as u64) < self.total
    }
}

pub trait EmployeeRepository: Send + Sync {
    /// Insert a new employee. Fails with `AlreadyExists` on id reuse.
    fn insert(&self, employee: Employee) -> SimResult<()>;
    fn get(&self, id: &EmployeeId) -> SimResult<Employee>;
    /// Replace a stored employee, moving it to the resigned collection
    /// once its status is `Resigned`.
    fn update(&self, employee: Employee) -> SimResult<()>;
    fn contains(&self, id: &EmployeeId) -> bool;
    /// Active and resignation-pending employees, ordered by id.
    fn list_active(&self) -> SimResult<Vec<Employee>>;
    /// Resigned employees, ordered by id.
    fn list_resigned(&self) -> SimResult<Vec<Employee>>;
    /// Every employee (active collection first), paginated.
    fn list(&self, pagination: Pagination) -> SimResult<PaginatedResult<Employee>>;
    fn count(&self) -> u64;
}

pub trait TransferRepository: Send + Sync {
    fn create_many(&self, records: Vec<TransferRecord>) -> SimResult<()>;
    fn list_for_employee(&self, employee_id: &EmployeeId) -> SimResult<Vec<TransferRecord>>;
    /// Replace records by id.
    fn update_many(&self, records: Vec<TransferRecord>) -> SimResult<()>;
    fn list(&self, pagination: Pagination) -> SimResult<PaginatedResult<TransferRecord>>;
    fn list_all(&self) -> SimResult<Vec<TransferRecord>>;
}

pub trait AccessLogRepository: Send + Sync {
    fn append(&self, entries: Vec<AccessLogEntry>) -> SimResult<()>;
    fn list(&self, pagination: Pagination) -> SimResult<PaginatedResult<AccessLogEntry>>;
    fn list_all(&self) -> SimResult<Vec<AccessLogEntry>>;
    /// Entries with `timestamp >= since`.
    fn count_since(&self, since: DateTime<Utc>) -> u64;
    fn count(&self) -> u64;
}

pub trait AlertRepository: Send + Sync {
    fn record(&self, alert: ViolationAlert, incident: SecurityIncident) -> SimResult<()>;
    fn list_alerts(&self) -> SimResult<Vec<ViolationAlert>>;
    fn list_incidents(&self) -> SimResult<Vec<SecurityIncident>>;
}
