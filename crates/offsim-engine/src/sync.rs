//! Batch extraction and scheduled sync.
//!
//! A single flag guards the driver: a request that arrives while a
//! batch is running is skipped, never queued. Durations are simulated
//! and compared against the configured limits.

use std::collections::{BTreeMap, BTreeSet};
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use chrono::{DateTime, Duration, Utc};
use offsim_core::error::SimResult;
use offsim_core::ids::EmployeeId;
use offsim_core::models::access_log::AccessLogEntry;
use offsim_core::models::employee::EmploymentStatus;
use offsim_core::repository::{
    AccessLogRepository, AlertRepository, EmployeeRepository, Pagination, TransferRepository,
};
use offsim_core::sink::{Level, LogRecord, LogStream, RecordSink};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use sha2::{Digest, Sha256};
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::config::SyncConfig;
use crate::consistency::ConsistencyChecker;
use crate::report::SyncStatistics;
use crate::simulation::Simulation;

/// Offset mixed into the simulation seed for the driver's own generator.
const DRIVER_SEED_SALT: u64 = 0x5359_4e43;

/// Raw log lines parsed per system during semi-structured processing.
const SEMI_STRUCTURED_LINES: std::ops::RangeInclusive<u64> = 50_000..=100_000;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SyncKind {
    Full,
    Incremental,
}

/// One extracted batch and its lineage id.
#[derive(Debug, Clone, Serialize)]
pub struct BatchLineage {
    pub stage: &'static str,
    pub batch: u64,
    pub records: u64,
    pub lineage_id: String,
}

/// Raw logs of one system parsed into structured rows.
#[derive(Debug, Clone, Serialize)]
pub struct SystemLogBatch {
    pub system: String,
    pub records: u64,
    pub processing_secs: f64,
    pub lineage_id: String,
}

/// Access log entries selected by a set of account ids.
#[derive(Debug, Clone, Serialize)]
pub struct StructuredExtract {
    /// Requested account ids that resolved to an employee.
    pub accounts: usize,
    pub owners: usize,
    pub records: Vec<AccessLogEntry>,
    pub query_secs: f64,
    pub lineage: BatchLineage,
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncSummary {
    pub kind: SyncKind,
    pub started_at: DateTime<Utc>,
    pub records: u64,
    pub simulated_duration_secs: f64,
    pub time_limit_secs: f64,
    pub within_limit: bool,
    /// Record counts per stage.
    pub stages: BTreeMap<&'static str, u64>,
    pub batches: Vec<BatchLineage>,
    /// Per-system semi-structured processing, full extraction only.
    pub semi_structured: Vec<SystemLogBatch>,
}

#[derive(Debug, Clone, Serialize)]
pub enum SyncOutcome {
    Completed(SyncSummary),
    /// Another batch held the guard.
    Skipped,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Pass,
    Warning,
    Fail,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationCheck {
    pub name: &'static str,
    pub status: CheckStatus,
    pub detail: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationResults {
    pub checks: Vec<ValidationCheck>,
    /// Worst status across the checks.
    pub overall: CheckStatus,
}

/// Releases the driver flag when dropped.
pub struct SyncGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for SyncGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

pub struct SyncDriver {
    config: SyncConfig,
    sink: Arc<dyn RecordSink>,
    running: AtomicBool,
    last_sync: Mutex<Option<DateTime<Utc>>>,
    rng: Mutex<StdRng>,
    completed: AtomicU64,
    skipped: AtomicU64,
}

impl SyncDriver {
    pub fn new(config: SyncConfig, seed: u64, sink: Arc<dyn RecordSink>) -> Self {
        Self {
            config,
            sink,
            running: AtomicBool::new(false),
            last_sync: Mutex::new(None),
            rng: Mutex::new(StdRng::seed_from_u64(seed ^ DRIVER_SEED_SALT)),
            completed: AtomicU64::new(0),
            skipped: AtomicU64::new(0),
        }
    }

    /// Claim the driver, or `None` while another batch holds it.
    pub fn try_begin(&self) -> Option<SyncGuard<'_>> {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SyncGuard {
                flag: &self.running,
            })
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Simulated time of the last batch that finished within its limit.
    pub fn last_sync(&self) -> Option<DateTime<Utc>> {
        *self.last_sync.lock()
    }

    /// Extract every employee, transfer record and access log entry in
    /// pages, then the structured records of departing staff and the
    /// semi-structured logs of every system. Each batch carries a lineage
    /// id.
    pub fn perform_full_extraction<E, T, L, A>(
        &self,
        sim: &Simulation<E, T, L, A>,
    ) -> SimResult<SyncOutcome>
    where
        E: EmployeeRepository,
        T: TransferRepository,
        L: AccessLogRepository,
        A: AlertRepository,
    {
        let now = sim.now();
        let Some(_guard) = self.try_begin() else {
            return self.skip(SyncKind::Full, now);
        };
        info!(started_at = %now, "Full extraction started");

        let mut rng = self.rng.lock();
        let mut batches = Vec::new();
        let mut stages = BTreeMap::new();
        let mut elapsed = 0.0;

        // 1. Employees.
        let mut batch_no = 0;
        let mut page = Pagination::new(0, self.config.employee_batch_size);
        loop {
            let result = sim.employees().list(page.clone())?;
            let ids: Vec<&str> = result.items.iter().map(|e| e.id.as_str()).collect();
            elapsed += rng.random_range(0.5..2.0);
            batches.push(self.lineage("employees", &mut batch_no, &ids, now)?);
            *stages.entry("employees").or_insert(0) += ids.len() as u64;
            if !result.has_more() {
                break;
            }
            page = page.next();
        }

        // 2. Transfer records.
        let mut batch_no = 0;
        let mut page = Pagination::new(0, self.config.employee_batch_size);
        loop {
            let result = sim.transfers().list(page.clone())?;
            let ids: Vec<String> = result.items.iter().map(|r| r.id.to_string()).collect();
            let ids: Vec<&str> = ids.iter().map(String::as_str).collect();
            elapsed += rng.random_range(0.2..1.0);
            batches.push(self.lineage("transfers", &mut batch_no, &ids, now)?);
            *stages.entry("transfers").or_insert(0) += ids.len() as u64;
            if !result.has_more() {
                break;
            }
            page = page.next();
        }

        // 3. Operation records of departing and departed employees.
        let structured = self.structured_extract(sim, None, &mut *rng, now)?;
        elapsed += structured.query_secs;
        stages.insert("structured_records", structured.records.len() as u64);
        batches.push(structured.lineage);

        // 4. Access logs.
        let mut batch_no = 0;
        let mut page = Pagination::new(0, self.config.access_log_batch_size);
        loop {
            let result = sim.access_logs().list(page.clone())?;
            let ids: Vec<String> = result.items.iter().map(|e| e.id.to_string()).collect();
            let ids: Vec<&str> = ids.iter().map(String::as_str).collect();
            elapsed += rng.random_range(1.0..3.0);
            batches.push(self.lineage("access_logs", &mut batch_no, &ids, now)?);
            *stages.entry("access_logs").or_insert(0) += ids.len() as u64;
            if !result.has_more() {
                break;
            }
            page = page.next();
        }

        // 5. Semi-structured logs, one batch per system.
        let semi_structured = self.process_semi_structured_logs(sim, &mut *rng, now)?;
        for system in &semi_structured {
            elapsed += system.processing_secs;
            *stages.entry("semi_structured").or_insert(0) += system.records;
        }
        batches.extend(semi_structured.iter().enumerate().map(|(i, system)| BatchLineage {
            stage: "semi_structured",
            batch: i as u64 + 1,
            records: system.records,
            lineage_id: system.lineage_id.clone(),
        }));

        // 6. Transform and load.
        elapsed += rng.random_range(30.0..120.0);
        elapsed += rng.random_range(60.0..180.0);
        drop(rng);

        let records = stages.values().sum();
        let summary = SyncSummary {
            kind: SyncKind::Full,
            started_at: now,
            records,
            simulated_duration_secs: elapsed,
            time_limit_secs: self.config.full_extract_time_limit_secs,
            within_limit: elapsed <= self.config.full_extract_time_limit_secs,
            stages,
            batches,
            semi_structured,
        };
        self.finish(&summary)?;
        Ok(SyncOutcome::Completed(summary))
    }

    /// Pick up what changed since the last successful sync.
    pub fn perform_incremental_sync<E, T, L, A>(
        &self,
        sim: &Simulation<E, T, L, A>,
        now: DateTime<Utc>,
    ) -> SimResult<SyncOutcome>
    where
        E: EmployeeRepository,
        T: TransferRepository,
        L: AccessLogRepository,
        A: AlertRepository,
    {
        let Some(_guard) = self.try_begin() else {
            return self.skip(SyncKind::Incremental, now);
        };
        // Half-open window `[since, now)`: a record stamped exactly at a
        // sync boundary belongs to the batch that starts there.
        let since = self.last_sync().unwrap_or(DateTime::<Utc>::MIN_UTC);
        let in_window = |t: DateTime<Utc>| t >= since && t < now;

        let employees = sim.all_employees()?;
        let resignations: Vec<&str> = employees
            .iter()
            .filter(|e| e.resignation_date().is_some_and(in_window))
            .map(|e| e.id.as_str())
            .collect();
        let access_logs = sim
            .access_logs()
            .count_since(since)
            .saturating_sub(sim.access_logs().count_since(now))
            .min(self.config.incremental_sync_max);
        let account_changes = sim
            .transfers()
            .list_all()?
            .iter()
            .filter(|r| in_window(r.created_at) || r.resolved_at.is_some_and(in_window))
            .count() as u64;

        let mut rng = self.rng.lock();
        let history: u64 = resignations
            .iter()
            .map(|_| rng.random_range(100..=1000))
            .sum();
        let elapsed = rng.random_range(0.5..2.0)
            + access_logs as f64 * 0.001
            + resignations.len() as f64 * 0.2
            + account_changes as f64 * 0.01;
        let mut counter = 0;
        let batch = self.lineage("incremental", &mut counter, &resignations, now)?;
        drop(rng);

        let mut stages = BTreeMap::new();
        stages.insert("resignations", resignations.len() as u64);
        stages.insert("resignation_history", history);
        stages.insert("access_logs", access_logs);
        stages.insert("account_changes", account_changes);

        let summary = SyncSummary {
            kind: SyncKind::Incremental,
            started_at: now,
            records: stages.values().sum(),
            simulated_duration_secs: elapsed,
            time_limit_secs: self.config.incremental_sync_time_limit_secs,
            within_limit: elapsed <= self.config.incremental_sync_time_limit_secs,
            stages,
            batches: vec![batch],
            semi_structured: Vec::new(),
        };
        self.finish(&summary)?;
        Ok(SyncOutcome::Completed(summary))
    }

    /// Pull the access log entries of a set of accounts. Without an
    /// explicit set, every account of a departing or departed employee is
    /// used. Unknown account ids are ignored.
    pub fn extract_structured_data<E, T, L, A>(
        &self,
        sim: &Simulation<E, T, L, A>,
        accounts: Option<&[String]>,
    ) -> SimResult<StructuredExtract>
    where
        E: EmployeeRepository,
        T: TransferRepository,
        L: AccessLogRepository,
        A: AlertRepository,
    {
        let mut rng = self.rng.lock();
        self.structured_extract(sim, accounts, &mut *rng, sim.now())
    }

    fn structured_extract<E, T, L, A>(
        &self,
        sim: &Simulation<E, T, L, A>,
        accounts: Option<&[String]>,
        rng: &mut StdRng,
        now: DateTime<Utc>,
    ) -> SimResult<StructuredExtract>
    where
        E: EmployeeRepository,
        T: TransferRepository,
        L: AccessLogRepository,
        A: AlertRepository,
    {
        let employees = sim.all_employees()?;
        let owner_of: BTreeMap<&str, &EmployeeId> = employees
            .iter()
            .flat_map(|e| e.accounts.values().map(move |a| (a.account_id.as_str(), &e.id)))
            .collect();

        let requested: Vec<&str> = match accounts {
            Some(ids) => ids.iter().map(String::as_str).collect(),
            None => employees
                .iter()
                .filter(|e| {
                    matches!(
                        e.status,
                        EmploymentStatus::ResignationPending | EmploymentStatus::Resigned
                    )
                })
                .flat_map(|e| e.accounts.values().map(|a| a.account_id.as_str()))
                .collect(),
        };
        let resolved: Vec<&EmployeeId> = requested
            .iter()
            .filter_map(|id| owner_of.get(id).copied())
            .collect();
        let owners: BTreeSet<&EmployeeId> = resolved.iter().copied().collect();

        let records: Vec<AccessLogEntry> = sim
            .access_logs()
            .list_all()?
            .into_iter()
            .filter(|e| owners.contains(&e.user_id))
            .collect();
        let query_secs = rng.random_range(0.5..2.0);

        let ids: Vec<String> = records.iter().map(|e| e.id.to_string()).collect();
        let ids: Vec<&str> = ids.iter().map(String::as_str).collect();
        let mut batch_no = 0;
        let lineage = self.lineage("structured_records", &mut batch_no, &ids, now)?;
        debug!(
            accounts = resolved.len(),
            owners = owners.len(),
            records = records.len(),
            "Structured records extracted"
        );
        Ok(StructuredExtract {
            accounts: resolved.len(),
            owners: owners.len(),
            records,
            query_secs,
            lineage,
        })
    }

    /// Parse each system's raw logs into structured rows, one
    /// lineage-tagged batch per system in catalog order.
    fn process_semi_structured_logs<E, T, L, A>(
        &self,
        sim: &Simulation<E, T, L, A>,
        rng: &mut StdRng,
        now: DateTime<Utc>,
    ) -> SimResult<Vec<SystemLogBatch>>
    where
        E: EmployeeRepository,
        T: TransferRepository,
        L: AccessLogRepository,
        A: AlertRepository,
    {
        let mut processed = Vec::with_capacity(sim.catalog().systems.len());
        for (i, system) in sim.catalog().systems.iter().enumerate() {
            let batch = i as u64 + 1;
            let records = rng.random_range(SEMI_STRUCTURED_LINES);
            let processing_secs = rng.random_range(1.0..5.0);
            let count = records.to_string();
            let lineage = lineage_id("semi_structured", batch, &[system.name.as_str(), count.as_str()]);
            self.emit(
                LogStream::DataCollection,
                now,
                Level::Info,
                format!(
                    "Parsed {} raw logs into structured rows: {records} records in {processing_secs:.1}s (lineage {lineage})",
                    system.name
                ),
            )?;
            processed.push(SystemLogBatch {
                system: system.name.clone(),
                records,
                processing_secs,
                lineage_id: lineage,
            });
        }
        let total: u64 = processed.iter().map(|b| b.records).sum();
        info!(systems = processed.len(), records = total, "Semi-structured logs processed");
        Ok(processed)
    }

    /// Turn the consistency checker's findings into pass/fail checks.
    pub fn validate_data<E, T, L, A>(
        &self,
        sim: &Simulation<E, T, L, A>,
    ) -> SimResult<ValidationResults>
    where
        E: EmployeeRepository,
        T: TransferRepository,
        L: AccessLogRepository,
        A: AlertRepository,
    {
        let now = sim.now();
        let employees = sim.all_employees()?;
        let logs = sim.access_logs().list_all()?;
        let transfers = sim.transfers().list_all()?;
        let report = ConsistencyChecker::check(&employees, &logs, &transfers);

        let mut checks = vec![
            check(
                "data_integrity",
                report.orphaned_logs() == 0,
                CheckStatus::Fail,
                format!("{} access log entries without a known actor", report.orphaned_logs()),
            ),
            check(
                "completeness",
                report.transfer_deficit() == 0,
                CheckStatus::Warning,
                format!("{} accounts without a transfer record", report.transfer_deficit()),
            ),
            check(
                "consistency",
                report.date_violations() == 0,
                CheckStatus::Fail,
                format!("{} resignations dated after the last work day", report.date_violations()),
            ),
        ];
        let freshness = Duration::seconds(2 * self.config.frequency_secs as i64);
        let timeliness = match self.last_sync() {
            Some(last) => check(
                "timeliness",
                now - last <= freshness,
                CheckStatus::Warning,
                format!("last sync at {}", last.to_rfc3339()),
            ),
            None => check("timeliness", false, CheckStatus::Warning, "no sync has run yet".into()),
        };
        checks.push(timeliness);

        let overall = checks
            .iter()
            .map(|c| c.status)
            .max()
            .unwrap_or(CheckStatus::Pass);
        for c in &checks {
            self.emit(
                LogStream::DataSync,
                now,
                level_for(c.status),
                format!("Validation {}: {:?} ({})", c.name, c.status, c.detail),
            )?;
        }
        info!(overall = ?overall, "Data validation complete");
        Ok(ValidationResults { checks, overall })
    }

    pub fn statistics(&self) -> SyncStatistics {
        let last_sync_time = self.last_sync();
        SyncStatistics {
            last_sync_time,
            sync_running: self.is_running(),
            next_scheduled_sync: last_sync_time
                .map(|t| t + Duration::seconds(self.config.frequency_secs as i64)),
            sync_frequency_secs: self.config.frequency_secs,
            full_extract_time_limit_secs: self.config.full_extract_time_limit_secs,
            incremental_sync_time_limit_secs: self.config.incremental_sync_time_limit_secs,
            completed_syncs: self.completed.load(Ordering::Relaxed),
            skipped_syncs: self.skipped.load(Ordering::Relaxed),
        }
    }

    fn skip(&self, kind: SyncKind, now: DateTime<Utc>) -> SimResult<SyncOutcome> {
        self.skipped.fetch_add(1, Ordering::Relaxed);
        warn!(kind = ?kind, "Sync already running, request skipped");
        self.emit(
            LogStream::Error,
            now,
            Level::Warn,
            format!("{kind:?} sync rejected: another batch is running"),
        )?;
        Ok(SyncOutcome::Skipped)
    }

    fn finish(&self, summary: &SyncSummary) -> SimResult<()> {
        let label = match summary.kind {
            SyncKind::Full => "Full extraction",
            SyncKind::Incremental => "Incremental sync",
        };
        let at = summary.started_at;
        self.emit(
            LogStream::Performance,
            at,
            if summary.within_limit {
                Level::Info
            } else {
                Level::Warn
            },
            format!(
                "{label}: {} records in {:.1}s (limit {:.0}s)",
                summary.records, summary.simulated_duration_secs, summary.time_limit_secs
            ),
        )?;

        if summary.within_limit {
            *self.last_sync.lock() = Some(at);
            self.completed.fetch_add(1, Ordering::Relaxed);
            self.emit(
                LogStream::DataSync,
                at,
                Level::Info,
                format!("{label} completed: {} records", summary.records),
            )?;
            info!(
                kind = ?summary.kind,
                records = summary.records,
                duration_secs = summary.simulated_duration_secs,
                "Sync completed"
            );
        } else {
            self.emit(
                LogStream::Error,
                at,
                Level::Error,
                format!(
                    "{label} exceeded its time limit: {:.1}s > {:.0}s",
                    summary.simulated_duration_secs, summary.time_limit_secs
                ),
            )?;
            warn!(
                kind = ?summary.kind,
                duration_secs = summary.simulated_duration_secs,
                limit_secs = summary.time_limit_secs,
                "Sync exceeded time limit"
            );
        }
        Ok(())
    }

    fn lineage(
        &self,
        stage: &'static str,
        batch: &mut u64,
        ids: &[&str],
        at: DateTime<Utc>,
    ) -> SimResult<BatchLineage> {
        *batch += 1;
        let lineage = BatchLineage {
            stage,
            batch: *batch,
            records: ids.len() as u64,
            lineage_id: lineage_id(stage, *batch, ids),
        };
        self.emit(
            LogStream::DataCollection,
            at,
            Level::Info,
            format!(
                "Extracted {stage} batch {}: {} records (lineage {})",
                lineage.batch, lineage.records, lineage.lineage_id
            ),
        )?;
        Ok(lineage)
    }

    fn emit(&self, stream: LogStream, at: DateTime<Utc>, level: Level, message: String) -> SimResult<()> {
        self.sink.emit(LogRecord::text(stream, at, level, message))
    }
}

/// SHA-256 over the stage, batch number and record ids.
pub fn lineage_id(stage: &str, batch: u64, ids: &[&str]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(stage.as_bytes());
    hasher.update(batch.to_be_bytes());
    for id in ids {
        hasher.update(id.as_bytes());
        hasher.update([0u8]);
    }
    hex::encode(hasher.finalize())
}

/// Run a simulated day plus an incremental sync on every tick until
/// `shutdown` resolves. Returns the number of completed batches.
pub async fn run_scheduled<E, T, L, A, F>(
    sim: Arc<tokio::sync::Mutex<Simulation<E, T, L, A>>>,
    driver: Arc<SyncDriver>,
    period: std::time::Duration,
    shutdown: F,
) -> u64
where
    E: EmployeeRepository,
    T: TransferRepository,
    L: AccessLogRepository,
    A: AlertRepository,
    F: Future<Output = ()>,
{
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tokio::pin!(shutdown);

    let mut batches = 0;
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!(batches, "Scheduled sync stopping");
                break;
            }
            _ = interval.tick() => {
                if driver.is_running() {
                    debug!("Previous batch still running, tick skipped");
                    continue;
                }
                let mut sim = sim.lock().await;
                sim.run_day();
                let now = sim.now();
                match driver.perform_incremental_sync(&*sim, now) {
                    Ok(SyncOutcome::Completed(summary)) => {
                        batches += 1;
                        debug!(records = summary.records, "Scheduled batch complete");
                    }
                    Ok(SyncOutcome::Skipped) => {}
                    Err(e) => error!(error = %e, "Scheduled batch failed"),
                }
            }
        }
    }
    batches
}

fn check(name: &'static str, ok: bool, failure: CheckStatus, detail: String) -> ValidationCheck {
    ValidationCheck {
        name,
        status: if ok { CheckStatus::Pass } else { failure },
        detail,
    }
}

fn level_for(status: CheckStatus) -> Level {
    match status {
        CheckStatus::Pass => Level::Info,
        CheckStatus::Warning => Level::Warn,
        CheckStatus::Fail => Level::Error,
    }
}
