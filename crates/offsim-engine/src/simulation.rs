//! The simulation driver owns the repositories, the output sink, the
//! seeded random generator and the simulated clock.
//!
//! Each daily step runs in isolation: a failing step is logged to
//! tracing and the error stream, then the day carries on.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use offsim_core::catalog::Catalog;
use offsim_core::error::SimResult;
use offsim_core::ids::EmployeeId;
use offsim_core::models::employee::Employee;
use offsim_core::repository::{
    AccessLogRepository, AlertRepository, EmployeeRepository, TransferRepository,
};
use offsim_core::sink::{Level, LogRecord, LogStream, RecordSink};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use serde_json::json;
use tracing::{error, info, warn};

use crate::access::AccessLogGenerator;
use crate::config::EngineConfig;
use crate::consistency::{ConsistencyChecker, ConsistencyReport};
use crate::factory::EntityFactory;
use crate::lifecycle::{CompletionOutcome, LifecycleEngine, ResignationOutcome, ResignationRequest};
use crate::report::{
    self, ComplianceReport, HealthAssessment, HrStatistics, ViolationStatistics,
};

/// Simulated hour of each daily step.
const HR_OPERATIONS_HOUR: i64 = 8;
const RESIGNATION_HOUR: i64 = 10;
const COMPLETION_HOUR: i64 = 18;
const POST_RESIGNATION_HOUR: i64 = 20;

/// The four repositories a simulation writes to.
pub struct Repositories<E, T, L, A> {
    pub employees: E,
    pub transfers: T,
    pub access_logs: L,
    pub alerts: A,
}

/// What one simulated day produced.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DayReport {
    pub date: Option<NaiveDate>,
    pub resignations: usize,
    pub completions: usize,
    pub delayed_revocations_applied: usize,
    pub post_resignation_events: usize,
    pub access_logs: usize,
    pub alerts: usize,
    pub hr_operations: usize,
    pub consistency: Option<ConsistencyReport>,
    pub failed_steps: Vec<&'static str>,
}

pub struct Simulation<E, T, L, A>
where
    E: EmployeeRepository,
    T: TransferRepository,
    L: AccessLogRepository,
    A: AlertRepository,
{
    repos: Repositories<E, T, L, A>,
    sink: Arc<dyn RecordSink>,
    catalog: Arc<Catalog>,
    config: EngineConfig,
    factory: EntityFactory,
    lifecycle: LifecycleEngine,
    access: AccessLogGenerator,
    rng: StdRng,
    /// Midnight of the day being simulated.
    clock: DateTime<Utc>,
    days_run: u32,
}

impl<E, T, L, A> Simulation<E, T, L, A>
where
    E: EmployeeRepository,
    T: TransferRepository,
    L: AccessLogRepository,
    A: AlertRepository,
{
    /// Validate the configuration and catalog and wire the generators.
    /// The clock starts `start_offset_days` before today.
    pub fn new(
        repos: Repositories<E, T, L, A>,
        sink: Arc<dyn RecordSink>,
        catalog: Arc<Catalog>,
        config: EngineConfig,
    ) -> SimResult<Self> {
        config.validate()?;
        catalog.validate()?;
        let lifecycle = LifecycleEngine::new(catalog.clone(), config.clone())?;
        let start = Utc::now().date_naive() - Duration::days(config.start_offset_days);

        info!(
            seed = config.seed,
            total_employees = config.total_employees,
            start_date = %start,
            "Simulation configured"
        );

        Ok(Self {
            repos,
            sink,
            factory: EntityFactory::new(catalog.clone()),
            access: AccessLogGenerator::new(catalog.clone(), config.clone()),
            lifecycle,
            rng: StdRng::seed_from_u64(config.seed),
            clock: midnight(start),
            days_run: 0,
            catalog,
            config,
        })
    }

    /// Move the clock to another start date.
    pub fn with_start_date(mut self, date: NaiveDate) -> Self {
        self.clock = midnight(date);
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.date_naive()
    }

    pub fn days_run(&self) -> u32 {
        self.days_run
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn sink(&self) -> &Arc<dyn RecordSink> {
        &self.sink
    }

    pub fn employees(&self) -> &E {
        &self.repos.employees
    }

    pub fn transfers(&self) -> &T {
        &self.repos.transfers
    }

    pub fn access_logs(&self) -> &L {
        &self.repos.access_logs
    }

    pub fn alerts(&self) -> &A {
        &self.repos.alerts
    }

    /// Onboard `total_employees` employees.
    pub fn initialize(&mut self) -> SimResult<usize> {
        let today = self.today();
        let at = self.clock + Duration::hours(HR_OPERATIONS_HOUR);
        for _ in 0..self.config.total_employees {
            let employee = self.factory.create_employee(&mut self.rng, today);
            self.emit_json(
                LogStream::HrDatabase,
                at,
                json!({
                    "operation": "employee_created",
                    "employee_id": employee.id,
                    "name": employee.name,
                    "email": employee.email,
                    "department": employee.department,
                    "title": employee.title,
                    "role": employee.role,
                    "hire_date": employee.hire_date,
                    "security_clearance": employee.security_clearance,
                    "accounts": employee.accounts.len(),
                    "permissions": employee.permissions.len(),
                }),
            )?;
            self.repos.employees.insert(employee)?;
        }
        info!(
            employees = self.config.total_employees,
            "Employee population initialized"
        );
        Ok(self.config.total_employees)
    }

    /// Run one simulated day and advance the clock.
    pub fn run_day(&mut self) -> DayReport {
        let mut report = DayReport {
            date: Some(self.today()),
            ..Default::default()
        };
        let mut failed = Vec::new();

        let step = self.process_daily_resignations();
        report.resignations = self.settle("daily resignations", step, &mut failed).unwrap_or(0);

        let step = self.process_resignation_completions();
        report.completions = self
            .settle("resignation completions", step, &mut failed)
            .unwrap_or(0);

        let step = self.apply_scheduled_revocations();
        report.delayed_revocations_applied = self
            .settle("scheduled revocations", step, &mut failed)
            .unwrap_or(0);

        let step = self.simulate_post_resignation();
        report.post_resignation_events = self
            .settle("post-resignation activity", step, &mut failed)
            .unwrap_or(0);

        let step = self.generate_access_logs();
        if let Some((entries, alerts)) = self.settle("access logs", step, &mut failed) {
            report.access_logs = entries;
            report.alerts = alerts;
        }

        let step = self.simulate_database_operations();
        report.hr_operations = self
            .settle("hr database operations", step, &mut failed)
            .unwrap_or(0);

        let step = self.check_consistency();
        report.consistency = self.settle("consistency check", step, &mut failed);
        report.failed_steps = failed;

        if let Err(e) = self.sink.flush() {
            warn!(error = %e, "Failed to flush output streams");
        }

        info!(
            date = %self.today(),
            resignations = report.resignations,
            completions = report.completions,
            access_logs = report.access_logs,
            alerts = report.alerts,
            failed_steps = report.failed_steps.len(),
            "Simulated day complete"
        );
        self.clock += Duration::days(1);
        self.days_run += 1;
        report
    }

    /// Run `days` consecutive days.
    pub fn run(&mut self, days: u32) -> Vec<DayReport> {
        (0..days).map(|_| self.run_day()).collect()
    }

    /// Hand in notice for `max(1, total * resignation_rate / 30)` active
    /// employees.
    pub fn process_daily_resignations(&mut self) -> SimResult<usize> {
        let total = self.repos.employees.count() as f64;
        let target = ((total * self.config.resignation_rate / 30.0) as usize).max(1);
        let active: Vec<EmployeeId> = self
            .repos
            .employees
            .list_active()?
            .into_iter()
            .filter(Employee::is_active)
            .map(|e| e.id)
            .collect();
        let chosen: Vec<EmployeeId> = active
            .choose_multiple(&mut self.rng, target.min(active.len()))
            .cloned()
            .collect();

        for id in &chosen {
            self.initiate_resignation(id, ResignationRequest::default())?;
        }
        Ok(chosen.len())
    }

    /// Start the offboarding of one employee and persist what it
    /// produced.
    pub fn initiate_resignation(
        &mut self,
        id: &EmployeeId,
        request: ResignationRequest,
    ) -> SimResult<ResignationOutcome> {
        let mut employee = self.repos.employees.get(id)?;
        let now = self.clock
            + Duration::hours(RESIGNATION_HOUR)
            + Duration::minutes(self.rng.random_range(0..60));
        let outcome = self
            .lifecycle
            .initiate_resignation(&mut employee, request, &mut self.rng, now)?;

        if let Some(info) = &employee.resignation {
            self.emit_json(
                LogStream::HrDatabase,
                now,
                json!({
                    "operation": "resignation_submitted",
                    "employee_id": employee.id,
                    "name": employee.name,
                    "department": employee.department,
                    "role": employee.role,
                    "resignation_type": info.resignation_type,
                    "reason": info.reason,
                    "urgent": info.urgent,
                    "resignation_date": info.resignation_date,
                    "last_work_date": info.last_work_date,
                    "risk_score": employee.resignation_risk_score,
                }),
            )?;
        }
        for record in &outcome.transfer_records {
            self.emit_text(
                LogStream::AccountManagement,
                now,
                Level::Info,
                format!(
                    "Transfer record {} created for {} account {} ({}, risk {})",
                    record.id, employee.id, record.account_key, record.status, record.risk_level
                ),
            )?;
        }
        if outcome.dropped_transfers > 0 {
            self.emit_text(
                LogStream::AccountManagement,
                now,
                Level::Warn,
                format!(
                    "{} transfer records not created for {}",
                    outcome.dropped_transfers, employee.id
                ),
            )?;
        }
        for anomaly in &outcome.anomalies {
            self.emit_json(LogStream::SecurityEvents, now, serde_json::to_value(anomaly)?)?;
        }

        self.repos
            .transfers
            .create_many(outcome.transfer_records.clone())?;
        self.repos.employees.update(employee)?;
        Ok(outcome)
    }

    /// Complete every pending resignation whose last work day has come.
    pub fn process_resignation_completions(&mut self) -> SimResult<usize> {
        let now = self.clock + Duration::hours(COMPLETION_HOUR);
        let due: Vec<EmployeeId> = self
            .repos
            .employees
            .list_active()?
            .into_iter()
            .filter(|e| !e.is_active() && e.last_work_date().is_some_and(|d| d <= now))
            .map(|e| e.id)
            .collect();
        for id in &due {
            self.complete_resignation(id)?;
        }
        Ok(due.len())
    }

    /// Offboard one employee whose last work day has passed.
    pub fn complete_resignation(&mut self, id: &EmployeeId) -> SimResult<CompletionOutcome> {
        let now = self.clock + Duration::hours(COMPLETION_HOUR);
        let mut employee = self.repos.employees.get(id)?;
        let transfers = self.repos.transfers.list_for_employee(id)?;
        let outcome =
            self.lifecycle
                .complete_resignation(&mut employee, &transfers, &mut self.rng, now)?;

        self.emit_json(
            LogStream::HrDatabase,
            now,
            json!({
                "operation": "resignation_completed",
                "employee_id": employee.id,
                "accounts_disabled": outcome.disabled_accounts.len(),
                "accounts_retained": outcome.retained_accounts.len(),
                "permissions_revoked": outcome.revoked_permissions.len(),
                "revocations_delayed": outcome.delayed_revocations.len(),
                "transfers_resolved": outcome.resolved_transfers.len(),
            }),
        )?;
        for key in &outcome.disabled_accounts {
            self.emit_text(
                LogStream::AccountManagement,
                now,
                Level::Info,
                format!("Account {key} of {} disabled", employee.id),
            )?;
        }
        for key in &outcome.retained_accounts {
            self.emit_text(
                LogStream::AccountManagement,
                now,
                Level::Warn,
                format!("Account {key} of {} left active", employee.id),
            )?;
            self.emit_json(
                LogStream::AuditMonitor,
                now,
                json!({
                    "event": "account_not_disabled",
                    "employee_id": employee.id,
                    "account": key,
                }),
            )?;
        }
        for (system, due) in &outcome.delayed_revocations {
            self.emit_text(
                LogStream::AccountManagement,
                now,
                Level::Warn,
                format!(
                    "Revocation of {} access on {system} deferred to {}",
                    employee.id,
                    due.to_rfc3339()
                ),
            )?;
        }
        for record in outcome
            .resolved_transfers
            .iter()
            .chain(&outcome.backfilled_transfers)
        {
            let level = if record.notes.is_empty() {
                Level::Info
            } else {
                Level::Warn
            };
            self.emit_text(
                LogStream::AccountManagement,
                now,
                level,
                format!(
                    "Transfer {} of {} to {}: {} {}",
                    record.id, record.account_key, record.transfer_to, record.status, record.notes
                )
                .trim_end()
                .to_string(),
            )?;
        }
        for anomaly in &outcome.anomalies {
            self.emit_json(LogStream::SecurityEvents, now, serde_json::to_value(anomaly)?)?;
        }

        self.repos
            .transfers
            .update_many(outcome.resolved_transfers.clone())?;
        self.repos
            .transfers
            .create_many(outcome.backfilled_transfers.clone())?;
        self.repos.employees.update(employee)?;
        Ok(outcome)
    }

    /// Apply deferred permission revocations that are now due.
    pub fn apply_scheduled_revocations(&mut self) -> SimResult<usize> {
        let now = self.clock + Duration::hours(COMPLETION_HOUR);
        let mut applied = 0;
        for mut employee in self.repos.employees.list_resigned()? {
            let revoked = self.lifecycle.apply_scheduled_revocations(&mut employee, now);
            if revoked.is_empty() {
                continue;
            }
            for system in &revoked {
                self.emit_text(
                    LogStream::AccountManagement,
                    now,
                    Level::Info,
                    format!("Delayed revocation of {} access on {system} applied", employee.id),
                )?;
            }
            applied += revoked.len();
            self.repos.employees.update(employee)?;
        }
        Ok(applied)
    }

    /// Seed post-resignation attack patterns for every resigned employee.
    pub fn simulate_post_resignation(&mut self) -> SimResult<usize> {
        let now = self.clock + Duration::hours(POST_RESIGNATION_HOUR);
        let mut fired = 0;
        for mut employee in self.repos.employees.list_resigned()? {
            let events =
                self.lifecycle
                    .simulate_post_resignation_activities(&mut employee, &mut self.rng, now)?;
            if events.is_empty() {
                continue;
            }
            for event in &events {
                self.emit_json(LogStream::SecurityEvents, now, serde_json::to_value(event)?)?;
            }
            fired += events.len();
            self.repos.employees.update(employee)?;
        }
        Ok(fired)
    }

    /// Generate the day's access logs, alerts and incidents. Returns the
    /// entry and alert counts.
    ///
    /// Repositories are written before any record reaches the sink, so a
    /// failing stream never leaves an alert without its access log entry.
    pub fn generate_access_logs(&mut self) -> SimResult<(usize, usize)> {
        let today = self.today();
        let mut employees = self.all_employees()?;
        let day = self
            .access
            .generate_day(&mut employees, today, &mut self.rng);

        // 1. Render every record up front.
        let mut records = Vec::with_capacity(day.entries.len() + 3 * day.alerts.len());
        for entry in &day.entries {
            records.push(LogRecord::json(
                LogStream::SystemAccess,
                entry.timestamp,
                serde_json::to_value(entry)?,
            ));
        }
        for (alert, incident) in day.alerts.iter().zip(&day.incidents) {
            records.push(LogRecord::json(
                LogStream::AuditMonitor,
                alert.created_at,
                json!({
                    "event": "violation_alert",
                    "alert": alert,
                }),
            ));
            records.push(LogRecord::text(
                LogStream::ViolationAlert,
                alert.created_at,
                if alert.risk_level.is_high_or_above() {
                    Level::Error
                } else {
                    Level::Warn
                },
                format!(
                    "{} risk {} by former employee {} on {} ({} days after last work day)",
                    alert.risk_level,
                    alert.violation_type,
                    alert.employee_id,
                    alert.system,
                    alert.days_since_last_work
                ),
            ));
            records.push(LogRecord::json(
                LogStream::SecurityEvents,
                incident.opened_at,
                json!({
                    "event": "security_incident",
                    "incident": incident,
                }),
            ));
        }

        // 2. Persist entries, then the alerts that point at them.
        let counts = (day.entries.len(), day.alerts.len());
        self.repos.access_logs.append(day.entries)?;
        for (alert, incident) in day.alerts.into_iter().zip(day.incidents) {
            self.repos.alerts.record(alert, incident)?;
        }
        for id in &day.touched {
            if let Some(employee) = employees.iter().find(|e| &e.id == id) {
                self.repos.employees.update(employee.clone())?;
            }
        }

        // 3. Publish.
        for record in records {
            self.sink.emit(record)?;
        }
        Ok(counts)
    }

    /// Routine HR database traffic.
    pub fn simulate_database_operations(&mut self) -> SimResult<usize> {
        let count: usize = self.rng.random_range(10..=50);
        let mut offsets: Vec<i64> = (0..count)
            .map(|_| self.rng.random_range(0..10 * 60))
            .collect();
        offsets.sort_unstable();

        for offset in offsets {
            let at = self.clock + Duration::hours(HR_OPERATIONS_HOUR) + Duration::minutes(offset);
            let operation = self
                .catalog
                .hr_operations
                .choose(&mut self.rng)
                .cloned()
                .unwrap_or_default();
            let status = if self.rng.random_bool(0.98) {
                "success"
            } else {
                "timeout"
            };
            let payload = json!({
                "operation": operation,
                "query_time_ms": self.rng.random_range(5..=500),
                "records_affected": self.rng.random_range(1..=100),
                "status": status,
            });
            self.emit_json(LogStream::HrDatabase, at, payload)?;
        }
        Ok(count)
    }

    /// Cross-check employees, access logs and transfer records. Every
    /// finding is logged; none is fatal.
    pub fn check_consistency(&self) -> SimResult<ConsistencyReport> {
        let employees = self.all_employees()?;
        let logs = self.repos.access_logs.list_all()?;
        let transfers = self.repos.transfers.list_all()?;
        let report = ConsistencyChecker::check(&employees, &logs, &transfers);

        let at = self.clock + Duration::hours(23);
        for finding in &report.findings {
            warn!(finding = finding.kind(), "Consistency finding");
            self.emit_json(
                LogStream::AuditMonitor,
                at,
                json!({
                    "event": "consistency_finding",
                    "detail": finding,
                }),
            )?;
        }
        Ok(report)
    }

    /// Look for access that outlived employment.
    pub fn monitor_account_status(&self) -> SimResult<ComplianceReport> {
        let employees = self.repos.employees.list_resigned()?;
        let transfers = self.repos.transfers.list_all()?;
        let report = report::compliance_issues(&employees, &transfers, self.clock);

        for issue in &report.issues {
            self.emit_json(
                LogStream::AuditMonitor,
                self.clock,
                json!({
                    "event": "compliance_issue",
                    "issue": issue,
                }),
            )?;
        }
        if !report.is_compliant() {
            warn!(
                checked = report.checked_employees,
                issues = report.issues.len(),
                "Compliance issues found"
            );
        }
        Ok(report)
    }

    pub fn hr_statistics(&self) -> SimResult<HrStatistics> {
        let employees = self.all_employees()?;
        let transfers = self.repos.transfers.list_all()?;
        Ok(report::hr_statistics(&employees, &transfers))
    }

    pub fn violation_statistics(&self) -> SimResult<ViolationStatistics> {
        let logs = self.repos.access_logs.list_all()?;
        let alerts = self.repos.alerts.list_alerts()?;
        let incidents = self.repos.alerts.list_incidents()?;
        Ok(report::violation_statistics(&logs, &alerts, &incidents))
    }

    pub fn assess_health(&self) -> SimResult<HealthAssessment> {
        Ok(report::assess_health(
            &self.hr_statistics()?,
            &self.violation_statistics()?,
        ))
    }

    /// Active, pending and resigned employees.
    pub fn all_employees(&self) -> SimResult<Vec<Employee>> {
        let mut employees = self.repos.employees.list_active()?;
        employees.extend(self.repos.employees.list_resigned()?);
        Ok(employees)
    }

    fn settle<V>(
        &self,
        step: &'static str,
        result: SimResult<V>,
        failed: &mut Vec<&'static str>,
    ) -> Option<V> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                error!(step, error = %e, "Simulation step failed");
                failed.push(step);
                let record = LogRecord::text(
                    LogStream::Error,
                    self.clock,
                    Level::Error,
                    format!("{step} failed: {e}"),
                );
                if let Err(sink_error) = self.sink.emit(record) {
                    error!(error = %sink_error, "Failed to write error record");
                }
                None
            }
        }
    }

    fn emit_json(
        &self,
        stream: LogStream,
        at: DateTime<Utc>,
        payload: serde_json::Value,
    ) -> SimResult<()> {
        self.sink.emit(LogRecord::json(stream, at, payload))
    }

    fn emit_text(
        &self,
        stream: LogStream,
        at: DateTime<Utc>,
        level: Level,
        message: String,
    ) -> SimResult<()> {
        self.sink.emit(LogRecord::text(stream, at, level, message))
    }
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}
