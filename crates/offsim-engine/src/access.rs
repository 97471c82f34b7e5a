//! Access log generation.
//!
//! Active staff produce a login → business flows → logout day. Pending
//! high-risk staff additionally act out their injected pre-resignation
//! anomalies. Resigned staff occasionally try to get back in.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use offsim_core::catalog::{Catalog, Location, Sensitivity};
use offsim_core::ids::{EmployeeId, random_uuid};
use offsim_core::models::access_log::{
    AccessAction, AccessLogEntry, AccessResult, GeoLocation, LARGE_VOLUME_KB,
    WORK_WINDOW_END_HOUR, WORK_WINDOW_START_HOUR, is_internal_ip,
};
use offsim_core::models::alert::{AlertStatus, SecurityIncident, ViolationAlert};
use offsim_core::models::anomaly::{AnomalyKind, AnomalyPhase};
use offsim_core::models::employee::{Employee, EmploymentStatus, Role};
use offsim_core::models::severity::Severity;
use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::debug;

use crate::config::EngineConfig;

/// Entries above this risk are suspicious even without an injected
/// anomaly.
pub const SUSPICIOUS_RISK: f64 = 0.7;

const MASS_DOWNLOAD_WINDOW_MINUTES: i64 = 120;
const OFF_HOURS: [u32; 11] = [0, 1, 2, 3, 4, 5, 19, 20, 21, 22, 23];
const EXTERNAL_FIRST_OCTETS: [u8; 7] = [31, 45, 77, 91, 103, 185, 203];

/// Known employee ids, and the subset still employed.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    known: BTreeSet<EmployeeId>,
    employed: Vec<EmployeeId>,
}

impl Directory {
    pub fn from_employees(employees: &[Employee]) -> Self {
        Self {
            known: employees.iter().map(|e| e.id.clone()).collect(),
            employed: employees
                .iter()
                .filter(|e| !e.is_resigned())
                .map(|e| e.id.clone())
                .collect(),
        }
    }

    pub fn contains(&self, id: &EmployeeId) -> bool {
        self.known.contains(id)
    }

    pub fn employed(&self) -> &[EmployeeId] {
        &self.employed
    }
}

/// Output of one generation pass.
#[derive(Debug, Default)]
pub struct DayActivity {
    pub entries: Vec<AccessLogEntry>,
    pub alerts: Vec<ViolationAlert>,
    pub incidents: Vec<SecurityIncident>,
    /// Employees whose anomaly history changed.
    pub touched: Vec<EmployeeId>,
}

impl DayActivity {
    fn merge(&mut self, other: DayActivity) {
        self.entries.extend(other.entries);
        self.alerts.extend(other.alerts);
        self.incidents.extend(other.incidents);
        self.touched.extend(other.touched);
    }
}

/// Where a burst of entries comes from.
struct Origin {
    ip_address: String,
    geolocation: GeoLocation,
    session_id: String,
}

pub struct AccessLogGenerator {
    catalog: Arc<Catalog>,
    config: EngineConfig,
}

impl AccessLogGenerator {
    pub fn new(catalog: Arc<Catalog>, config: EngineConfig) -> Self {
        Self { catalog, config }
    }

    /// Generate one day for every employee. Entries come back in
    /// timestamp order.
    pub fn generate_day<R: Rng + ?Sized>(
        &self,
        employees: &mut [Employee],
        date: NaiveDate,
        rng: &mut R,
    ) -> DayActivity {
        let directory = Directory::from_employees(employees);
        let mut day = DayActivity::default();
        for employee in employees.iter_mut() {
            day.merge(self.generate_for_employee(employee, &directory, date, rng));
        }
        day.entries.sort_by_key(|e| e.timestamp);
        debug!(
            date = %date,
            entries = day.entries.len(),
            alerts = day.alerts.len(),
            "Access logs generated"
        );
        day
    }

    /// Generate one employee's day. Nothing is produced for ids missing
    /// from `directory`.
    pub fn generate_for_employee<R: Rng + ?Sized>(
        &self,
        employee: &mut Employee,
        directory: &Directory,
        date: NaiveDate,
        rng: &mut R,
    ) -> DayActivity {
        let mut activity = DayActivity::default();
        if !directory.contains(&employee.id) {
            debug!(employee_id = %employee.id, "Skipping employee outside the directory");
            return activity;
        }

        match employee.status {
            EmploymentStatus::Active => {
                activity.entries = self.working_day(employee, date, rng);
            }
            EmploymentStatus::ResignationPending => {
                activity.entries = self.working_day(employee, date, rng);
                if employee.resignation_risk_score > self.config.pending_anomaly_risk_threshold
                    && employee
                        .pending_anomalies(AnomalyPhase::PreResignation)
                        .next()
                        .is_some()
                {
                    let bursts = self.materialize_pre_resignation(employee, date, rng);
                    activity.entries.extend(bursts);
                    activity.touched.push(employee.id.clone());
                }
            }
            EmploymentStatus::Resigned => {
                if rng.random_bool(self.violation_probability(employee, date)) {
                    activity = self.violation_attempt(employee, directory, date, rng);
                }
            }
        }
        activity.entries.sort_by_key(|e| e.timestamp);
        activity
    }

    /// Daily chance of a violation attempt: `violation_rate * risk`,
    /// halved during the grace period.
    pub fn violation_probability(&self, employee: &Employee, date: NaiveDate) -> f64 {
        let base = (self.config.violation_rate * employee.resignation_risk_score).clamp(0.0, 1.0);
        match employee.days_since_last_work(at(date, 12, 0)) {
            Some(days) if days <= self.config.grace_period_days => base * 0.5,
            _ => base,
        }
    }

    fn working_day<R: Rng + ?Sized>(
        &self,
        employee: &Employee,
        date: NaiveDate,
        rng: &mut R,
    ) -> Vec<AccessLogEntry> {
        let profile = self.catalog.role(employee.role);
        let origin = self.office(employee, date, rng);
        let mut entries = Vec::new();

        // Morning logins.
        let start = at(
            date,
            employee.behavior_profile.typical_login_hour,
            rng.random_range(0..30),
        );
        let mut t = start;
        let mut logged_in = Vec::new();
        for system in &profile.login_systems {
            if !employee.has_active_permission(system) {
                continue;
            }
            let action = if system == "vpn" {
                AccessAction::VpnConnect
            } else {
                AccessAction::Login
            };
            if rng.random_bool(0.03) {
                entries.push(entry(rng, &employee.id, system, action, t, AccessResult::Failure, 0, &origin, None));
                t += Duration::minutes(1);
            }
            entries.push(entry(rng, &employee.id, system, action, t, AccessResult::Success, 0, &origin, None));
            logged_in.push(system.as_str());
            t += Duration::minutes(rng.random_range(2..=5));
        }
        if logged_in.is_empty() {
            return entries;
        }

        // Business flows.
        for _ in 0..rng.random_range(1..=3) {
            let Some(flow) = profile.flows.choose(rng) else {
                break;
            };
            for step in &flow.steps {
                if !employee.has_active_permission(&step.system) {
                    continue;
                }
                t += Duration::minutes(rng.random_range(5..=40));
                let result = if rng.random_bool(0.97) {
                    AccessResult::Success
                } else {
                    AccessResult::Denied
                };
                let volume = routine_volume(step.action, rng);
                entries.push(entry(rng, &employee.id, &step.system, step.action, t, result, volume, &origin, None));
            }
        }

        // Evening work for people with after-hours habits.
        if rng.random_bool(employee.behavior_profile.after_hours_ratio.clamp(0.0, 1.0)) {
            let late = at(date, rng.random_range(19..=21), rng.random_range(0..60));
            if late > t {
                if let Some(system) = logged_in.choose(rng) {
                    let volume = routine_volume(AccessAction::FileAccess, rng);
                    entries.push(entry(rng, &employee.id, system, AccessAction::FileAccess, late, AccessResult::Success, volume, &origin, None));
                    t = late;
                }
            }
        }

        // Logouts in reverse login order.
        let session_end = start + Duration::minutes(i64::from(employee.behavior_profile.avg_session_minutes));
        let mut t = t.max(session_end);
        for system in logged_in.iter().rev() {
            t += Duration::minutes(rng.random_range(1..=3));
            entries.push(entry(rng, &employee.id, system, AccessAction::Logout, t, AccessResult::Success, 0, &origin, None));
        }
        entries
    }

    fn materialize_pre_resignation<R: Rng + ?Sized>(
        &self,
        employee: &mut Employee,
        date: NaiveDate,
        rng: &mut R,
    ) -> Vec<AccessLogEntry> {
        let pending: Vec<(usize, AnomalyKind)> = employee
            .anomaly_history
            .iter()
            .enumerate()
            .filter(|(_, a)| a.phase == AnomalyPhase::PreResignation && !a.materialized)
            .map(|(i, a)| (i, a.kind))
            .collect();

        let origin = self.office(employee, date, rng);
        let mut entries = Vec::new();
        for (index, kind) in pending {
            entries.extend(self.render_burst(employee, kind, &origin, date, rng));
            employee.anomaly_history[index].materialized = true;
        }
        debug!(employee_id = %employee.id, entries = entries.len(), "Pre-resignation anomalies materialized");
        entries
    }

    fn render_burst<R: Rng + ?Sized>(
        &self,
        employee: &Employee,
        kind: AnomalyKind,
        origin: &Origin,
        date: NaiveDate,
        rng: &mut R,
    ) -> Vec<AccessLogEntry> {
        let id = &employee.id;
        let permitted: Vec<&str> = employee
            .permissions
            .values()
            .filter(|p| p.is_active())
            .map(|p| p.system.as_str())
            .collect();
        let sensitive: Vec<&str> = permitted
            .iter()
            .copied()
            .filter(|s| {
                self.catalog
                    .system(s)
                    .is_some_and(|spec| spec.sensitivity >= Sensitivity::High)
            })
            .collect();
        let mut entries = Vec::new();

        match kind {
            AnomalyKind::MassDownload => {
                let pool = if sensitive.is_empty() { &permitted } else { &sensitive };
                if pool.is_empty() {
                    return entries;
                }
                let window_start = at(date, rng.random_range(9..=16), rng.random_range(0..60));
                let mut offsets: Vec<i64> = (0..rng.random_range(5..=15))
                    .map(|_| rng.random_range(0..MASS_DOWNLOAD_WINDOW_MINUTES))
                    .collect();
                offsets.sort_unstable();
                for offset in offsets {
                    let system = pool.choose(rng).copied().unwrap_or_default();
                    let volume = rng.random_range(LARGE_VOLUME_KB + 1..=500_000);
                    let t = window_start + Duration::minutes(offset);
                    entries.push(entry(rng, id, system, AccessAction::DataExport, t, AccessResult::Success, volume, origin, Some(kind)));
                }
            }
            AnomalyKind::AfterHoursAccess => {
                if permitted.is_empty() {
                    return entries;
                }
                for _ in 0..rng.random_range(2..=6) {
                    let hour = *[22, 23, 0, 1, 2, 3, 4, 5].choose(rng).unwrap_or(&23);
                    let t = at(date, hour, rng.random_range(0..60));
                    let system = permitted.choose(rng).copied().unwrap_or_default();
                    let action = *[AccessAction::DataQuery, AccessAction::FileAccess]
                        .choose(rng)
                        .unwrap_or(&AccessAction::DataQuery);
                    let volume = routine_volume(action, rng);
                    entries.push(entry(rng, id, system, action, t, AccessResult::Success, volume, origin, Some(kind)));
                }
            }
            AnomalyKind::UnusualSystemAccess => {
                let foreign: Vec<&str> = self
                    .catalog
                    .systems
                    .iter()
                    .map(|s| s.name.as_str())
                    .filter(|s| !employee.has_active_permission(s))
                    .collect();
                for _ in 0..rng.random_range(1..=4) {
                    let Some(system) = foreign.choose(rng) else {
                        break;
                    };
                    let t = at(date, rng.random_range(10..=17), rng.random_range(0..60));
                    entries.push(entry(rng, id, system, AccessAction::DataQuery, t, AccessResult::Denied, 0, origin, Some(kind)));
                }
            }
            AnomalyKind::PrivilegeEscalation => {
                let pool = if sensitive.is_empty() { &permitted } else { &sensitive };
                for _ in 0..rng.random_range(1..=3) {
                    let Some(system) = pool.choose(rng) else {
                        break;
                    };
                    let t = at(date, rng.random_range(10..=18), rng.random_range(0..60));
                    let volume = routine_volume(AccessAction::PermissionChange, rng);
                    entries.push(entry(rng, id, system, AccessAction::PermissionChange, t, AccessResult::Denied, volume, origin, Some(kind)));
                }
            }
            AnomalyKind::ExternalEmailForwarding => {
                if !employee.has_active_permission("email") {
                    return entries;
                }
                for _ in 0..rng.random_range(1..=5) {
                    let t = at(date, rng.random_range(9..=20), rng.random_range(0..60));
                    let volume = rng.random_range(1_000..=30_000);
                    entries.push(entry(rng, id, "email", AccessAction::EmailForward, t, AccessResult::Success, volume, origin, Some(kind)));
                }
            }
            _ => {}
        }
        entries
    }

    fn violation_attempt<R: Rng + ?Sized>(
        &self,
        employee: &mut Employee,
        directory: &Directory,
        date: NaiveDate,
        rng: &mut R,
    ) -> DayActivity {
        let mut activity = DayActivity::default();

        // Seeded patterns go first, then the general attack mix.
        let seeded = employee
            .anomaly_history
            .iter()
            .position(|a| a.phase == AnomalyPhase::PostResignation && !a.materialized);
        let mut kind = match seeded {
            Some(index) => {
                employee.anomaly_history[index].materialized = true;
                activity.touched.push(employee.id.clone());
                employee.anomaly_history[index].kind
            }
            None => *self.catalog.attack_patterns.choose(rng),
        };
        let colleagues: Vec<&EmployeeId> = directory
            .employed()
            .iter()
            .filter(|id| **id != employee.id)
            .collect();
        kind = match kind {
            AnomalyKind::InsiderBackdoor if employee.role != Role::Technical => {
                AnomalyKind::CredentialReuse
            }
            AnomalyKind::SocialEngineering if colleagues.is_empty() => AnomalyKind::CredentialReuse,
            other => other,
        };

        let origin = self.external(rng);
        let start = at(
            date,
            *OFF_HOURS.choose(rng).unwrap_or(&2),
            rng.random_range(0..60),
        );
        let former: Vec<&str> = employee.permissions.keys().map(String::as_str).collect();
        let id = &employee.id;
        let mut t = start;

        match kind {
            AnomalyKind::VpnBruteForce => {
                let attempts = rng.random_range(10..=50);
                for n in 0..attempts {
                    let last = n + 1 == attempts;
                    let result = if last && retains_access(employee, "vpn") && rng.random_bool(0.5) {
                        AccessResult::Success
                    } else {
                        AccessResult::Failure
                    };
                    activity.entries.push(entry(rng, id, "vpn", AccessAction::VpnConnect, t, result, 0, &origin, Some(kind)));
                    t += Duration::seconds(rng.random_range(2..=10));
                }
            }
            AnomalyKind::InsiderBackdoor => {
                let infrastructure: Vec<&str> = self
                    .catalog
                    .systems
                    .iter()
                    .filter(|s| s.infrastructure)
                    .map(|s| s.name.as_str())
                    .collect();
                for _ in 0..rng.random_range(1..=4) {
                    let Some(system) = infrastructure.choose(rng) else {
                        break;
                    };
                    let action = *[
                        AccessAction::ConfigChange,
                        AccessAction::DataQuery,
                        AccessAction::DataExport,
                    ]
                    .choose(rng)
                    .unwrap_or(&AccessAction::DataQuery);
                    let volume = if action == AccessAction::DataExport {
                        rng.random_range(10_000..=200_000)
                    } else {
                        routine_volume(action, rng)
                    };
                    let result = if rng.random_bool(0.6) {
                        AccessResult::Success
                    } else {
                        AccessResult::Denied
                    };
                    activity.entries.push(entry(rng, id, system, action, t, result, volume, &origin, Some(kind)));
                    t += Duration::minutes(rng.random_range(1..=15));
                }
            }
            AnomalyKind::SocialEngineering => {
                let colleague = colleagues.choose(rng).map(|c| (*c).clone());
                if let Some(colleague) = colleague {
                    for _ in 0..rng.random_range(1..=3) {
                        let system = former.choose(rng).copied().unwrap_or("email");
                        let action = *[AccessAction::Login, AccessAction::DataQuery]
                            .choose(rng)
                            .unwrap_or(&AccessAction::Login);
                        let result = if rng.random_bool(0.5) {
                            AccessResult::Success
                        } else {
                            AccessResult::Denied
                        };
                        let volume = routine_volume(action, rng);
                        let mut e = entry(rng, &colleague, system, action, t, result, volume, &origin, Some(kind));
                        e.attributed_to = Some(id.clone());
                        activity.entries.push(e);
                        t += Duration::minutes(rng.random_range(1..=20));
                    }
                }
            }
            // Credential reuse, and the fallback for infeasible patterns.
            _ => {
                for _ in 0..rng.random_range(2..=6) {
                    let system = former.choose(rng).copied().unwrap_or("email");
                    let result = if retains_access(employee, system) && rng.random_bool(0.7) {
                        AccessResult::Success
                    } else if rng.random_bool(0.85) {
                        AccessResult::Denied
                    } else {
                        AccessResult::Failure
                    };
                    activity.entries.push(entry(rng, id, system, AccessAction::Login, t, result, 0, &origin, Some(kind)));
                    t += Duration::minutes(rng.random_range(1..=10));
                }
            }
        }

        // Every successful access raises an alert and an incident.
        let pattern_severity = self
            .catalog
            .pattern(kind)
            .map_or(Severity::High, |p| p.severity);
        for e in activity.entries.iter().filter(|e| e.result.is_success()) {
            let days = employee.days_since_last_work(e.timestamp).unwrap_or(0);
            let alert = ViolationAlert {
                id: random_uuid(rng),
                employee_id: employee.id.clone(),
                access_log_id: e.id,
                system: e.system.clone(),
                violation_type: kind,
                risk_level: ViolationAlert::risk_level_for(days),
                status: AlertStatus::Pending,
                days_since_last_work: days,
                created_at: e.timestamp,
            };
            let incident = SecurityIncident {
                id: random_uuid(rng),
                alert_id: alert.id,
                employee_id: employee.id.clone(),
                severity: alert.risk_level.max(pattern_severity),
                summary: format!(
                    "{kind} by former employee {} on {} ({days} days after last work day)",
                    employee.id, e.system
                ),
                opened_at: e.timestamp,
            };
            activity.alerts.push(alert);
            activity.incidents.push(incident);
        }

        debug!(
            employee_id = %employee.id,
            pattern = %kind,
            attempts = activity.entries.len(),
            successes = activity.alerts.len(),
            "Violation attempt generated"
        );
        activity
    }

    fn office<R: Rng + ?Sized>(&self, employee: &Employee, date: NaiveDate, rng: &mut R) -> Origin {
        let location = self.catalog.office_locations.choose(rng);
        Origin {
            ip_address: format!(
                "10.{}.{}.{}",
                rng.random_range(1..=40),
                rng.random_range(0..=255),
                rng.random_range(1..=254)
            ),
            geolocation: geo(location),
            session_id: format!(
                "{}-{}-{:04x}",
                employee.id,
                date.format("%Y%m%d"),
                rng.random::<u16>()
            ),
        }
    }

    fn external<R: Rng + ?Sized>(&self, rng: &mut R) -> Origin {
        let location = self.catalog.external_locations.choose(rng);
        Origin {
            ip_address: format!(
                "{}.{}.{}.{}",
                EXTERNAL_FIRST_OCTETS.choose(rng).copied().unwrap_or(185),
                rng.random_range(0..=255),
                rng.random_range(0..=255),
                rng.random_range(1..=254)
            ),
            geolocation: geo(location),
            session_id: format!("ext-{:08x}", rng.random::<u32>()),
        }
    }
}

/// Risk of a single entry, in `[0, 1]`.
pub fn entry_risk_score(
    anomalous: bool,
    timestamp: DateTime<Utc>,
    ip_address: &str,
    result: AccessResult,
    data_volume_kb: u64,
) -> f64 {
    let mut risk = 0.1;
    if anomalous {
        risk += 0.5;
    }
    if !(WORK_WINDOW_START_HOUR..WORK_WINDOW_END_HOUR).contains(&timestamp.hour()) {
        risk += 0.3;
    }
    if !is_internal_ip(ip_address) {
        risk += 0.2;
    }
    if !result.is_success() {
        risk += 0.2;
    }
    if data_volume_kb > LARGE_VOLUME_KB {
        risk += 0.3;
    }
    f64::min(risk, 1.0)
}

#[allow(clippy::too_many_arguments)]
fn entry<R: Rng + ?Sized>(
    rng: &mut R,
    user_id: &EmployeeId,
    system: &str,
    action: AccessAction,
    timestamp: DateTime<Utc>,
    result: AccessResult,
    data_volume_kb: u64,
    origin: &Origin,
    anomaly_kind: Option<AnomalyKind>,
) -> AccessLogEntry {
    let anomalous = anomaly_kind.is_some();
    let risk_score = entry_risk_score(anomalous, timestamp, &origin.ip_address, result, data_volume_kb);
    AccessLogEntry {
        id: random_uuid(rng),
        user_id: user_id.clone(),
        system: system.to_string(),
        action,
        timestamp,
        result,
        risk_score,
        is_suspicious: anomalous || risk_score > SUSPICIOUS_RISK,
        anomalous,
        anomaly_kind,
        ip_address: origin.ip_address.clone(),
        geolocation: origin.geolocation.clone(),
        data_volume_kb,
        session_id: origin.session_id.clone(),
        attributed_to: None,
    }
}

fn routine_volume<R: Rng + ?Sized>(action: AccessAction, rng: &mut R) -> u64 {
    match action {
        AccessAction::Login | AccessAction::Logout | AccessAction::VpnConnect => 0,
        AccessAction::FileAccess => rng.random_range(50..=5_000),
        AccessAction::DataQuery => rng.random_range(10..=2_000),
        AccessAction::DataModify => rng.random_range(5..=500),
        AccessAction::DataExport => rng.random_range(1_000..=20_000),
        AccessAction::EmailForward => rng.random_range(10..=3_000),
        AccessAction::PermissionChange | AccessAction::ConfigChange => rng.random_range(1..=50),
    }
}

/// Whether a departed employee still has a way into `system`.
fn retains_access(employee: &Employee, system: &str) -> bool {
    employee.has_active_permission(system)
        || employee
            .accounts
            .values()
            .any(|a| a.system == system && a.is_active())
}

fn geo(location: Option<&Location>) -> GeoLocation {
    location.map_or_else(
        || GeoLocation {
            city: "Unknown".into(),
            country: "ZZ".into(),
        },
        |l| GeoLocation {
            city: l.city.clone(),
            country: l.country.clone(),
        },
    )
}

/// `date` at `hour:minute` UTC.
fn at(date: NaiveDate, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
        + Duration::hours(i64::from(hour))
        + Duration::minutes(i64::from(minute))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::EntityFactory;
    use crate::lifecycle::{LifecycleEngine, ResignationRequest};
    use offsim_core::models::employee::ResignationType;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn setup(config: EngineConfig) -> (AccessLogGenerator, LifecycleEngine, EntityFactory, StdRng) {
        let catalog = Arc::new(Catalog::standard().unwrap());
        (
            AccessLogGenerator::new(catalog.clone(), config.clone()),
            LifecycleEngine::new(catalog.clone(), config).unwrap(),
            EntityFactory::new(catalog),
            StdRng::seed_from_u64(8),
        )
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
    }

    fn risky_resignation() -> ResignationRequest {
        ResignationRequest {
            resignation_type: Some(ResignationType::Involuntary),
            reason: Some("violation of discipline".into()),
            urgent: Some(true),
        }
    }

    #[test]
    fn entry_risk_components() {
        let noon = at(date(), 12, 0);
        let night = at(date(), 23, 0);
        assert!((entry_risk_score(false, noon, "10.1.1.1", AccessResult::Success, 10) - 0.1).abs() < 1e-9);
        assert!((entry_risk_score(false, night, "10.1.1.1", AccessResult::Success, 10) - 0.4).abs() < 1e-9);
        assert!((entry_risk_score(false, noon, "8.8.8.8", AccessResult::Denied, 10) - 0.5).abs() < 1e-9);
        assert_eq!(entry_risk_score(true, night, "8.8.8.8", AccessResult::Failure, 60_000), 1.0);
    }

    #[test]
    fn routine_day_is_ordered_and_bracketed() {
        let (generator, _, factory, mut rng) = setup(EngineConfig::default());
        let mut employees = vec![factory.create_employee_with_role(Role::Technical, &mut rng, date())];
        let day = generator.generate_day(&mut employees, date(), &mut rng);

        assert!(!day.entries.is_empty());
        assert!(day.entries.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
        assert!(day.entries.iter().all(|e| !e.anomalous));
        let first = day.entries.first().unwrap();
        assert!(matches!(first.action, AccessAction::Login | AccessAction::VpnConnect));
        assert_eq!(day.entries.last().unwrap().action, AccessAction::Logout);
        for e in &day.entries {
            assert!((0.0..=1.0).contains(&e.risk_score));
            assert_eq!(e.is_suspicious, e.anomalous || e.risk_score > SUSPICIOUS_RISK);
        }
    }

    #[test]
    fn unknown_employee_produces_nothing() {
        let (generator, _, factory, mut rng) = setup(EngineConfig::default());
        let mut stranger = factory.create_employee(&mut rng, date());
        let directory = Directory::default();
        let activity = generator.generate_for_employee(&mut stranger, &directory, date(), &mut rng);
        assert!(activity.entries.is_empty());
    }

    #[test]
    fn risky_pending_employee_materializes_mass_download() {
        let (generator, engine, factory, mut rng) = setup(EngineConfig::default());
        let mut employee = factory.create_employee_with_role(Role::Technical, &mut rng, date());
        let now = at(date(), 9, 0) - Duration::days(1);
        engine
            .initiate_resignation(&mut employee, risky_resignation(), &mut rng, now)
            .unwrap();
        assert!(employee.resignation_risk_score > 0.6);
        employee.anomaly_history.clear();
        employee.anomaly_history.push(crate::lifecycle::inject(
            generator.catalog.pattern(AnomalyKind::MassDownload).unwrap(),
            &employee.id,
            &mut rng,
            now,
        ));

        let mut employees = vec![employee];
        let day = generator.generate_day(&mut employees, date(), &mut rng);
        let downloads: Vec<_> = day
            .entries
            .iter()
            .filter(|e| e.anomaly_kind == Some(AnomalyKind::MassDownload))
            .collect();
        assert!((5..=15).contains(&downloads.len()));
        assert!(downloads.iter().all(|e| e.data_volume_kb > LARGE_VOLUME_KB));
        let span = downloads.last().unwrap().timestamp - downloads[0].timestamp;
        assert!(span < Duration::hours(2));
        assert!(
            employees[0]
                .pending_anomalies(AnomalyPhase::PreResignation)
                .next()
                .is_none()
        );
        assert_eq!(day.touched, vec![employees[0].id.clone()]);
    }

    fn resigned_employee(
        engine: &LifecycleEngine,
        factory: &EntityFactory,
        rng: &mut StdRng,
        role: Role,
    ) -> Employee {
        let mut employee = factory.create_employee_with_role(role, rng, date());
        let start = at(date(), 10, 0) - Duration::days(40);
        engine
            .initiate_resignation(&mut employee, risky_resignation(), rng, start)
            .unwrap();
        let due = employee.last_work_date().unwrap();
        engine.complete_resignation(&mut employee, &[], rng, due).unwrap();
        employee
    }

    #[test]
    fn grace_period_halves_violation_probability() {
        let (generator, engine, factory, mut rng) = setup(EngineConfig::default());
        let mut employee = resigned_employee(&engine, &factory, &mut rng, Role::Sales);
        let last = employee.last_work_date().unwrap().date_naive();
        let base = generator.config.violation_rate * employee.resignation_risk_score;

        let p3 = generator.violation_probability(&employee, last + Duration::days(3));
        let p10 = generator.violation_probability(&employee, last + Duration::days(10));
        assert!((p3 - base * 0.5).abs() < 1e-12);
        assert!((p10 - base).abs() < 1e-12);

        employee.resignation_risk_score = 0.0;
        assert_eq!(generator.violation_probability(&employee, last + Duration::days(10)), 0.0);
    }

    #[test]
    fn violation_attempts_come_from_outside_at_odd_hours() {
        let config = EngineConfig {
            violation_rate: 1.0,
            ..Default::default()
        };
        let (generator, engine, factory, mut rng) = setup(config);
        let mut employees: Vec<Employee> = (0..5)
            .map(|_| factory.create_employee(&mut rng, date()))
            .collect();
        for _ in 0..10 {
            employees.push(resigned_employee(&engine, &factory, &mut rng, Role::Technical));
        }
        let resigned: BTreeSet<EmployeeId> = employees
            .iter()
            .filter(|e| e.is_resigned())
            .map(|e| e.id.clone())
            .collect();

        let mut saw_attempt = false;
        for offset in 0..10 {
            let day = generator.generate_day(&mut employees, date() + Duration::days(offset), &mut rng);
            for e in day.entries.iter().filter(|e| e.anomalous) {
                saw_attempt = true;
                assert!(!is_internal_ip(&e.ip_address));
                assert!(e.risk_score >= 0.8 - 1e-9);
                assert!(e.is_suspicious);
                let actor = e.attributed_to.as_ref().unwrap_or(&e.user_id);
                assert!(resigned.contains(actor));
                if e.anomaly_kind == Some(AnomalyKind::SocialEngineering) {
                    assert!(!resigned.contains(&e.user_id));
                }
            }
            for alert in &day.alerts {
                assert!(resigned.contains(&alert.employee_id));
                let source = day.entries.iter().find(|e| e.id == alert.access_log_id).unwrap();
                assert!(source.result.is_success());
            }
            assert_eq!(day.alerts.len(), day.incidents.len());
        }
        assert!(saw_attempt);
    }

    #[test]
    fn backdoor_is_reserved_for_technical_staff() {
        let config = EngineConfig {
            violation_rate: 1.0,
            ..Default::default()
        };
        let (generator, engine, factory, mut rng) = setup(config);
        let mut employees: Vec<Employee> = (0..10)
            .map(|_| resigned_employee(&engine, &factory, &mut rng, Role::Sales))
            .collect();
        for offset in 0..10 {
            let day = generator.generate_day(&mut employees, date() + Duration::days(offset), &mut rng);
            assert!(
                day.entries
                    .iter()
                    .all(|e| e.anomaly_kind != Some(AnomalyKind::InsiderBackdoor))
            );
        }
    }
}
