//! Statistics, health assessment and compliance monitoring.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use offsim_core::ids::EmployeeId;
use offsim_core::models::access_log::AccessLogEntry;
use offsim_core::models::alert::{AlertStatus, SecurityIncident, ViolationAlert};
use offsim_core::models::employee::{Employee, EmploymentStatus, ResignationType};
use offsim_core::models::severity::Severity;
use offsim_core::models::transfer::{TransferRecord, TransferStatus};
use serde::Serialize;

/// Transfer success rate below which the health score is penalized.
pub const TRANSFER_SUCCESS_TARGET: f64 = 0.95;

/// Pending alert count above which the health score is penalized.
pub const PENDING_ALERT_LIMIT: usize = 10;

/// Resignation risk counted as high.
pub const HIGH_RISK_SCORE: f64 = 0.6;

#[derive(Debug, Clone, Default, Serialize)]
pub struct HrStatistics {
    pub total_employees: usize,
    pub active: usize,
    pub resignation_pending: usize,
    pub resigned: usize,
    pub voluntary: usize,
    pub involuntary: usize,
    pub urgent: usize,
    /// Mean risk of pending and resigned employees.
    pub average_risk_score: f64,
    pub high_risk_employees: usize,
    pub accounts_retained: usize,
    pub transfer_records: usize,
    pub transfers_completed: usize,
    pub transfers_failed: usize,
    pub transfers_unresolved: usize,
    /// Completed share of resolved transfers; 1.0 when none resolved.
    pub transfer_success_rate: f64,
}

pub fn hr_statistics(employees: &[Employee], transfers: &[TransferRecord]) -> HrStatistics {
    let mut stats = HrStatistics {
        total_employees: employees.len(),
        transfer_records: transfers.len(),
        ..Default::default()
    };

    let mut risk_total = 0.0;
    let mut leavers = 0_u32;
    for employee in employees {
        match employee.status {
            EmploymentStatus::Active => stats.active += 1,
            EmploymentStatus::ResignationPending => stats.resignation_pending += 1,
            EmploymentStatus::Resigned => {
                stats.resigned += 1;
                stats.accounts_retained += employee.active_accounts().count();
            }
        }
        if let Some(info) = &employee.resignation {
            match info.resignation_type {
                ResignationType::Voluntary => stats.voluntary += 1,
                ResignationType::Involuntary => stats.involuntary += 1,
            }
            if info.urgent {
                stats.urgent += 1;
            }
            leavers += 1;
            risk_total += employee.resignation_risk_score;
            if employee.resignation_risk_score > HIGH_RISK_SCORE {
                stats.high_risk_employees += 1;
            }
        }
    }
    if leavers > 0 {
        stats.average_risk_score = risk_total / f64::from(leavers);
    }

    for record in transfers {
        match record.status {
            TransferStatus::Transferred => stats.transfers_completed += 1,
            TransferStatus::Failed => stats.transfers_failed += 1,
            TransferStatus::Pending | TransferStatus::AwaitingApproval => {
                stats.transfers_unresolved += 1
            }
        }
    }
    let resolved = stats.transfers_completed + stats.transfers_failed;
    stats.transfer_success_rate = if resolved == 0 {
        1.0
    } else {
        stats.transfers_completed as f64 / resolved as f64
    };
    stats
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ViolationStatistics {
    pub total_access_logs: usize,
    pub suspicious_logs: usize,
    pub anomalous_logs: usize,
    pub alerts: usize,
    pub pending_alerts: usize,
    /// Alerts at high or critical risk.
    pub high_risk_alerts: usize,
    pub incidents: usize,
    pub alerts_by_type: BTreeMap<String, usize>,
    pub alerts_by_system: BTreeMap<String, usize>,
}

pub fn violation_statistics(
    logs: &[AccessLogEntry],
    alerts: &[ViolationAlert],
    incidents: &[SecurityIncident],
) -> ViolationStatistics {
    let mut stats = ViolationStatistics {
        total_access_logs: logs.len(),
        suspicious_logs: logs.iter().filter(|e| e.is_suspicious).count(),
        anomalous_logs: logs.iter().filter(|e| e.anomalous).count(),
        alerts: alerts.len(),
        incidents: incidents.len(),
        ..Default::default()
    };
    for alert in alerts {
        if alert.status == AlertStatus::Pending {
            stats.pending_alerts += 1;
        }
        if alert.risk_level.is_high_or_above() {
            stats.high_risk_alerts += 1;
        }
        *stats
            .alerts_by_type
            .entry(alert.violation_type.to_string())
            .or_default() += 1;
        *stats
            .alerts_by_system
            .entry(alert.system.clone())
            .or_default() += 1;
    }
    stats
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncStatistics {
    pub last_sync_time: Option<DateTime<Utc>>,
    pub sync_running: bool,
    pub next_scheduled_sync: Option<DateTime<Utc>>,
    pub sync_frequency_secs: u64,
    pub full_extract_time_limit_secs: f64,
    pub incremental_sync_time_limit_secs: f64,
    pub completed_syncs: u64,
    pub skipped_syncs: u64,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HealthLevel {
    Excellent,
    Good,
    Fair,
    NeedsAttention,
}

impl HealthLevel {
    pub fn from_score(score: u32) -> Self {
        match score {
            90.. => HealthLevel::Excellent,
            75..=89 => HealthLevel::Good,
            60..=74 => HealthLevel::Fair,
            _ => HealthLevel::NeedsAttention,
        }
    }
}

impl fmt::Display for HealthLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HealthLevel::Excellent => "excellent",
            HealthLevel::Good => "good",
            HealthLevel::Fair => "fair",
            HealthLevel::NeedsAttention => "needs attention",
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthAssessment {
    pub score: u32,
    pub level: HealthLevel,
    pub issues: Vec<String>,
}

/// Start at 100 and deduct per problem area.
pub fn assess_health(hr: &HrStatistics, violations: &ViolationStatistics) -> HealthAssessment {
    let mut score: u32 = 100;
    let mut issues = Vec::new();

    if hr.transfer_success_rate < TRANSFER_SUCCESS_TARGET {
        score -= 20;
        issues.push(format!(
            "transfer success rate {:.1}% below {:.0}%",
            hr.transfer_success_rate * 100.0,
            TRANSFER_SUCCESS_TARGET * 100.0
        ));
    }
    if violations.high_risk_alerts > 0 {
        score -= 15;
        issues.push(format!(
            "{} high-risk violation alerts",
            violations.high_risk_alerts
        ));
    }
    if violations.pending_alerts > PENDING_ALERT_LIMIT {
        score -= 10;
        issues.push(format!("{} alerts pending review", violations.pending_alerts));
    }

    HealthAssessment {
        score,
        level: HealthLevel::from_score(score),
        issues,
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceIssueKind {
    AccountNotDisabled,
    IncompleteTransfer,
    OverdueRevocation,
}

impl fmt::Display for ComplianceIssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ComplianceIssueKind::AccountNotDisabled => "account not disabled",
            ComplianceIssueKind::IncompleteTransfer => "incomplete transfer",
            ComplianceIssueKind::OverdueRevocation => "overdue revocation",
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ComplianceIssue {
    pub employee_id: EmployeeId,
    pub kind: ComplianceIssueKind,
    pub system: String,
    pub severity: Severity,
    pub detail: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ComplianceReport {
    pub checked_employees: usize,
    pub issues: Vec<ComplianceIssue>,
}

impl ComplianceReport {
    pub fn count(&self, kind: ComplianceIssueKind) -> usize {
        self.issues.iter().filter(|i| i.kind == kind).count()
    }

    pub fn is_compliant(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Scan resigned employees for access that outlived their employment.
pub fn compliance_issues(
    employees: &[Employee],
    transfers: &[TransferRecord],
    now: DateTime<Utc>,
) -> ComplianceReport {
    let mut report = ComplianceReport::default();
    for employee in employees.iter().filter(|e| e.is_resigned()) {
        report.checked_employees += 1;

        for account in employee.active_accounts() {
            report.issues.push(ComplianceIssue {
                employee_id: employee.id.clone(),
                kind: ComplianceIssueKind::AccountNotDisabled,
                system: account.system.clone(),
                severity: if account.privileged {
                    Severity::Critical
                } else {
                    Severity::High
                },
                detail: format!(
                    "{} account still active{}",
                    account.account_type,
                    account
                        .retention_reason
                        .as_ref()
                        .map(|r| format!(" ({r})"))
                        .unwrap_or_default()
                ),
            });
        }

        for permission in employee.permissions.values().filter(|p| p.is_active()) {
            match permission.scheduled_revocation {
                Some(due) if due > now => {}
                Some(due) => report.issues.push(ComplianceIssue {
                    employee_id: employee.id.clone(),
                    kind: ComplianceIssueKind::OverdueRevocation,
                    system: permission.system.clone(),
                    severity: Severity::High,
                    detail: format!("revocation due {} not applied", due.to_rfc3339()),
                }),
                None => report.issues.push(ComplianceIssue {
                    employee_id: employee.id.clone(),
                    kind: ComplianceIssueKind::OverdueRevocation,
                    system: permission.system.clone(),
                    severity: Severity::High,
                    detail: "permission active with no revocation scheduled".into(),
                }),
            }
        }

        for record in transfers.iter().filter(|r| {
            r.employee_id == employee.id
                && (r.status.is_unresolved() || r.status == TransferStatus::Failed)
        }) {
            report.issues.push(ComplianceIssue {
                employee_id: employee.id.clone(),
                kind: ComplianceIssueKind::IncompleteTransfer,
                system: record.system.clone(),
                severity: Severity::Medium,
                detail: format!("transfer {} is {}", record.id, record.status),
            });
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hr(rate: f64) -> HrStatistics {
        HrStatistics {
            transfer_success_rate: rate,
            ..Default::default()
        }
    }

    fn violations(high: usize, pending: usize) -> ViolationStatistics {
        ViolationStatistics {
            high_risk_alerts: high,
            pending_alerts: pending,
            ..Default::default()
        }
    }

    #[test]
    fn healthy_system_scores_full_marks() {
        let health = assess_health(&hr(1.0), &violations(0, 0));
        assert_eq!(health.score, 100);
        assert_eq!(health.level, HealthLevel::Excellent);
        assert!(health.issues.is_empty());
    }

    #[test]
    fn every_penalty_applies() {
        let health = assess_health(&hr(0.9), &violations(2, 11));
        assert_eq!(health.score, 55);
        assert_eq!(health.level, HealthLevel::NeedsAttention);
        assert_eq!(health.issues.len(), 3);
    }

    #[test]
    fn penalty_thresholds_are_exclusive() {
        let health = assess_health(&hr(0.95), &violations(0, 10));
        assert_eq!(health.score, 100);
    }

    #[test]
    fn level_boundaries() {
        assert_eq!(HealthLevel::from_score(90), HealthLevel::Excellent);
        assert_eq!(HealthLevel::from_score(85), HealthLevel::Good);
        assert_eq!(HealthLevel::from_score(75), HealthLevel::Good);
        assert_eq!(HealthLevel::from_score(65), HealthLevel::Fair);
        assert_eq!(HealthLevel::from_score(59), HealthLevel::NeedsAttention);
    }

    #[test]
    fn empty_transfer_set_counts_as_successful() {
        let stats = hr_statistics(&[], &[]);
        assert_eq!(stats.transfer_success_rate, 1.0);
        assert_eq!(stats.average_risk_score, 0.0);
    }
}
