//! Cross-dataset consistency checks.
//!
//! Run after every generation batch. Findings are reported, never
//! repaired.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use offsim_core::ids::EmployeeId;
use offsim_core::models::access_log::AccessLogEntry;
use offsim_core::models::employee::Employee;
use offsim_core::models::transfer::TransferRecord;
use serde::Serialize;

/// Orphaned actor ids listed in a finding.
const ORPHAN_SAMPLE_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "finding", rename_all = "snake_case")]
pub enum Finding {
    /// Log entries whose actor is not in the employee set.
    OrphanedAccessLogs {
        count: usize,
        sample: Vec<EmployeeId>,
    },
    /// A resigned employee with accounts lacking a transfer record.
    TransferDeficit {
        employee_id: EmployeeId,
        accounts: usize,
        covered: usize,
    },
    /// Notice handed in after the last work day.
    DateOrderViolation {
        employee_id: EmployeeId,
        resignation_date: DateTime<Utc>,
        last_work_date: DateTime<Utc>,
    },
}

impl Finding {
    pub fn kind(&self) -> &'static str {
        match self {
            Finding::OrphanedAccessLogs { .. } => "orphaned_access_logs",
            Finding::TransferDeficit { .. } => "transfer_deficit",
            Finding::DateOrderViolation { .. } => "date_order_violation",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ConsistencyReport {
    pub findings: Vec<Finding>,
    pub checked_employees: usize,
    pub checked_logs: usize,
    pub checked_transfers: usize,
}

impl ConsistencyReport {
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn orphaned_logs(&self) -> usize {
        self.findings
            .iter()
            .map(|f| match f {
                Finding::OrphanedAccessLogs { count, .. } => *count,
                _ => 0,
            })
            .sum()
    }

    /// Accounts without a transfer record, summed over employees.
    pub fn transfer_deficit(&self) -> usize {
        self.findings
            .iter()
            .map(|f| match f {
                Finding::TransferDeficit {
                    accounts, covered, ..
                } => accounts - covered,
                _ => 0,
            })
            .sum()
    }

    pub fn date_violations(&self) -> usize {
        self.findings
            .iter()
            .filter(|f| matches!(f, Finding::DateOrderViolation { .. }))
            .count()
    }
}

pub struct ConsistencyChecker;

impl ConsistencyChecker {
    pub fn check(
        employees: &[Employee],
        logs: &[AccessLogEntry],
        transfers: &[TransferRecord],
    ) -> ConsistencyReport {
        let mut report = ConsistencyReport {
            checked_employees: employees.len(),
            checked_logs: logs.len(),
            checked_transfers: transfers.len(),
            ..Default::default()
        };
        let known: BTreeSet<&EmployeeId> = employees.iter().map(|e| &e.id).collect();

        // Every actor, direct or attributed, must resolve.
        let mut orphans = BTreeSet::new();
        let mut orphan_count = 0;
        for entry in logs {
            let unresolved = !known.contains(&entry.user_id)
                || entry
                    .attributed_to
                    .as_ref()
                    .is_some_and(|id| !known.contains(id));
            if unresolved {
                orphan_count += 1;
                orphans.insert(entry.user_id.clone());
            }
        }
        if orphan_count > 0 {
            report.findings.push(Finding::OrphanedAccessLogs {
                count: orphan_count,
                sample: orphans.into_iter().take(ORPHAN_SAMPLE_SIZE).collect(),
            });
        }

        let mut covered: BTreeMap<&EmployeeId, BTreeSet<&str>> = BTreeMap::new();
        for record in transfers {
            covered
                .entry(&record.employee_id)
                .or_default()
                .insert(record.account_key.as_str());
        }

        for employee in employees {
            if employee.is_resigned() {
                let keys = covered.get(&employee.id);
                let accounts = employee.accounts.len();
                let with_record = employee
                    .accounts
                    .values()
                    .filter(|a| keys.is_some_and(|k| k.contains(a.key().as_str())))
                    .count();
                if with_record < accounts {
                    report.findings.push(Finding::TransferDeficit {
                        employee_id: employee.id.clone(),
                        accounts,
                        covered: with_record,
                    });
                }
            }

            if let Some(info) = &employee.resignation {
                if info.resignation_date > info.last_work_date {
                    report.findings.push(Finding::DateOrderViolation {
                        employee_id: employee.id.clone(),
                        resignation_date: info.resignation_date,
                        last_work_date: info.last_work_date,
                    });
                }
            }
        }
        report
    }
}
