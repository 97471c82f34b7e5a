//! Employee domain model.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::account::Account;
use super::anomaly::{AnomalyEvent, AnomalyPhase};
use super::permission::Permission;
use crate::ids::EmployeeId;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Executive,
    Finance,
    Technical,
    Sales,
    Hr,
    General,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::Executive,
        Role::Finance,
        Role::Technical,
        Role::Sales,
        Role::Hr,
        Role::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Executive => "executive",
            Role::Finance => "finance",
            Role::Technical => "technical",
            Role::Sales => "sales",
            Role::Hr => "hr",
            Role::General => "general",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentStatus {
    Active,
    ResignationPending,
    Resigned,
}

impl EmploymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmploymentStatus::Active => "active",
            EmploymentStatus::ResignationPending => "resignation_pending",
            EmploymentStatus::Resigned => "resigned",
        }
    }
}

impl fmt::Display for EmploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ResignationType {
    Voluntary,
    Involuntary,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum SecurityClearance {
    Public,
    Internal,
    Confidential,
    Secret,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WorkPattern {
    Standard,
    EarlyBird,
    NightOwl,
    Flexible,
}

/// Working habits used to shape generated access sequences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehaviorProfile {
    pub work_pattern: WorkPattern,
    /// Hour of the first login on a normal day.
    pub typical_login_hour: u32,
    pub avg_session_minutes: u32,
    /// Share of activity outside office hours, `[0, 1]`.
    pub after_hours_ratio: f64,
    /// Tendency to pull data in bulk, `[0, 1]`.
    pub bulk_download_tendency: f64,
    pub prior_policy_violations: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResignationInfo {
    pub resignation_type: ResignationType,
    pub reason: String,
    pub risk_multiplier: f64,
    /// Date the notice was handed in.
    pub resignation_date: DateTime<Utc>,
    pub last_work_date: DateTime<Utc>,
    pub urgent: bool,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    pub email: String,
    pub department: String,
    pub title: String,
    pub role: Role,
    pub status: EmploymentStatus,
    pub hire_date: NaiveDate,
    pub performance_rating: f64,
    pub security_clearance: SecurityClearance,
    pub resignation: Option<ResignationInfo>,
    pub resignation_risk_score: f64,
    /// Keyed by `{system}:{account_type}`.
    pub accounts: BTreeMap<String, Account>,
    /// Keyed by system.
    pub permissions: BTreeMap<String, Permission>,
    pub behavior_profile: BehaviorProfile,
    pub anomaly_history: Vec<AnomalyEvent>,
}

impl Employee {
    pub fn is_active(&self) -> bool {
        self.status == EmploymentStatus::Active
    }

    pub fn is_resigned(&self) -> bool {
        self.status == EmploymentStatus::Resigned
    }

    pub fn resignation_date(&self) -> Option<DateTime<Utc>> {
        self.resignation.as_ref().map(|r| r.resignation_date)
    }

    pub fn last_work_date(&self) -> Option<DateTime<Utc>> {
        self.resignation.as_ref().map(|r| r.last_work_date)
    }

    pub fn active_accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values().filter(|a| a.is_active())
    }

    pub fn has_active_permission(&self, system: &str) -> bool {
        self.permissions
            .get(system)
            .is_some_and(|p| p.is_active())
    }

    /// Anomalies of a phase that have not yet been rendered into logs.
    pub fn pending_anomalies(&self, phase: AnomalyPhase) -> impl Iterator<Item = &AnomalyEvent> {
        self.anomaly_history
            .iter()
            .filter(move |a| a.phase == phase && !a.materialized)
    }

    /// Whole days between the last work date and `now`; `None` when no
    /// resignation is on record.
    pub fn days_since_last_work(&self, now: DateTime<Utc>) -> Option<i64> {
        self.last_work_date()
            .map(|last| (now.date_naive() - last.date_naive()).num_days())
    }
}
