//! Violation alerts and the security incidents opened for them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::anomaly::AnomalyKind;
use super::severity::Severity;
use crate::ids::EmployeeId;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AlertStatus {
    Pending,
    Resolved,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViolationAlert {
    pub id: Uuid,
    /// The resigned employee responsible for the access.
    pub employee_id: EmployeeId,
    pub access_log_id: Uuid,
    pub system: String,
    pub violation_type: AnomalyKind,
    pub risk_level: Severity,
    pub status: AlertStatus,
    pub days_since_last_work: i64,
    pub created_at: DateTime<Utc>,
}

impl ViolationAlert {
    /// Risk grows with the time elapsed since the last work day.
    pub fn risk_level_for(days_since_last_work: i64) -> Severity {
        if days_since_last_work <= 7 {
            Severity::Medium
        } else if days_since_last_work <= 30 {
            Severity::High
        } else {
            Severity::Critical
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityIncident {
    pub id: Uuid,
    pub alert_id: Uuid,
    pub employee_id: EmployeeId,
    pub severity: Severity,
    pub summary: String,
    pub opened_at: DateTime<Utc>,
}
