//! Account transfer (handover) record model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::account::AccountType;
use super::severity::Severity;
use crate::ids::EmployeeId;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TransferStatus {
    Pending,
    Transferred,
    Failed,
    AwaitingApproval,
}

impl TransferStatus {
    /// Still waiting to be resolved at resignation completion.
    pub fn is_unresolved(&self) -> bool {
        matches!(self, TransferStatus::Pending | TransferStatus::AwaitingApproval)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransferStatus::Pending => "pending",
            TransferStatus::Transferred => "transferred",
            TransferStatus::Failed => "failed",
            TransferStatus::AwaitingApproval => "awaiting_approval",
        }
    }
}

impl fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum BusinessImpact {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceTag {
    Sox,
    Pipl,
    Iso27001,
    Gdpr,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRecord {
    pub id: Uuid,
    pub employee_id: EmployeeId,
    /// Key of the account in the employee's account map.
    pub account_key: String,
    pub account_id: String,
    pub system: String,
    pub account_type: AccountType,
    pub transfer_to: String,
    pub status: TransferStatus,
    pub risk_level: Severity,
    pub business_impact: BusinessImpact,
    pub compliance_tags: Vec<ComplianceTag>,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}
