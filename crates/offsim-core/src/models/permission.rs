//! Permission domain model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::EmployeeId;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    Read,
    ReadWrite,
    Admin,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PermissionStatus {
    Active,
    Revoked,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Permission {
    pub owner: EmployeeId,
    pub system: String,
    pub access_level: AccessLevel,
    pub status: PermissionStatus,
    pub granted_date: NaiveDate,
    pub revoked_date: Option<DateTime<Utc>>,
    /// Set when revocation was deferred during offboarding.
    pub scheduled_revocation: Option<DateTime<Utc>>,
}

impl Permission {
    pub fn new(
        owner: EmployeeId,
        system: impl Into<String>,
        access_level: AccessLevel,
        granted_date: NaiveDate,
    ) -> Self {
        Self {
            owner,
            system: system.into(),
            access_level,
            status: PermissionStatus::Active,
            granted_date,
            revoked_date: None,
            scheduled_revocation: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == PermissionStatus::Active
    }

    pub fn revoke(&mut self, at: DateTime<Utc>) {
        self.status = PermissionStatus::Revoked;
        self.revoked_date = Some(at);
        self.scheduled_revocation = None;
    }
}
