//! Account domain model.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::EmployeeId;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    Domain,
    Email,
    Vpn,
    Database,
    Application,
    Admin,
}

impl AccountType {
    /// Administrative and database accounts grant elevated access.
    pub fn is_privileged(&self) -> bool {
        matches!(self, AccountType::Admin | AccountType::Database)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Domain => "domain",
            AccountType::Email => "email",
            AccountType::Vpn => "vpn",
            AccountType::Database => "database",
            AccountType::Application => "application",
            AccountType::Admin => "admin",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    Active,
    Disabled,
}

/// Why an account is still active after its owner left.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RetentionReason {
    DisableOversight,
}

impl fmt::Display for RetentionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetentionReason::DisableOversight => f.write_str("disable oversight"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// `{employee_id}_{system}_{account_type}`.
    pub account_id: String,
    pub owner: EmployeeId,
    pub system: String,
    pub account_type: AccountType,
    pub status: AccountStatus,
    pub privileged: bool,
    pub created_date: NaiveDate,
    pub disabled_date: Option<DateTime<Utc>>,
    pub retention_reason: Option<RetentionReason>,
}

impl Account {
    pub fn new(
        owner: EmployeeId,
        system: impl Into<String>,
        account_type: AccountType,
        created_date: NaiveDate,
    ) -> Self {
        let system = system.into();
        Self {
            account_id: format!("{owner}_{system}_{account_type}"),
            owner,
            system,
            account_type,
            status: AccountStatus::Active,
            privileged: account_type.is_privileged(),
            created_date,
            disabled_date: None,
            retention_reason: None,
        }
    }

    /// Key under which the owning employee stores this account.
    pub fn key(&self) -> String {
        account_key(&self.system, self.account_type)
    }

    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }
}

/// Accounts are keyed by system + type.
pub fn account_key(system: &str, account_type: AccountType) -> String {
    format!("{system}:{account_type}")
}
