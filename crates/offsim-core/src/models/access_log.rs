//! System access log model.

use std::fmt;

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::anomaly::AnomalyKind;
use crate::ids::EmployeeId;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AccessAction {
    Login,
    Logout,
    FileAccess,
    DataQuery,
    DataModify,
    DataExport,
    PermissionChange,
    ConfigChange,
    EmailForward,
    VpnConnect,
}

impl AccessAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessAction::Login => "login",
            AccessAction::Logout => "logout",
            AccessAction::FileAccess => "file_access",
            AccessAction::DataQuery => "data_query",
            AccessAction::DataModify => "data_modify",
            AccessAction::DataExport => "data_export",
            AccessAction::PermissionChange => "permission_change",
            AccessAction::ConfigChange => "config_change",
            AccessAction::EmailForward => "email_forward",
            AccessAction::VpnConnect => "vpn_connect",
        }
    }
}

impl fmt::Display for AccessAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AccessResult {
    Success,
    Failure,
    Denied,
}

impl AccessResult {
    pub fn is_success(&self) -> bool {
        *self == AccessResult::Success
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GeoLocation {
    pub city: String,
    pub country: String,
}

/// Data volume above which an access counts as a large transfer (KB).
pub const LARGE_VOLUME_KB: u64 = 50_000;

/// First hour of the sanctioned access window (inclusive).
pub const WORK_WINDOW_START_HOUR: u32 = 6;
/// End of the sanctioned access window (exclusive).
pub const WORK_WINDOW_END_HOUR: u32 = 22;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessLogEntry {
    pub id: Uuid,
    pub user_id: EmployeeId,
    pub system: String,
    pub action: AccessAction,
    pub timestamp: DateTime<Utc>,
    pub result: AccessResult,
    pub risk_score: f64,
    pub is_suspicious: bool,
    /// Injected on purpose by the generator.
    pub anomalous: bool,
    pub anomaly_kind: Option<AnomalyKind>,
    pub ip_address: String,
    pub geolocation: GeoLocation,
    pub data_volume_kb: u64,
    pub session_id: String,
    /// Resigned employee actually behind an impersonated access.
    pub attributed_to: Option<EmployeeId>,
}

impl AccessLogEntry {
    pub fn is_off_hours(&self) -> bool {
        let hour = self.timestamp.hour();
        !(WORK_WINDOW_START_HOUR..WORK_WINDOW_END_HOUR).contains(&hour)
    }
}

/// Addresses handed out on the corporate network.
pub fn is_internal_ip(ip: &str) -> bool {
    ip.starts_with("10.") || ip.starts_with("192.168.")
}
