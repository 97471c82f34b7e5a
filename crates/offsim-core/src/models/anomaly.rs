//! Injected anomaly events.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::severity::Severity;
use crate::ids::EmployeeId;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyPhase {
    PreResignation,
    PostResignation,
    Process,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    // Pre-resignation behaviour.
    MassDownload,
    AfterHoursAccess,
    UnusualSystemAccess,
    PrivilegeEscalation,
    ExternalEmailForwarding,
    // Offboarding process failures.
    DisableOversight,
    DelayedRevocation,
    IncompleteHandover,
    ApprovalBypass,
    // Post-resignation attacks.
    CredentialReuse,
    VpnBruteForce,
    InsiderBackdoor,
    SocialEngineering,
}

impl AnomalyKind {
    pub fn phase(&self) -> AnomalyPhase {
        match self {
            AnomalyKind::MassDownload
            | AnomalyKind::AfterHoursAccess
            | AnomalyKind::UnusualSystemAccess
            | AnomalyKind::PrivilegeEscalation
            | AnomalyKind::ExternalEmailForwarding => AnomalyPhase::PreResignation,
            AnomalyKind::DisableOversight
            | AnomalyKind::DelayedRevocation
            | AnomalyKind::IncompleteHandover
            | AnomalyKind::ApprovalBypass => AnomalyPhase::Process,
            AnomalyKind::CredentialReuse
            | AnomalyKind::VpnBruteForce
            | AnomalyKind::InsiderBackdoor
            | AnomalyKind::SocialEngineering => AnomalyPhase::PostResignation,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AnomalyKind::MassDownload => "mass_download",
            AnomalyKind::AfterHoursAccess => "after_hours_access",
            AnomalyKind::UnusualSystemAccess => "unusual_system_access",
            AnomalyKind::PrivilegeEscalation => "privilege_escalation",
            AnomalyKind::ExternalEmailForwarding => "external_email_forwarding",
            AnomalyKind::DisableOversight => "disable_oversight",
            AnomalyKind::DelayedRevocation => "delayed_revocation",
            AnomalyKind::IncompleteHandover => "incomplete_handover",
            AnomalyKind::ApprovalBypass => "approval_bypass",
            AnomalyKind::CredentialReuse => "credential_reuse",
            AnomalyKind::VpnBruteForce => "vpn_brute_force",
            AnomalyKind::InsiderBackdoor => "insider_backdoor",
            AnomalyKind::SocialEngineering => "social_engineering",
        }
    }
}

impl fmt::Display for AnomalyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnomalyEvent {
    pub id: Uuid,
    pub employee_id: EmployeeId,
    pub phase: AnomalyPhase,
    pub kind: AnomalyKind,
    pub severity: Severity,
    pub detected: bool,
    pub false_positive: bool,
    pub occurred_at: DateTime<Utc>,
    pub description: String,
    /// Already rendered into access log entries.
    pub materialized: bool,
}
