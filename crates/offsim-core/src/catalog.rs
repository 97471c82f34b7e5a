//! Static configuration tables: systems, roles, resignation reasons,
//! anomaly patterns and risk weights.
//!
//! A [`Catalog`] is built once, validated, and shared read-only (behind
//! an `Arc`) by every generator.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::models::access_log::AccessAction;
use crate::models::account::AccountType;
use crate::models::anomaly::{AnomalyKind, AnomalyPhase};
use crate::models::employee::{ResignationType, Role, SecurityClearance, WorkPattern};
use crate::models::permission::AccessLevel;
use crate::models::severity::Severity;
use crate::weighted::{WEIGHT_TOLERANCE, WeightedTable};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Sensitivity {
    Low,
    Medium,
    High,
    ExtremelyHigh,
}

impl fmt::Display for Sensitivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Sensitivity::Low => "low",
            Sensitivity::Medium => "medium",
            Sensitivity::High => "high",
            Sensitivity::ExtremelyHigh => "extremely_high",
        })
    }
}

#[derive(Debug, Clone)]
pub struct SystemSpec {
    pub name: String,
    pub sensitivity: Sensitivity,
    pub account_types: Vec<AccountType>,
    /// Production, monitoring or backup infrastructure.
    pub infrastructure: bool,
}

impl SystemSpec {
    fn new(
        name: &str,
        sensitivity: Sensitivity,
        account_types: &[AccountType],
        infrastructure: bool,
    ) -> Self {
        Self {
            name: name.into(),
            sensitivity,
            account_types: account_types.to_vec(),
            infrastructure,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FlowStep {
    pub system: String,
    pub action: AccessAction,
}

/// An ordered business operation performed during the working day.
#[derive(Debug, Clone)]
pub struct BusinessFlow {
    pub name: String,
    pub steps: Vec<FlowStep>,
}

impl BusinessFlow {
    fn new(name: &str, steps: &[(&str, AccessAction)]) -> Self {
        Self {
            name: name.into(),
            steps: steps
                .iter()
                .map(|(system, action)| FlowStep {
                    system: (*system).into(),
                    action: *action,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RoleProfile {
    pub departments: Vec<String>,
    pub titles: Vec<String>,
    pub clearance: SecurityClearance,
    /// Role factor of the resignation risk score.
    pub risk: f64,
    pub default_access: AccessLevel,
    /// Systems logged into every morning, in order.
    pub login_systems: Vec<String>,
    pub flows: Vec<BusinessFlow>,
    pub work_patterns: WeightedTable<WorkPattern>,
}

/// One value per [`Role`]; lookups are total.
#[derive(Debug, Clone)]
pub struct RoleTable<T> {
    pub executive: T,
    pub finance: T,
    pub technical: T,
    pub sales: T,
    pub hr: T,
    pub general: T,
}

impl<T> RoleTable<T> {
    pub fn get(&self, role: Role) -> &T {
        match role {
            Role::Executive => &self.executive,
            Role::Finance => &self.finance,
            Role::Technical => &self.technical,
            Role::Sales => &self.sales,
            Role::Hr => &self.hr,
            Role::General => &self.general,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Role, &T)> {
        Role::ALL.into_iter().map(move |role| (role, self.get(role)))
    }
}

/// One value per [`Sensitivity`] tier.
#[derive(Debug, Clone)]
pub struct SensitivityTable<T> {
    pub extremely_high: T,
    pub high: T,
    pub medium: T,
    pub low: T,
}

impl<T> SensitivityTable<T> {
    pub fn get(&self, sensitivity: Sensitivity) -> &T {
        match sensitivity {
            Sensitivity::ExtremelyHigh => &self.extremely_high,
            Sensitivity::High => &self.high,
            Sensitivity::Medium => &self.medium,
            Sensitivity::Low => &self.low,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReasonSpec {
    pub reason: String,
    pub risk_multiplier: f64,
}

#[derive(Debug, Clone)]
pub struct AnomalyPattern {
    pub kind: AnomalyKind,
    /// Base probability before scaling by the employee's risk.
    pub trigger_probability: f64,
    pub severity: Severity,
    pub detection_rate: f64,
    pub false_positive_rate: f64,
    pub description: String,
}

impl AnomalyPattern {
    fn new(
        kind: AnomalyKind,
        trigger_probability: f64,
        severity: Severity,
        detection_rate: f64,
        false_positive_rate: f64,
        description: &str,
    ) -> Self {
        Self {
            kind,
            trigger_probability,
            severity,
            detection_rate,
            false_positive_rate,
            description: description.into(),
        }
    }

    pub fn phase(&self) -> AnomalyPhase {
        self.kind.phase()
    }
}

/// Weights of the five resignation risk factors. Must sum to 1.0.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RiskWeights {
    pub role: f64,
    pub sensitivity: f64,
    pub reason: f64,
    pub behavior: f64,
    pub timing: f64,
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            role: 0.3,
            sensitivity: 0.25,
            reason: 0.2,
            behavior: 0.15,
            timing: 0.1,
        }
    }
}

impl RiskWeights {
    pub fn sum(&self) -> f64 {
        self.role + self.sensitivity + self.reason + self.behavior + self.timing
    }

    pub fn validate(&self) -> SimResult<()> {
        let factors = [
            self.role,
            self.sensitivity,
            self.reason,
            self.behavior,
            self.timing,
        ];
        if factors.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(SimError::Configuration {
                message: "risk weights must be finite and non-negative".into(),
            });
        }
        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(SimError::Configuration {
                message: format!("risk weights sum to {sum}, expected 1.0"),
            });
        }
        Ok(())
    }
}

/// Probabilities used by the account eligibility policy.
#[derive(Debug, Clone, Copy)]
pub struct GrantPolicy {
    /// Chance that an ineligible role still receives an extremely
    /// sensitive system.
    pub extremely_high_fallback: f64,
    /// Chance that a general-role employee receives a high system.
    pub high_general: f64,
    /// Chance of receiving a medium or low system.
    pub standard: f64,
}

impl GrantPolicy {
    pub fn validate(&self) -> SimResult<()> {
        let probabilities = [
            ("extremely_high_fallback", self.extremely_high_fallback),
            ("high_general", self.high_general),
            ("standard", self.standard),
        ];
        for (name, p) in probabilities {
            if !(0.0..=1.0).contains(&p) {
                return Err(config_error(&format!(
                    "grant policy {name} = {p} outside [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

impl Default for GrantPolicy {
    fn default() -> Self {
        Self {
            extremely_high_fallback: 0.05,
            high_general: 0.5,
            standard: 0.8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub city: String,
    pub country: String,
}

impl Location {
    fn new(city: &str, country: &str) -> Self {
        Self {
            city: city.into(),
            country: country.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Catalog {
    pub systems: Vec<SystemSpec>,
    pub role_distribution: WeightedTable<Role>,
    pub roles: RoleTable<RoleProfile>,
    pub sensitivity_risk: SensitivityTable<f64>,
    pub grant_policy: GrantPolicy,
    pub voluntary_reasons: WeightedTable<ReasonSpec>,
    pub involuntary_reasons: WeightedTable<ReasonSpec>,
    pub anomaly_patterns: Vec<AnomalyPattern>,
    /// Attack pattern mix for post-resignation violation attempts.
    pub attack_patterns: WeightedTable<AnomalyKind>,
    pub risk_weights: RiskWeights,
    pub first_names: Vec<String>,
    pub last_names: Vec<String>,
    pub office_locations: Vec<Location>,
    pub external_locations: Vec<Location>,
    /// Routine operations written to the HR database log.
    pub hr_operations: Vec<String>,
}

impl Catalog {
    /// The built-in tables.
    pub fn standard() -> SimResult<Self> {
        use AccessAction::*;
        use AccountType::*;

        let systems = vec![
            SystemSpec::new("production-db", Sensitivity::ExtremelyHigh, &[Database, Admin], true),
            SystemSpec::new("financial-ledger", Sensitivity::ExtremelyHigh, &[Application, Admin], false),
            SystemSpec::new("hris", Sensitivity::ExtremelyHigh, &[Application, Admin], false),
            SystemSpec::new("backup-vault", Sensitivity::ExtremelyHigh, &[Admin], true),
            SystemSpec::new("source-control", Sensitivity::High, &[Application, Admin], false),
            SystemSpec::new("monitoring", Sensitivity::High, &[Application, Admin], true),
            SystemSpec::new("erp", Sensitivity::High, &[Application], false),
            SystemSpec::new("crm", Sensitivity::Medium, &[Application], false),
            SystemSpec::new("file-server", Sensitivity::Medium, &[Domain], false),
            SystemSpec::new("vpn", Sensitivity::Medium, &[Vpn], false),
            SystemSpec::new("email", Sensitivity::Low, &[Email], false),
            SystemSpec::new("office-suite", Sensitivity::Low, &[Domain, Application], false),
            SystemSpec::new("attendance", Sensitivity::Low, &[Application], false),
        ];

        let role_distribution = WeightedTable::new(vec![
            (Role::Executive, 0.02),
            (Role::Finance, 0.08),
            (Role::Technical, 0.25),
            (Role::Sales, 0.20),
            (Role::Hr, 0.05),
            (Role::General, 0.40),
        ])?;

        let roles = RoleTable {
            executive: RoleProfile {
                departments: strings(&["Executive Office"]),
                titles: strings(&["Chief Operating Officer", "Vice President", "Managing Director"]),
                clearance: SecurityClearance::Secret,
                risk: 0.9,
                default_access: AccessLevel::ReadWrite,
                work_patterns: office_hours()?,
                login_systems: strings(&["email", "office-suite", "vpn", "erp"]),
                flows: vec![
                    BusinessFlow::new(
                        "board report",
                        &[
                            ("erp", DataQuery),
                            ("financial-ledger", DataQuery),
                            ("file-server", FileAccess),
                            ("email", DataQuery),
                        ],
                    ),
                    BusinessFlow::new(
                        "approvals",
                        &[("hris", DataQuery), ("erp", DataModify), ("email", DataQuery)],
                    ),
                ],
            },
            finance: RoleProfile {
                departments: strings(&["Finance"]),
                titles: strings(&["Accountant", "Financial Analyst", "Treasury Specialist"]),
                clearance: SecurityClearance::Confidential,
                risk: 0.85,
                default_access: AccessLevel::ReadWrite,
                work_patterns: office_hours()?,
                login_systems: strings(&["email", "office-suite", "financial-ledger", "erp"]),
                flows: vec![
                    BusinessFlow::new(
                        "month end close",
                        &[
                            ("financial-ledger", DataQuery),
                            ("financial-ledger", DataModify),
                            ("erp", DataExport),
                            ("file-server", FileAccess),
                        ],
                    ),
                    BusinessFlow::new(
                        "expense review",
                        &[
                            ("erp", DataQuery),
                            ("financial-ledger", DataQuery),
                            ("email", DataQuery),
                        ],
                    ),
                ],
            },
            technical: RoleProfile {
                departments: strings(&["Engineering", "Product"]),
                titles: strings(&["Software Engineer", "Site Reliability Engineer", "DBA"]),
                clearance: SecurityClearance::Confidential,
                risk: 0.8,
                default_access: AccessLevel::ReadWrite,
                work_patterns: engineering_hours()?,
                login_systems: strings(&["email", "vpn", "source-control", "monitoring"]),
                flows: vec![
                    BusinessFlow::new(
                        "deploy release",
                        &[
                            ("source-control", DataQuery),
                            ("source-control", DataModify),
                            ("monitoring", DataQuery),
                            ("production-db", ConfigChange),
                        ],
                    ),
                    BusinessFlow::new(
                        "incident triage",
                        &[
                            ("monitoring", DataQuery),
                            ("production-db", DataQuery),
                            ("file-server", FileAccess),
                        ],
                    ),
                    BusinessFlow::new(
                        "code review",
                        &[
                            ("source-control", DataQuery),
                            ("source-control", DataModify),
                            ("email", DataQuery),
                        ],
                    ),
                ],
            },
            sales: RoleProfile {
                departments: strings(&["Sales", "Marketing"]),
                titles: strings(&["Account Executive", "Sales Manager", "Marketing Specialist"]),
                clearance: SecurityClearance::Internal,
                risk: 0.5,
                default_access: AccessLevel::ReadWrite,
                work_patterns: office_hours()?,
                login_systems: strings(&["email", "office-suite", "crm"]),
                flows: vec![
                    BusinessFlow::new(
                        "pipeline update",
                        &[("crm", DataQuery), ("crm", DataModify), ("email", DataQuery)],
                    ),
                    BusinessFlow::new(
                        "quote preparation",
                        &[("crm", DataQuery), ("erp", DataQuery), ("file-server", FileAccess)],
                    ),
                ],
            },
            hr: RoleProfile {
                departments: strings(&["Human Resources"]),
                titles: strings(&["HR Business Partner", "Recruiter", "Payroll Specialist"]),
                clearance: SecurityClearance::Confidential,
                risk: 0.6,
                default_access: AccessLevel::ReadWrite,
                work_patterns: office_hours()?,
                login_systems: strings(&["email", "office-suite", "hris", "attendance"]),
                flows: vec![
                    BusinessFlow::new(
                        "onboarding paperwork",
                        &[("hris", DataQuery), ("hris", DataModify), ("attendance", DataQuery)],
                    ),
                    BusinessFlow::new(
                        "payroll check",
                        &[("hris", DataQuery), ("attendance", DataExport), ("email", DataQuery)],
                    ),
                ],
            },
            general: RoleProfile {
                departments: strings(&["Operations", "Legal", "Administration"]),
                titles: strings(&["Coordinator", "Assistant", "Specialist"]),
                clearance: SecurityClearance::Internal,
                risk: 0.3,
                default_access: AccessLevel::Read,
                work_patterns: office_hours()?,
                login_systems: strings(&["email", "office-suite", "file-server"]),
                flows: vec![
                    BusinessFlow::new(
                        "document work",
                        &[
                            ("office-suite", FileAccess),
                            ("file-server", FileAccess),
                            ("email", DataQuery),
                        ],
                    ),
                    BusinessFlow::new(
                        "timesheet",
                        &[("attendance", DataQuery), ("attendance", DataModify)],
                    ),
                ],
            },
        };

        let voluntary_reasons = WeightedTable::new(vec![
            (reason("personal development", 1.0), 0.30),
            (reason("compensation", 1.2), 0.25),
            (reason("work environment", 1.5), 0.15),
            (reason("family reasons", 0.8), 0.15),
            (reason("health reasons", 0.8), 0.05),
            (reason("further education", 0.7), 0.10),
        ])?;

        let involuntary_reasons = WeightedTable::new(vec![
            (reason("performance issues", 2.0), 0.35),
            (reason("organizational restructuring", 1.8), 0.35),
            (reason("violation of discipline", 3.0), 0.15),
            (reason("contract expiration", 1.2), 0.15),
        ])?;

        let anomaly_patterns = vec![
            AnomalyPattern::new(
                AnomalyKind::MassDownload,
                0.30,
                Severity::High,
                0.8,
                0.05,
                "bulk download of sensitive data shortly before leaving",
            ),
            AnomalyPattern::new(
                AnomalyKind::AfterHoursAccess,
                0.40,
                Severity::Medium,
                0.7,
                0.15,
                "sustained access outside office hours",
            ),
            AnomalyPattern::new(
                AnomalyKind::UnusualSystemAccess,
                0.25,
                Severity::Medium,
                0.6,
                0.10,
                "access attempts against systems outside the usual footprint",
            ),
            AnomalyPattern::new(
                AnomalyKind::PrivilegeEscalation,
                0.10,
                Severity::Critical,
                0.9,
                0.05,
                "attempted self-grant of elevated permissions",
            ),
            AnomalyPattern::new(
                AnomalyKind::ExternalEmailForwarding,
                0.20,
                Severity::High,
                0.75,
                0.08,
                "mail forwarded to an external mailbox",
            ),
            AnomalyPattern::new(
                AnomalyKind::DisableOversight,
                0.0,
                Severity::High,
                0.5,
                0.0,
                "account left active after offboarding",
            ),
            AnomalyPattern::new(
                AnomalyKind::DelayedRevocation,
                0.0,
                Severity::Medium,
                0.6,
                0.0,
                "permission revocation deferred past the last work day",
            ),
            AnomalyPattern::new(
                AnomalyKind::IncompleteHandover,
                0.15,
                Severity::Medium,
                0.7,
                0.05,
                "handover checklist closed with open items",
            ),
            AnomalyPattern::new(
                AnomalyKind::ApprovalBypass,
                0.05,
                Severity::High,
                0.6,
                0.05,
                "offboarding step completed without manager approval",
            ),
            AnomalyPattern::new(
                AnomalyKind::CredentialReuse,
                0.50,
                Severity::High,
                0.85,
                0.05,
                "old credentials replayed after departure",
            ),
            AnomalyPattern::new(
                AnomalyKind::VpnBruteForce,
                0.30,
                Severity::High,
                0.9,
                0.02,
                "rapid failed VPN logins from outside the network",
            ),
            AnomalyPattern::new(
                AnomalyKind::InsiderBackdoor,
                0.20,
                Severity::Critical,
                0.5,
                0.02,
                "access through a backdoor left on infrastructure",
            ),
            AnomalyPattern::new(
                AnomalyKind::SocialEngineering,
                0.15,
                Severity::High,
                0.4,
                0.10,
                "former colleague's identity used to regain access",
            ),
        ];

        let attack_patterns = WeightedTable::new(vec![
            (AnomalyKind::CredentialReuse, 0.40),
            (AnomalyKind::VpnBruteForce, 0.30),
            (AnomalyKind::InsiderBackdoor, 0.15),
            (AnomalyKind::SocialEngineering, 0.15),
        ])?;

        let catalog = Self {
            systems,
            role_distribution,
            roles,
            sensitivity_risk: SensitivityTable {
                extremely_high: 1.0,
                high: 0.75,
                medium: 0.5,
                low: 0.25,
            },
            grant_policy: GrantPolicy::default(),
            voluntary_reasons,
            involuntary_reasons,
            anomaly_patterns,
            attack_patterns,
            risk_weights: RiskWeights::default(),
            first_names: strings(&[
                "Wei", "Li", "Ming", "Jing", "Hao", "Yan", "Lei", "Xin", "Anna", "David", "Maria",
                "James", "Sofia", "Daniel", "Elena", "Omar",
            ]),
            last_names: strings(&[
                "Zhang", "Wang", "Chen", "Liu", "Zhao", "Huang", "Zhou", "Wu", "Smith", "Garcia",
                "Muller", "Rossi", "Novak", "Tanaka",
            ]),
            office_locations: vec![
                Location::new("Shanghai", "CN"),
                Location::new("Beijing", "CN"),
                Location::new("Shenzhen", "CN"),
            ],
            external_locations: vec![
                Location::new("Moscow", "RU"),
                Location::new("Lagos", "NG"),
                Location::new("Sao Paulo", "BR"),
                Location::new("Singapore", "SG"),
                Location::new("Frankfurt", "DE"),
                Location::new("Unknown", "ZZ"),
            ],
            hr_operations: strings(&[
                "employee lookup",
                "resignation workflow query",
                "account status check",
                "permission verification",
                "database backup",
                "system maintenance",
            ]),
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Check cross-table references and numeric ranges.
    pub fn validate(&self) -> SimResult<()> {
        self.risk_weights.validate()?;
        self.grant_policy.validate()?;

        self.role_distribution.check()?;
        self.attack_patterns.check()?;
        self.voluntary_reasons.check()?;
        self.involuntary_reasons.check()?;

        if self.systems.is_empty() {
            return Err(config_error("catalog has no systems"));
        }
        if self.first_names.is_empty() || self.last_names.is_empty() {
            return Err(config_error("name pools must not be empty"));
        }
        if self.office_locations.is_empty() || self.external_locations.is_empty() {
            return Err(config_error("location pools must not be empty"));
        }
        if let Some(system) = self.systems.iter().find(|s| s.account_types.is_empty()) {
            return Err(config_error(&format!(
                "system {} offers no account types",
                system.name
            )));
        }

        for (role, profile) in self.roles.iter() {
            if !(0.0..=1.0).contains(&profile.risk) {
                return Err(config_error(&format!("role risk for {role} outside [0, 1]")));
            }
            profile.work_patterns.check().map_err(|e| {
                config_error(&format!("work patterns for {role}: {e}"))
            })?;
            if profile.departments.is_empty() || profile.titles.is_empty() {
                return Err(config_error(&format!("role {role} lacks departments or titles")));
            }
            let referenced = profile
                .login_systems
                .iter()
                .chain(profile.flows.iter().flat_map(|f| f.steps.iter().map(|s| &s.system)));
            for system in referenced {
                if self.system(system).is_none() {
                    return Err(config_error(&format!(
                        "role {role} references unknown system {system}"
                    )));
                }
            }
        }

        for pattern in &self.anomaly_patterns {
            let rates = [
                pattern.trigger_probability,
                pattern.detection_rate,
                pattern.false_positive_rate,
            ];
            if rates.iter().any(|p| !(0.0..=1.0).contains(p)) {
                return Err(config_error(&format!(
                    "pattern {} has a probability outside [0, 1]",
                    pattern.kind
                )));
            }
        }
        for kind in self.attack_patterns.values() {
            if kind.phase() != AnomalyPhase::PostResignation {
                return Err(config_error(&format!("{kind} is not a post-resignation pattern")));
            }
        }
        for table in [&self.voluntary_reasons, &self.involuntary_reasons] {
            if table.values().any(|r| r.risk_multiplier <= 0.0) {
                return Err(config_error("reason risk multipliers must be positive"));
            }
        }
        Ok(())
    }

    pub fn system(&self, name: &str) -> Option<&SystemSpec> {
        self.systems.iter().find(|s| s.name == name)
    }

    pub fn role(&self, role: Role) -> &RoleProfile {
        self.roles.get(role)
    }

    pub fn reasons(&self, resignation_type: ResignationType) -> &WeightedTable<ReasonSpec> {
        match resignation_type {
            ResignationType::Voluntary => &self.voluntary_reasons,
            ResignationType::Involuntary => &self.involuntary_reasons,
        }
    }

    /// Multiplier of a named reason, searching both tables.
    pub fn reason_multiplier(&self, reason: &str) -> Option<f64> {
        self.voluntary_reasons
            .values()
            .chain(self.involuntary_reasons.values())
            .find(|r| r.reason == reason)
            .map(|r| r.risk_multiplier)
    }

    pub fn patterns(&self, phase: AnomalyPhase) -> impl Iterator<Item = &AnomalyPattern> {
        self.anomaly_patterns
            .iter()
            .filter(move |p| p.phase() == phase)
    }

    pub fn pattern(&self, kind: AnomalyKind) -> Option<&AnomalyPattern> {
        self.anomaly_patterns.iter().find(|p| p.kind == kind)
    }

    /// Systems at or above a sensitivity tier.
    pub fn systems_at_least(&self, tier: Sensitivity) -> impl Iterator<Item = &SystemSpec> {
        self.systems.iter().filter(move |s| s.sensitivity >= tier)
    }
}

fn office_hours() -> SimResult<WeightedTable<WorkPattern>> {
    WeightedTable::new(vec![
        (WorkPattern::Standard, 0.55),
        (WorkPattern::EarlyBird, 0.15),
        (WorkPattern::NightOwl, 0.10),
        (WorkPattern::Flexible, 0.20),
    ])
}

fn engineering_hours() -> SimResult<WeightedTable<WorkPattern>> {
    WeightedTable::new(vec![
        (WorkPattern::Standard, 0.45),
        (WorkPattern::EarlyBird, 0.10),
        (WorkPattern::NightOwl, 0.25),
        (WorkPattern::Flexible, 0.20),
    ])
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

fn reason(reason: &str, risk_multiplier: f64) -> ReasonSpec {
    ReasonSpec {
        reason: reason.into(),
        risk_multiplier,
    }
}

fn config_error(message: &str) -> SimError {
    SimError::Configuration {
        message: message.into(),
    }
}
