//! Offboarding lifecycle: `active → resignation_pending → resigned`.
//!
//! The engine mutates the employee it is handed and returns the records
//! the transition produced; persisting them is the caller's job.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use offsim_core::catalog::{AnomalyPattern, Catalog, Sensitivity};
use offsim_core::error::SimResult;
use offsim_core::ids::{EmployeeId, random_uuid};
use offsim_core::models::account::{Account, AccountStatus, RetentionReason};
use offsim_core::models::anomaly::{AnomalyEvent, AnomalyKind, AnomalyPhase};
use offsim_core::models::employee::{Employee, EmploymentStatus, ResignationInfo, ResignationType};
use offsim_core::models::severity::Severity;
use offsim_core::models::transfer::{
    BusinessImpact, ComplianceTag, TransferRecord, TransferStatus,
};
use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::{debug, info};

use crate::config::{EngineConfig, TransferPolicy};
use crate::error::LifecycleError;
use crate::risk::RiskScorer;

const TRANSFER_FAILURE_NOTES: [&str; 4] = [
    "successor not assigned",
    "approval timed out",
    "target system unreachable",
    "ownership mismatch in directory",
];

/// Overrides for a resignation; unset fields are drawn at random.
#[derive(Debug, Clone, Default)]
pub struct ResignationRequest {
    pub resignation_type: Option<ResignationType>,
    pub reason: Option<String>,
    pub urgent: Option<bool>,
}

/// Records produced when a resignation is initiated.
#[derive(Debug, Default)]
pub struct ResignationOutcome {
    pub transfer_records: Vec<TransferRecord>,
    pub anomalies: Vec<AnomalyEvent>,
    /// Records skipped under [`TransferPolicy::AllowDrift`].
    pub dropped_transfers: usize,
}

/// Records produced when a resignation completes.
#[derive(Debug, Default)]
pub struct CompletionOutcome {
    /// Keys of accounts disabled now.
    pub disabled_accounts: Vec<String>,
    /// Keys of accounts left active through oversight.
    pub retained_accounts: Vec<String>,
    pub revoked_permissions: Vec<String>,
    /// Systems whose revocation was deferred, with the due time.
    pub delayed_revocations: Vec<(String, DateTime<Utc>)>,
    /// Previously unresolved records, each resolved exactly once.
    pub resolved_transfers: Vec<TransferRecord>,
    /// Records created for accounts that had none.
    pub backfilled_transfers: Vec<TransferRecord>,
    pub anomalies: Vec<AnomalyEvent>,
}

impl CompletionOutcome {
    /// Resolutions written back to existing records.
    pub fn transfer_updates(&self) -> usize {
        self.resolved_transfers.len()
    }
}

pub struct LifecycleEngine {
    catalog: Arc<Catalog>,
    scorer: RiskScorer,
    config: EngineConfig,
}

impl LifecycleEngine {
    pub fn new(catalog: Arc<Catalog>, config: EngineConfig) -> SimResult<Self> {
        config.validate()?;
        let scorer = RiskScorer::new(catalog.clone())?;
        Ok(Self {
            catalog,
            scorer,
            config,
        })
    }

    pub fn scorer(&self) -> &RiskScorer {
        &self.scorer
    }

    /// Hand in notice: `active → resignation_pending`.
    pub fn initiate_resignation<R: Rng + ?Sized>(
        &self,
        employee: &mut Employee,
        request: ResignationRequest,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> Result<ResignationOutcome, LifecycleError> {
        // 1. Only active employees can resign.
        if employee.status != EmploymentStatus::Active {
            return Err(LifecycleError::InvalidTransition {
                employee_id: employee.id.clone(),
                operation: "initiate resignation",
                from: employee.status,
            });
        }

        // 2. Fill in whatever the request left open.
        let resignation_type = request.resignation_type.unwrap_or_else(|| {
            if rng.random_bool(self.config.voluntary_probability) {
                ResignationType::Voluntary
            } else {
                ResignationType::Involuntary
            }
        });
        let (reason, risk_multiplier) = match request.reason {
            Some(reason) => {
                let multiplier = self.catalog.reason_multiplier(&reason).unwrap_or(1.0);
                (reason, multiplier)
            }
            None => {
                let spec = self.catalog.reasons(resignation_type).choose(rng);
                (spec.reason.clone(), spec.risk_multiplier)
            }
        };
        let urgent = request
            .urgent
            .unwrap_or_else(|| rng.random_bool(self.config.urgent_probability));
        let notice = if urgent {
            self.config.urgent_notice_days
        } else {
            self.config.notice_days
        };

        employee.resignation = Some(ResignationInfo {
            resignation_type,
            reason,
            risk_multiplier,
            resignation_date: now,
            last_work_date: now + Duration::days(notice),
            urgent,
            completed_at: None,
        });
        employee.status = EmploymentStatus::ResignationPending;

        // 3. Score with the resignation on record.
        let risk = self.scorer.score(employee);
        employee.resignation_risk_score = risk;

        // 4. Pre-resignation anomalies scale with risk.
        let mut outcome = ResignationOutcome::default();
        for pattern in self.catalog.patterns(AnomalyPhase::PreResignation) {
            if rng.random_bool((pattern.trigger_probability * risk).clamp(0.0, 1.0)) {
                outcome
                    .anomalies
                    .push(inject(pattern, &employee.id, rng, now));
            }
        }
        employee.anomaly_history.extend(outcome.anomalies.iter().cloned());

        // 5. One transfer record per active account.
        for account in employee.active_accounts() {
            if let TransferPolicy::AllowDrift { drop_rate } = self.config.transfer_policy {
                if rng.random_bool(drop_rate) {
                    outcome.dropped_transfers += 1;
                    continue;
                }
            }
            let record = self.transfer_record(employee, account, rng, now);
            outcome.transfer_records.push(record);
        }

        info!(
            employee_id = %employee.id,
            role = %employee.role,
            risk_score = risk,
            urgent,
            transfers = outcome.transfer_records.len(),
            anomalies = outcome.anomalies.len(),
            "Resignation initiated"
        );
        Ok(outcome)
    }

    /// Last work day reached: `resignation_pending → resigned`.
    pub fn complete_resignation<R: Rng + ?Sized>(
        &self,
        employee: &mut Employee,
        transfers: &[TransferRecord],
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> Result<CompletionOutcome, LifecycleError> {
        // 1. Only pending resignations that are due.
        if employee.status != EmploymentStatus::ResignationPending {
            return Err(LifecycleError::InvalidTransition {
                employee_id: employee.id.clone(),
                operation: "complete resignation",
                from: employee.status,
            });
        }
        let last_work_date = employee
            .last_work_date()
            .ok_or_else(|| LifecycleError::MissingResignation(employee.id.clone()))?;
        if now < last_work_date {
            return Err(LifecycleError::NotYetDue {
                employee_id: employee.id.clone(),
                last_work_date,
            });
        }

        let mut outcome = CompletionOutcome::default();

        // 2. Disable accounts, some slip through.
        let oversight = self.catalog.pattern(AnomalyKind::DisableOversight);
        for account in employee.accounts.values_mut().filter(|a| a.is_active()) {
            if rng.random_bool(self.config.disable_oversight_probability) {
                account.retention_reason = Some(RetentionReason::DisableOversight);
                outcome.retained_accounts.push(account.key());
                if let Some(pattern) = oversight {
                    outcome.anomalies.push(inject(pattern, &employee.id, rng, now));
                }
            } else {
                account.status = AccountStatus::Disabled;
                account.disabled_date = Some(now);
                outcome.disabled_accounts.push(account.key());
            }
        }

        // 3. Revoke permissions, some later than they should be.
        let delayed = self.catalog.pattern(AnomalyKind::DelayedRevocation);
        for permission in employee.permissions.values_mut().filter(|p| p.is_active()) {
            if rng.random_bool(self.config.delayed_revocation_probability) {
                let due = now
                    + Duration::days(rng.random_range(1..=self.config.max_revocation_delay_days));
                permission.scheduled_revocation = Some(due);
                outcome
                    .delayed_revocations
                    .push((permission.system.clone(), due));
                if let Some(pattern) = delayed {
                    outcome.anomalies.push(inject(pattern, &employee.id, rng, now));
                }
            } else {
                permission.revoke(now);
                outcome.revoked_permissions.push(permission.system.clone());
            }
        }

        // 4. Independent process failures.
        for pattern in self
            .catalog
            .patterns(AnomalyPhase::Process)
            .filter(|p| p.trigger_probability > 0.0)
        {
            if rng.random_bool(pattern.trigger_probability) {
                outcome.anomalies.push(inject(pattern, &employee.id, rng, now));
            }
        }

        // 5. Resolve every open transfer record once.
        let mut covered = BTreeSet::new();
        for record in transfers.iter().filter(|r| r.employee_id == employee.id) {
            covered.insert(record.account_key.clone());
            if record.status.is_unresolved() {
                let mut resolved = record.clone();
                self.resolve(&mut resolved, rng, now);
                outcome.resolved_transfers.push(resolved);
            }
        }
        if self.config.transfer_policy == TransferPolicy::Enforce {
            for account in employee.accounts.values() {
                if covered.contains(&account.key()) {
                    continue;
                }
                let mut record = self.transfer_record(employee, account, rng, now);
                record.notes = "backfilled at completion".into();
                self.resolve(&mut record, rng, now);
                outcome.backfilled_transfers.push(record);
            }
        }

        employee.anomaly_history.extend(outcome.anomalies.iter().cloned());
        if let Some(info) = employee.resignation.as_mut() {
            info.completed_at = Some(now);
        }
        employee.status = EmploymentStatus::Resigned;

        info!(
            employee_id = %employee.id,
            disabled = outcome.disabled_accounts.len(),
            retained = outcome.retained_accounts.len(),
            revoked = outcome.revoked_permissions.len(),
            delayed = outcome.delayed_revocations.len(),
            transfers_resolved = outcome.resolved_transfers.len(),
            transfers_backfilled = outcome.backfilled_transfers.len(),
            "Resignation completed"
        );
        Ok(outcome)
    }

    /// Seed post-resignation attack patterns for a resigned employee.
    ///
    /// A pattern that already has an unmaterialized event is not fired
    /// again.
    pub fn simulate_post_resignation_activities<R: Rng + ?Sized>(
        &self,
        employee: &mut Employee,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> Result<Vec<AnomalyEvent>, LifecycleError> {
        if employee.status != EmploymentStatus::Resigned {
            return Err(LifecycleError::InvalidTransition {
                employee_id: employee.id.clone(),
                operation: "simulate post-resignation activity for",
                from: employee.status,
            });
        }

        let multiplier = employee
            .resignation
            .as_ref()
            .map_or(1.0, |r| r.risk_multiplier);
        let scale = employee.resignation_risk_score * multiplier;

        let mut fired = Vec::new();
        for pattern in self.catalog.patterns(AnomalyPhase::PostResignation) {
            let pending = employee
                .pending_anomalies(AnomalyPhase::PostResignation)
                .any(|a| a.kind == pattern.kind);
            if pending {
                continue;
            }
            if rng.random_bool((pattern.trigger_probability * scale).clamp(0.0, 1.0)) {
                fired.push(inject(pattern, &employee.id, rng, now));
            }
        }
        if !fired.is_empty() {
            debug!(employee_id = %employee.id, count = fired.len(), "Post-resignation patterns fired");
        }
        employee.anomaly_history.extend(fired.iter().cloned());
        Ok(fired)
    }

    /// Revoke permissions whose deferred revocation is due. Returns the
    /// affected systems.
    pub fn apply_scheduled_revocations(
        &self,
        employee: &mut Employee,
        now: DateTime<Utc>,
    ) -> Vec<String> {
        let mut revoked = Vec::new();
        for permission in employee.permissions.values_mut() {
            if let Some(due) = permission.scheduled_revocation {
                if permission.is_active() && due <= now {
                    permission.revoke(now);
                    revoked.push(permission.system.clone());
                }
            }
        }
        revoked
    }

    fn transfer_record<R: Rng + ?Sized>(
        &self,
        employee: &Employee,
        account: &Account,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> TransferRecord {
        let sensitivity = self
            .catalog
            .system(&account.system)
            .map_or(Sensitivity::Low, |s| s.sensitivity);

        let mut risk_level = match sensitivity {
            Sensitivity::ExtremelyHigh => Severity::High,
            Sensitivity::High => Severity::Medium,
            Sensitivity::Medium | Sensitivity::Low => Severity::Low,
        };
        if account.privileged || employee.resignation_risk_score > 0.7 {
            risk_level = escalate(risk_level);
        }
        let business_impact = match sensitivity {
            Sensitivity::ExtremelyHigh | Sensitivity::High => BusinessImpact::High,
            Sensitivity::Medium => BusinessImpact::Medium,
            Sensitivity::Low => BusinessImpact::Low,
        };

        TransferRecord {
            id: random_uuid(rng),
            employee_id: employee.id.clone(),
            account_key: account.key(),
            account_id: account.account_id.clone(),
            system: account.system.clone(),
            account_type: account.account_type,
            transfer_to: if account.privileged {
                "IT Security".into()
            } else {
                format!("{} team lead", employee.department)
            },
            status: if account.privileged {
                TransferStatus::AwaitingApproval
            } else {
                TransferStatus::Pending
            },
            risk_level,
            business_impact,
            compliance_tags: compliance_tags(&account.system, account.privileged),
            notes: String::new(),
            created_at: now,
            resolved_at: None,
        }
    }

    fn resolve<R: Rng + ?Sized>(&self, record: &mut TransferRecord, rng: &mut R, now: DateTime<Utc>) {
        if rng.random_bool(self.config.transfer_success_rate) {
            record.status = TransferStatus::Transferred;
        } else {
            record.status = TransferStatus::Failed;
            let note = TRANSFER_FAILURE_NOTES.choose(rng).copied().unwrap_or("unknown");
            record.notes = if record.notes.is_empty() {
                note.to_string()
            } else {
                format!("{}; {note}", record.notes)
            };
        }
        record.resolved_at = Some(now);
    }
}

/// Build an anomaly event from its pattern, rolling detection.
pub(crate) fn inject<R: Rng + ?Sized>(
    pattern: &AnomalyPattern,
    employee_id: &EmployeeId,
    rng: &mut R,
    at: DateTime<Utc>,
) -> AnomalyEvent {
    let detected = rng.random_bool(pattern.detection_rate);
    AnomalyEvent {
        id: random_uuid(rng),
        employee_id: employee_id.clone(),
        phase: pattern.phase(),
        kind: pattern.kind,
        severity: pattern.severity,
        detected,
        false_positive: detected && rng.random_bool(pattern.false_positive_rate),
        occurred_at: at,
        description: pattern.description.clone(),
        // Process failures are recorded directly, not rendered into logs.
        materialized: pattern.phase() == AnomalyPhase::Process,
    }
}

fn escalate(level: Severity) -> Severity {
    match level {
        Severity::Low => Severity::Medium,
        Severity::Medium => Severity::High,
        Severity::High | Severity::Critical => Severity::Critical,
    }
}

fn compliance_tags(system: &str, privileged: bool) -> Vec<ComplianceTag> {
    let mut tags = match system {
        "financial-ledger" | "erp" => vec![ComplianceTag::Sox],
        "hris" | "attendance" => vec![ComplianceTag::Pipl, ComplianceTag::Gdpr],
        "email" | "crm" => vec![ComplianceTag::Gdpr],
        _ => Vec::new(),
    };
    if privileged {
        tags.push(ComplianceTag::Iso27001);
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::EntityFactory;
    use chrono::{NaiveDate, TimeZone};
    use offsim_core::models::account::AccountType;
    use offsim_core::models::employee::Role;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn setup(config: EngineConfig) -> (LifecycleEngine, EntityFactory, StdRng) {
        let catalog = Arc::new(Catalog::standard().unwrap());
        let engine = LifecycleEngine::new(catalog.clone(), config).unwrap();
        (engine, EntityFactory::new(catalog), StdRng::seed_from_u64(42))
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap()
    }

    fn today() -> NaiveDate {
        now().date_naive()
    }

    fn four_account_employee(factory: &EntityFactory, rng: &mut StdRng) -> Employee {
        let mut employee = factory.create_employee_with_role(Role::General, rng, today());
        employee.accounts.clear();
        employee.permissions.clear();
        for (system, ty) in [
            ("email", AccountType::Email),
            ("vpn", AccountType::Vpn),
            ("file-server", AccountType::Domain),
            ("production-db", AccountType::Admin),
        ] {
            let account = Account::new(employee.id.clone(), system, ty, today());
            employee.accounts.insert(account.key(), account);
            employee.permissions.insert(
                system.into(),
                offsim_core::models::permission::Permission::new(
                    employee.id.clone(),
                    system,
                    offsim_core::models::permission::AccessLevel::Read,
                    today(),
                ),
            );
        }
        employee
    }

    #[test]
    fn initiation_sets_pending_state_and_dates() {
        let (engine, factory, mut rng) = setup(EngineConfig::default());
        let mut employee = factory.create_employee(&mut rng, today());
        let outcome = engine
            .initiate_resignation(&mut employee, ResignationRequest::default(), &mut rng, now())
            .unwrap();

        assert_eq!(employee.status, EmploymentStatus::ResignationPending);
        let info = employee.resignation.as_ref().unwrap();
        assert!(info.resignation_date <= info.last_work_date);
        let expected = if info.urgent { 3 } else { 30 };
        assert_eq!((info.last_work_date - info.resignation_date).num_days(), expected);
        assert!((0.0..=1.0).contains(&employee.resignation_risk_score));
        assert_eq!(outcome.transfer_records.len(), employee.accounts.len());
        for anomaly in &outcome.anomalies {
            assert_eq!(anomaly.phase, AnomalyPhase::PreResignation);
            assert!(!anomaly.materialized);
        }
    }

    #[test]
    fn privileged_transfers_await_approval() {
        let (engine, factory, mut rng) = setup(EngineConfig::default());
        let mut employee = factory.create_employee_with_role(Role::Technical, &mut rng, today());
        let outcome = engine
            .initiate_resignation(&mut employee, ResignationRequest::default(), &mut rng, now())
            .unwrap();
        for record in &outcome.transfer_records {
            let expected = if record.account_type.is_privileged() {
                TransferStatus::AwaitingApproval
            } else {
                TransferStatus::Pending
            };
            assert_eq!(record.status, expected);
        }
    }

    #[test]
    fn cannot_resign_twice() {
        let (engine, factory, mut rng) = setup(EngineConfig::default());
        let mut employee = factory.create_employee(&mut rng, today());
        engine
            .initiate_resignation(&mut employee, ResignationRequest::default(), &mut rng, now())
            .unwrap();
        let err = engine
            .initiate_resignation(&mut employee, ResignationRequest::default(), &mut rng, now())
            .unwrap_err();
        assert!(matches!(err, LifecycleError::InvalidTransition { .. }));
    }

    #[test]
    fn completion_before_last_work_date_is_rejected() {
        let (engine, factory, mut rng) = setup(EngineConfig::default());
        let mut employee = factory.create_employee(&mut rng, today());
        engine
            .initiate_resignation(
                &mut employee,
                ResignationRequest {
                    urgent: Some(false),
                    ..Default::default()
                },
                &mut rng,
                now(),
            )
            .unwrap();
        let err = engine
            .complete_resignation(&mut employee, &[], &mut rng, now() + Duration::days(10))
            .unwrap_err();
        assert!(matches!(err, LifecycleError::NotYetDue { .. }));
        assert_eq!(employee.status, EmploymentStatus::ResignationPending);
    }

    #[test]
    fn completing_an_active_employee_is_rejected() {
        let (engine, factory, mut rng) = setup(EngineConfig::default());
        let mut employee = factory.create_employee(&mut rng, today());
        let err = engine
            .complete_resignation(&mut employee, &[], &mut rng, now())
            .unwrap_err();
        assert!(matches!(err, LifecycleError::InvalidTransition { .. }));
    }

    #[test]
    fn four_accounts_yield_at_most_four_updates() {
        let config = EngineConfig {
            disable_oversight_probability: 0.5,
            ..Default::default()
        };
        let (engine, factory, mut rng) = setup(config);
        for _ in 0..20 {
            let mut employee = four_account_employee(&factory, &mut rng);
            let initiated = engine
                .initiate_resignation(&mut employee, ResignationRequest::default(), &mut rng, now())
                .unwrap();
            assert_eq!(initiated.transfer_records.len(), 4);

            let due = employee.last_work_date().unwrap();
            let outcome = engine
                .complete_resignation(&mut employee, &initiated.transfer_records, &mut rng, due)
                .unwrap();

            assert!(outcome.transfer_updates() <= 4);
            assert!(outcome.backfilled_transfers.is_empty());
            assert_eq!(employee.status, EmploymentStatus::Resigned);
            for account in employee.accounts.values().filter(|a| a.is_active()) {
                assert_eq!(account.retention_reason, Some(RetentionReason::DisableOversight));
            }
            for record in &outcome.resolved_transfers {
                assert!(!record.status.is_unresolved());
                assert!(record.resolved_at.is_some());
            }
        }
    }

    #[test]
    fn missing_records_are_backfilled_under_enforce() {
        let (engine, factory, mut rng) = setup(EngineConfig::default());
        let mut employee = four_account_employee(&factory, &mut rng);
        let initiated = engine
            .initiate_resignation(&mut employee, ResignationRequest::default(), &mut rng, now())
            .unwrap();
        let partial = &initiated.transfer_records[..2];
        let due = employee.last_work_date().unwrap();
        let outcome = engine
            .complete_resignation(&mut employee, partial, &mut rng, due)
            .unwrap();
        assert_eq!(outcome.resolved_transfers.len(), 2);
        assert_eq!(outcome.backfilled_transfers.len(), 2);
    }

    #[test]
    fn drift_policy_never_backfills() {
        let config = EngineConfig {
            transfer_policy: TransferPolicy::AllowDrift { drop_rate: 1.0 },
            ..Default::default()
        };
        let (engine, factory, mut rng) = setup(config);
        let mut employee = four_account_employee(&factory, &mut rng);
        let initiated = engine
            .initiate_resignation(&mut employee, ResignationRequest::default(), &mut rng, now())
            .unwrap();
        assert_eq!(initiated.dropped_transfers, 4);
        let due = employee.last_work_date().unwrap();
        let outcome = engine
            .complete_resignation(&mut employee, &[], &mut rng, due)
            .unwrap();
        assert!(outcome.backfilled_transfers.is_empty());
    }

    #[test]
    fn delayed_revocations_are_applied_when_due() {
        let config = EngineConfig {
            delayed_revocation_probability: 1.0,
            ..Default::default()
        };
        let (engine, factory, mut rng) = setup(config);
        let mut employee = four_account_employee(&factory, &mut rng);
        engine
            .initiate_resignation(&mut employee, ResignationRequest::default(), &mut rng, now())
            .unwrap();
        let due = employee.last_work_date().unwrap();
        let outcome = engine
            .complete_resignation(&mut employee, &[], &mut rng, due)
            .unwrap();
        assert_eq!(outcome.delayed_revocations.len(), 4);
        assert!(outcome.revoked_permissions.is_empty());
        assert!(engine.apply_scheduled_revocations(&mut employee, due).is_empty());

        let revoked = engine.apply_scheduled_revocations(&mut employee, due + Duration::days(7));
        assert_eq!(revoked.len(), 4);
        assert!(employee.permissions.values().all(|p| !p.is_active()));
    }

    #[test]
    fn post_resignation_requires_resigned_status() {
        let (engine, factory, mut rng) = setup(EngineConfig::default());
        let mut employee = factory.create_employee(&mut rng, today());
        assert!(
            engine
                .simulate_post_resignation_activities(&mut employee, &mut rng, now())
                .is_err()
        );
    }

    #[test]
    fn post_resignation_patterns_do_not_pile_up() {
        let (engine, factory, mut rng) = setup(EngineConfig::default());
        let mut employee = factory.create_employee_with_role(Role::Technical, &mut rng, today());
        engine
            .initiate_resignation(
                &mut employee,
                ResignationRequest {
                    resignation_type: Some(ResignationType::Involuntary),
                    reason: Some("violation of discipline".into()),
                    urgent: Some(true),
                },
                &mut rng,
                now(),
            )
            .unwrap();
        let due = employee.last_work_date().unwrap();
        engine
            .complete_resignation(&mut employee, &[], &mut rng, due)
            .unwrap();
        for day in 1..30 {
            engine
                .simulate_post_resignation_activities(&mut employee, &mut rng, due + Duration::days(day))
                .unwrap();
        }
        let pending = employee
            .pending_anomalies(AnomalyPhase::PostResignation)
            .count();
        assert!(pending >= 1);
        assert!(pending <= 4);
    }
}
