//! Resignation risk scoring.

use std::sync::Arc;

use offsim_core::catalog::Catalog;
use offsim_core::error::SimResult;
use offsim_core::models::employee::{BehaviorProfile, Employee};

/// Reason multiplier that saturates the reason factor.
const MAX_REASON_MULTIPLIER: f64 = 3.0;

/// Prior violations that saturate the violation component.
const MAX_PRIOR_VIOLATIONS: f64 = 5.0;

/// The five factors behind a score, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskFactors {
    pub role: f64,
    pub sensitivity: f64,
    pub reason: f64,
    pub behavior: f64,
    pub timing: f64,
}

/// Pure, deterministic resignation risk scorer.
#[derive(Clone)]
pub struct RiskScorer {
    catalog: Arc<Catalog>,
}

impl RiskScorer {
    /// Fails when the catalog's risk weights do not sum to 1.0.
    pub fn new(catalog: Arc<Catalog>) -> SimResult<Self> {
        catalog.risk_weights.validate()?;
        Ok(Self { catalog })
    }

    pub fn factors(&self, employee: &Employee) -> RiskFactors {
        let role = self.catalog.role(employee.role).risk;

        // Only permissions still in force count.
        let sensitivity = employee
            .permissions
            .values()
            .filter(|p| p.is_active())
            .filter_map(|p| self.catalog.system(&p.system))
            .map(|s| *self.catalog.sensitivity_risk.get(s.sensitivity))
            .fold(0.0, f64::max);

        let (reason, timing) = match &employee.resignation {
            Some(info) => (
                (info.risk_multiplier / MAX_REASON_MULTIPLIER).min(1.0),
                if info.urgent { 1.0 } else { 0.4 },
            ),
            None => (0.0, 0.1),
        };

        RiskFactors {
            role,
            sensitivity,
            reason,
            behavior: behavior_risk(&employee.behavior_profile),
            timing,
        }
    }

    /// Weighted sum of the factors, clamped to `[0, 1]`.
    pub fn score(&self, employee: &Employee) -> f64 {
        let f = self.factors(employee);
        let w = &self.catalog.risk_weights;
        let score = w.role * f.role
            + w.sensitivity * f.sensitivity
            + w.reason * f.reason
            + w.behavior * f.behavior
            + w.timing * f.timing;
        score.clamp(0.0, 1.0)
    }
}

/// Behavioral component: after-hours habits, bulk downloads and prior
/// policy violations.
pub fn behavior_risk(profile: &BehaviorProfile) -> f64 {
    let violations = (f64::from(profile.prior_policy_violations) / MAX_PRIOR_VIOLATIONS).min(1.0);
    (0.4 * profile.after_hours_ratio + 0.4 * profile.bulk_download_tendency + 0.2 * violations)
        .clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::EntityFactory;
    use chrono::{NaiveDate, TimeZone, Utc};
    use offsim_core::models::employee::{ResignationInfo, ResignationType, Role};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn setup() -> (Arc<Catalog>, RiskScorer, EntityFactory) {
        let catalog = Arc::new(Catalog::standard().unwrap());
        let scorer = RiskScorer::new(catalog.clone()).unwrap();
        let factory = EntityFactory::new(catalog.clone());
        (catalog, scorer, factory)
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn resign(employee: &mut Employee, reason: &str, multiplier: f64, urgent: bool) {
        let at = Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap();
        employee.resignation = Some(ResignationInfo {
            resignation_type: ResignationType::Involuntary,
            reason: reason.into(),
            risk_multiplier: multiplier,
            resignation_date: at,
            last_work_date: at,
            urgent,
            completed_at: None,
        });
    }

    #[test]
    fn scores_stay_in_unit_interval() {
        let (_, scorer, factory) = setup();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..300 {
            let mut employee = factory.create_employee(&mut rng, today());
            assert!((0.0..=1.0).contains(&scorer.score(&employee)));
            resign(&mut employee, "violation of discipline", 3.0, true);
            assert!((0.0..=1.0).contains(&scorer.score(&employee)));
        }
    }

    #[test]
    fn scoring_is_idempotent() {
        let (_, scorer, factory) = setup();
        let employee = factory.create_employee(&mut StdRng::seed_from_u64(2), today());
        assert_eq!(scorer.score(&employee), scorer.score(&employee));
    }

    #[test]
    fn urgent_disciplinary_dismissal_of_engineer_is_high_risk() {
        let (_, scorer, factory) = setup();
        let mut employee =
            factory.create_employee_with_role(Role::Technical, &mut StdRng::seed_from_u64(3), today());
        resign(&mut employee, "violation of discipline", 3.0, true);
        let factors = scorer.factors(&employee);
        assert_eq!(factors.sensitivity, 1.0);
        assert_eq!(factors.reason, 1.0);
        assert_eq!(factors.timing, 1.0);
        assert!(scorer.score(&employee) > 0.6);
    }

    #[test]
    fn revoked_permissions_do_not_count() {
        let (_, scorer, factory) = setup();
        let mut employee =
            factory.create_employee_with_role(Role::Technical, &mut StdRng::seed_from_u64(4), today());
        let at = Utc.with_ymd_and_hms(2025, 6, 2, 0, 0, 0).unwrap();
        for permission in employee.permissions.values_mut() {
            permission.revoke(at);
        }
        assert_eq!(scorer.factors(&employee).sensitivity, 0.0);
    }

    #[test]
    fn no_resignation_uses_low_timing() {
        let (_, scorer, factory) = setup();
        let employee = factory.create_employee(&mut StdRng::seed_from_u64(5), today());
        let factors = scorer.factors(&employee);
        assert_eq!(factors.timing, 0.1);
        assert_eq!(factors.reason, 0.0);
    }

    #[test]
    fn unbalanced_weights_are_rejected() {
        let mut catalog = Catalog::standard().unwrap();
        catalog.risk_weights.role = 0.9;
        assert!(RiskScorer::new(Arc::new(catalog)).is_err());
    }

    #[test]
    fn behavior_component_saturates() {
        let profile = BehaviorProfile {
            work_pattern: offsim_core::models::employee::WorkPattern::NightOwl,
            typical_login_hour: 11,
            avg_session_minutes: 60,
            after_hours_ratio: 1.0,
            bulk_download_tendency: 1.0,
            prior_policy_violations: 12,
        };
        assert!((behavior_risk(&profile) - 1.0).abs() < 1e-9);
    }
}
