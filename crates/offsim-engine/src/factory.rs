//! Entity factory: synthetic employees with accounts and permissions.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use chrono::{Duration, NaiveDate};
use offsim_core::catalog::{Catalog, RoleProfile, Sensitivity, SystemSpec};
use offsim_core::ids::EmployeeId;
use offsim_core::models::account::{Account, AccountType};
use offsim_core::models::employee::{
    BehaviorProfile, Employee, EmploymentStatus, Role, WorkPattern,
};
use offsim_core::models::permission::{AccessLevel, Permission};
use rand::Rng;
use rand::seq::IndexedRandom;

/// First sequence number handed out by a fresh factory.
pub const FIRST_SEQUENCE: u32 = 100_001;

/// Builds employees from the catalog.
///
/// Ids come from a monotonically increasing counter, so every employee a
/// factory creates has a distinct id.
pub struct EntityFactory {
    catalog: Arc<Catalog>,
    next_sequence: AtomicU32,
}

impl EntityFactory {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self::with_start_sequence(catalog, FIRST_SEQUENCE)
    }

    pub fn with_start_sequence(catalog: Arc<Catalog>, start: u32) -> Self {
        Self {
            catalog,
            next_sequence: AtomicU32::new(start),
        }
    }

    /// Create an employee with a role drawn from the role distribution.
    pub fn create_employee<R: Rng + ?Sized>(&self, rng: &mut R, today: NaiveDate) -> Employee {
        let role = *self.catalog.role_distribution.choose(rng);
        self.create_employee_with_role(role, rng, today)
    }

    pub fn create_employee_with_role<R: Rng + ?Sized>(
        &self,
        role: Role,
        rng: &mut R,
        today: NaiveDate,
    ) -> Employee {
        let id = EmployeeId::from_sequence(self.next_sequence.fetch_add(1, Ordering::Relaxed));
        let profile = self.catalog.role(role);

        let first = pick(&self.catalog.first_names, rng);
        let last = pick(&self.catalog.last_names, rng);
        let hire_date = today - Duration::days(rng.random_range(30..=5 * 365));

        let mut accounts = BTreeMap::new();
        let mut permissions = BTreeMap::new();
        for system in &self.catalog.systems {
            let granted: Vec<AccountType> = system
                .account_types
                .iter()
                .copied()
                .filter(|ty| self.eligible(system, *ty, role, rng))
                .collect();
            if granted.is_empty() {
                continue;
            }

            let access_level = if granted.iter().any(AccountType::is_privileged) {
                AccessLevel::Admin
            } else {
                profile.default_access
            };
            permissions.insert(
                system.name.clone(),
                Permission::new(id.clone(), &system.name, access_level, hire_date),
            );
            for ty in granted {
                let account = Account::new(id.clone(), &system.name, ty, hire_date);
                accounts.insert(account.key(), account);
            }
        }

        Employee {
            email: format!("{}@company.com", id.as_str().to_lowercase()),
            name: format!("{first} {last}"),
            department: pick(&profile.departments, rng),
            title: pick(&profile.titles, rng),
            role,
            status: EmploymentStatus::Active,
            hire_date,
            performance_rating: (rng.random_range(1.0..=5.0_f64) * 10.0).round() / 10.0,
            security_clearance: profile.clearance,
            resignation: None,
            resignation_risk_score: 0.0,
            accounts,
            permissions,
            behavior_profile: behavior_profile(role, profile, rng),
            anomaly_history: Vec::new(),
            id,
        }
    }

    /// Account eligibility policy by system sensitivity and role.
    fn eligible<R: Rng + ?Sized>(
        &self,
        system: &SystemSpec,
        account_type: AccountType,
        role: Role,
        rng: &mut R,
    ) -> bool {
        let policy = &self.catalog.grant_policy;
        match system.sensitivity {
            Sensitivity::ExtremelyHigh => {
                let by_role = if account_type.is_privileged() {
                    matches!(role, Role::Executive | Role::Technical | Role::Finance)
                } else {
                    matches!(
                        role,
                        Role::Executive | Role::Technical | Role::Finance | Role::Hr
                    )
                };
                by_role || rng.random_bool(policy.extremely_high_fallback)
            }
            Sensitivity::High => role != Role::General || rng.random_bool(policy.high_general),
            Sensitivity::Medium | Sensitivity::Low => rng.random_bool(policy.standard),
        }
    }
}

fn pick<R: Rng + ?Sized>(values: &[String], rng: &mut R) -> String {
    values.choose(rng).cloned().unwrap_or_default()
}

fn behavior_profile<R: Rng + ?Sized>(
    role: Role,
    profile: &RoleProfile,
    rng: &mut R,
) -> BehaviorProfile {
    let work_pattern = *profile.work_patterns.choose(rng);

    let typical_login_hour = match work_pattern {
        WorkPattern::Standard => 9,
        WorkPattern::EarlyBird => 7,
        WorkPattern::NightOwl => 11,
        WorkPattern::Flexible => rng.random_range(8..=10),
    };
    let after_hours_ratio = match work_pattern {
        WorkPattern::NightOwl => rng.random_range(0.2..0.5),
        _ => rng.random_range(0.0..0.15),
    };
    let bulk_download_tendency = match role {
        Role::Technical | Role::Finance => rng.random_range(0.05..0.4),
        _ => rng.random_range(0.0..0.3),
    };
    let prior_policy_violations = if rng.random_bool(0.1) {
        rng.random_range(1..=3)
    } else {
        0
    };

    BehaviorProfile {
        work_pattern,
        typical_login_hour,
        avg_session_minutes: rng.random_range(30..=240),
        after_hours_ratio,
        bulk_download_tendency,
        prior_policy_violations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use offsim_core::weighted::WeightedTable;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn setup() -> (EntityFactory, StdRng, NaiveDate) {
        let catalog = Arc::new(Catalog::standard().unwrap());
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        (EntityFactory::new(catalog), StdRng::seed_from_u64(11), today)
    }

    #[test]
    fn ids_are_unique_and_sequential() {
        let (factory, mut rng, today) = setup();
        let ids: Vec<_> = (0..200)
            .map(|_| factory.create_employee(&mut rng, today).id)
            .collect();
        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
        assert_eq!(ids[0].as_str(), "EMP100001");
        assert_eq!(ids[1].as_str(), "EMP100002");
    }

    #[test]
    fn permission_exists_for_every_account_system() {
        let (factory, mut rng, today) = setup();
        for _ in 0..100 {
            let employee = factory.create_employee(&mut rng, today);
            assert_eq!(employee.status, EmploymentStatus::Active);
            for account in employee.accounts.values() {
                assert_eq!(account.owner, employee.id);
                assert!(employee.has_active_permission(&account.system));
            }
            for (system, permission) in &employee.permissions {
                assert!(employee.accounts.values().any(|a| &a.system == system));
                let privileged = employee
                    .accounts
                    .values()
                    .any(|a| &a.system == system && a.privileged);
                assert_eq!(permission.access_level == AccessLevel::Admin, privileged);
            }
        }
    }

    #[test]
    fn technical_staff_get_production_access() {
        let (factory, mut rng, today) = setup();
        let employee = factory.create_employee_with_role(Role::Technical, &mut rng, today);
        assert!(employee.accounts.contains_key("production-db:database"));
        assert!(employee.accounts.contains_key("production-db:admin"));
        assert!(employee.accounts.contains_key("source-control:application"));
    }

    #[test]
    fn hr_gets_non_privileged_hris_only_by_role() {
        let (factory, mut rng, today) = setup();
        let employee = factory.create_employee_with_role(Role::Hr, &mut rng, today);
        assert!(employee.accounts.contains_key("hris:application"));
    }

    #[test]
    fn work_pattern_follows_the_role_table() {
        let mut catalog = Catalog::standard().unwrap();
        catalog.roles.technical.work_patterns =
            WeightedTable::new(vec![(WorkPattern::NightOwl, 1.0)]).unwrap();
        let factory = EntityFactory::new(Arc::new(catalog));
        let mut rng = StdRng::seed_from_u64(3);
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();

        for _ in 0..20 {
            let employee = factory.create_employee_with_role(Role::Technical, &mut rng, today);
            assert_eq!(employee.behavior_profile.work_pattern, WorkPattern::NightOwl);
            assert_eq!(employee.behavior_profile.typical_login_hour, 11);
            assert!(employee.behavior_profile.after_hours_ratio >= 0.2);
        }
    }

    #[test]
    fn seeded_factories_agree() {
        let (a, _, today) = setup();
        let (b, _, _) = setup();
        let x = a.create_employee(&mut StdRng::seed_from_u64(5), today);
        let y = b.create_employee(&mut StdRng::seed_from_u64(5), today);
        assert_eq!(x.id, y.id);
        assert_eq!(x.name, y.name);
        assert_eq!(
            x.accounts.keys().collect::<Vec<_>>(),
            y.accounts.keys().collect::<Vec<_>>()
        );
    }
}
