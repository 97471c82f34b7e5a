use offsim_core::error::SimError;
use offsim_engine::{EngineConfig, TransferPolicy};

#[test]
fn partial_toml_keeps_defaults() {
    let config: EngineConfig = toml::from_str(
        r#"
        seed = 11
        total_employees = 250
        violation_rate = 0.08

        [sync]
        employee_batch_size = 200
        "#,
    )
    .unwrap();

    assert_eq!(config.seed, 11);
    assert_eq!(config.total_employees, 250);
    assert_eq!(config.grace_period_days, 7);
    assert_eq!(config.notice_days, 30);
    assert_eq!(config.transfer_policy, TransferPolicy::Enforce);
    assert_eq!(config.sync.employee_batch_size, 200);
    assert_eq!(config.sync.access_log_batch_size, 50_000);
    assert_eq!(config.sync.frequency_secs, 600);
    config.validate().unwrap();
}

#[test]
fn drift_policy_from_toml() {
    let config: EngineConfig = toml::from_str(
        r#"
        [transfer_policy]
        mode = "allow_drift"
        drop_rate = 0.2
        "#,
    )
    .unwrap();
    assert_eq!(
        config.transfer_policy,
        TransferPolicy::AllowDrift { drop_rate: 0.2 }
    );
    config.validate().unwrap();
}

#[test]
fn out_of_range_values_fail_validation() {
    let config: EngineConfig = toml::from_str("violation_rate = 1.5").unwrap();
    assert!(matches!(
        config.validate(),
        Err(SimError::Configuration { .. })
    ));
}
