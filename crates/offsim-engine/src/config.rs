//! Engine configuration.

use offsim_core::error::{SimError, SimResult};
use serde::{Deserialize, Serialize};

/// What to do when transfer records and accounts disagree.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TransferPolicy {
    /// One record per account, backfilled at completion if missing.
    Enforce,
    /// Drop each record at creation with `drop_rate`, never backfill.
    AllowDrift { drop_rate: f64 },
}

/// Batch extraction and scheduling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Interval between scheduled incremental batches (default: 600).
    pub frequency_secs: u64,
    /// Budget for a full extraction in simulated seconds (default: 900).
    pub full_extract_time_limit_secs: f64,
    /// Budget for an incremental sync in simulated seconds (default: 15).
    pub incremental_sync_time_limit_secs: f64,
    /// Upper bound of new access logs picked up per incremental sync.
    pub incremental_sync_max: u64,
    /// Employees per extraction page (default: 1000).
    pub employee_batch_size: u64,
    /// Access log entries per extraction page (default: 50 000).
    pub access_log_batch_size: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            frequency_secs: 600,
            full_extract_time_limit_secs: 900.0,
            incremental_sync_time_limit_secs: 15.0,
            incremental_sync_max: 5000,
            employee_batch_size: 1000,
            access_log_batch_size: 50_000,
        }
    }
}

/// Configuration for the generators and the lifecycle engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seed of the simulation's random generator.
    pub seed: u64,
    pub total_employees: usize,
    /// Days simulated by a full batch.
    pub simulation_days: u32,
    /// The simulated clock starts this many days before today.
    pub start_offset_days: i64,
    /// Monthly share of employees handing in their notice.
    pub resignation_rate: f64,
    /// Daily probability of a violation attempt at risk 1.0.
    pub violation_rate: f64,
    /// Days after the last work day with halved violation probability.
    pub grace_period_days: i64,
    pub notice_days: i64,
    pub urgent_notice_days: i64,
    pub urgent_probability: f64,
    pub voluntary_probability: f64,
    /// Risk above which pending employees act out their anomalies.
    pub pending_anomaly_risk_threshold: f64,
    pub disable_oversight_probability: f64,
    pub delayed_revocation_probability: f64,
    pub max_revocation_delay_days: i64,
    pub transfer_success_rate: f64,
    pub transfer_policy: TransferPolicy,
    pub sync: SyncConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 20_250_604,
            total_employees: 1000,
            simulation_days: 30,
            start_offset_days: 90,
            resignation_rate: 0.02,
            violation_rate: 0.05,
            grace_period_days: 7,
            notice_days: 30,
            urgent_notice_days: 3,
            urgent_probability: 0.1,
            voluntary_probability: 0.7,
            pending_anomaly_risk_threshold: 0.6,
            disable_oversight_probability: 0.05,
            delayed_revocation_probability: 0.1,
            max_revocation_delay_days: 7,
            transfer_success_rate: 0.95,
            transfer_policy: TransferPolicy::Enforce,
            sync: SyncConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Reject probabilities outside `[0, 1]` and non-positive periods.
    pub fn validate(&self) -> SimResult<()> {
        let probabilities = [
            ("resignation_rate", self.resignation_rate),
            ("violation_rate", self.violation_rate),
            ("urgent_probability", self.urgent_probability),
            ("voluntary_probability", self.voluntary_probability),
            (
                "pending_anomaly_risk_threshold",
                self.pending_anomaly_risk_threshold,
            ),
            (
                "disable_oversight_probability",
                self.disable_oversight_probability,
            ),
            (
                "delayed_revocation_probability",
                self.delayed_revocation_probability,
            ),
            ("transfer_success_rate", self.transfer_success_rate),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(format!("{name} = {value} is outside [0, 1]")));
            }
        }
        if let TransferPolicy::AllowDrift { drop_rate } = self.transfer_policy {
            if !(0.0..=1.0).contains(&drop_rate) {
                return Err(invalid(format!("drop_rate = {drop_rate} is outside [0, 1]")));
            }
        }
        if self.notice_days < 0 || self.urgent_notice_days < 0 || self.grace_period_days < 0 {
            return Err(invalid("notice and grace periods must not be negative".into()));
        }
        if self.urgent_notice_days > self.notice_days {
            return Err(invalid("urgent notice exceeds the standard notice".into()));
        }
        if self.max_revocation_delay_days < 1 {
            return Err(invalid("max_revocation_delay_days must be at least 1".into()));
        }
        if self.sync.employee_batch_size == 0 || self.sync.access_log_batch_size == 0 {
            return Err(invalid("batch sizes must be positive".into()));
        }
        if self.sync.frequency_secs == 0 {
            return Err(invalid("sync frequency must be positive".into()));
        }
        Ok(())
    }
}

fn invalid(message: String) -> SimError {
    SimError::Configuration { message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn out_of_range_probability_is_rejected() {
        let config = EngineConfig {
            violation_rate: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SimError::Configuration { .. })
        ));
    }

    #[test]
    fn drift_rate_is_checked() {
        let config = EngineConfig {
            transfer_policy: TransferPolicy::AllowDrift { drop_rate: -0.1 },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn urgent_notice_cannot_exceed_standard_notice() {
        let config = EngineConfig {
            urgent_notice_days: 40,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
