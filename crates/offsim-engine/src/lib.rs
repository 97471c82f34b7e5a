//! OFFSIM Engine: entity factory, risk scoring, the offboarding
//! lifecycle, access log generation, consistency checks, reporting and
//! the batch sync driver.
//!
//! All randomness flows through a caller-supplied `Rng`; the
//! [`Simulation`] owns a seeded generator, so a seed reproduces a run.

pub mod access;
pub mod config;
pub mod consistency;
pub mod error;
pub mod factory;
pub mod lifecycle;
pub mod report;
pub mod risk;
pub mod simulation;
pub mod sync;

pub use access::{AccessLogGenerator, DayActivity, Directory, entry_risk_score};
pub use config::{EngineConfig, SyncConfig, TransferPolicy};
pub use consistency::{ConsistencyChecker, ConsistencyReport, Finding};
pub use error::LifecycleError;
pub use factory::EntityFactory;
pub use lifecycle::{CompletionOutcome, LifecycleEngine, ResignationOutcome, ResignationRequest};
pub use report::{ComplianceReport, HealthAssessment, HealthLevel, SyncStatistics};
pub use risk::{RiskFactors, RiskScorer};
pub use simulation::{DayReport, Repositories, Simulation};
pub use sync::{
    StructuredExtract, SyncDriver, SyncOutcome, SyncSummary, SystemLogBatch, ValidationResults,
    run_scheduled,
};
