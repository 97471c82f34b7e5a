//! Subcommand execution.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use offsim_core::catalog::Catalog;
use offsim_core::sink::RecordSink;
use offsim_engine::{Repositories, Simulation, SyncDriver, SyncOutcome, run_scheduled};
use offsim_store::FileSink;
use offsim_store::repository::{
    MemoryAccessLogRepository, MemoryAlertRepository, MemoryEmployeeRepository,
    MemoryTransferRepository,
};
use serde::Serialize;
use serde_json::json;
use tracing::info;

use crate::cli::Command;
use crate::settings::Settings;

type MemorySimulation = Simulation<
    MemoryEmployeeRepository,
    MemoryTransferRepository,
    MemoryAccessLogRepository,
    MemoryAlertRepository,
>;

pub async fn run(command: Command, settings: Settings) -> anyhow::Result<()> {
    let sink: Arc<dyn RecordSink> = Arc::new(
        FileSink::open(&settings.sink())
            .with_context(|| format!("opening log directory {}", settings.log_dir.display()))?,
    );
    let mut sim = build(&settings, sink.clone())?;
    let driver = SyncDriver::new(settings.engine.sync.clone(), settings.engine.seed, sink.clone());
    sim.initialize()?;

    match command {
        Command::Full => {
            let days = simulate(&mut sim, settings.engine.simulation_days);
            let outcome = driver.perform_full_extraction(&sim)?;
            let validation = driver.validate_data(&sim)?;
            print(&json!({
                "days": days,
                "sync": outcome,
                "validation": validation,
                "statistics": driver.statistics(),
            }))?;
        }
        Command::Incremental => {
            let days = simulate(&mut sim, 1);
            let now = sim.now();
            let outcome = driver.perform_incremental_sync(&sim, now)?;
            if matches!(outcome, SyncOutcome::Skipped) {
                info!("Incremental sync skipped");
            }
            print(&json!({
                "days": days,
                "sync": outcome,
                "statistics": driver.statistics(),
            }))?;
        }
        Command::Continuous { interval_secs } => {
            let period = Duration::from_secs(
                interval_secs
                    .unwrap_or(settings.engine.sync.frequency_secs)
                    .max(1),
            );
            let sim = Arc::new(tokio::sync::Mutex::new(sim));
            let driver = Arc::new(driver);
            info!(period_secs = period.as_secs(), "Continuous mode started, ctrl-c to stop");
            let shutdown = async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::error!(error = %e, "Failed to listen for ctrl-c");
                }
            };
            let batches = run_scheduled(sim.clone(), driver.clone(), period, shutdown).await;
            let sim = sim.lock().await;
            print(&json!({
                "batches": batches,
                "days": sim.days_run(),
                "statistics": driver.statistics(),
            }))?;
        }
        Command::Health => {
            simulate(&mut sim, settings.engine.simulation_days);
            driver.perform_full_extraction(&sim)?;
            print(&json!({
                "health": sim.assess_health()?,
                "hr": sim.hr_statistics()?,
                "violations": sim.violation_statistics()?,
                "sync": driver.statistics(),
            }))?;
        }
        Command::Compliance => {
            simulate(&mut sim, settings.engine.simulation_days);
            print(&sim.monitor_account_status()?)?;
        }
    }

    sink.flush()?;
    Ok(())
}

fn build(settings: &Settings, sink: Arc<dyn RecordSink>) -> anyhow::Result<MemorySimulation> {
    let catalog = Arc::new(Catalog::standard()?);
    let repos = Repositories {
        employees: MemoryEmployeeRepository::new(),
        transfers: MemoryTransferRepository::new(),
        access_logs: MemoryAccessLogRepository::new(),
        alerts: MemoryAlertRepository::new(),
    };
    Ok(Simulation::new(repos, sink, catalog, settings.engine.clone())?)
}

/// Run `days` simulated days and summarize their reports.
fn simulate(sim: &mut MemorySimulation, days: u32) -> serde_json::Value {
    let reports = sim.run(days);
    let degraded = reports.iter().filter(|r| !r.failed_steps.is_empty()).count();
    let resignations: usize = reports.iter().map(|r| r.resignations).sum();
    let access_logs: usize = reports.iter().map(|r| r.access_logs).sum();
    let alerts: usize = reports.iter().map(|r| r.alerts).sum();
    info!(days, resignations, access_logs, alerts, degraded, "Simulation run complete");
    json!({
        "simulated": days,
        "degraded": degraded,
        "resignations": resignations,
        "access_logs": access_logs,
        "alerts": alerts,
    })
}

fn print<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
