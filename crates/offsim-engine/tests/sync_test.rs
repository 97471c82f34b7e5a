use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use offsim_core::catalog::Catalog;
use offsim_core::ids::random_uuid;
use offsim_core::repository::AccessLogRepository;
use offsim_core::sink::LogStream;
use offsim_engine::sync::{CheckStatus, SyncKind};
use offsim_engine::{
    EngineConfig, Repositories, Simulation, SyncConfig, SyncDriver, SyncOutcome, run_scheduled,
};
use offsim_store::MemorySink;
use rand::SeedableRng;
use rand::rngs::StdRng;
use offsim_store::repository::{
    MemoryAccessLogRepository, MemoryAlertRepository, MemoryEmployeeRepository,
    MemoryTransferRepository,
};

type MemorySimulation = Simulation<
    MemoryEmployeeRepository,
    MemoryTransferRepository,
    MemoryAccessLogRepository,
    MemoryAlertRepository,
>;

fn setup(total_employees: usize) -> (MemorySimulation, SyncDriver, Arc<MemorySink>) {
    let config = EngineConfig {
        total_employees,
        seed: 99,
        sync: SyncConfig {
            employee_batch_size: 100,
            access_log_batch_size: 2_000,
            ..Default::default()
        },
        ..Default::default()
    };
    let sink = Arc::new(MemorySink::new());
    let repos = Repositories {
        employees: MemoryEmployeeRepository::new(),
        transfers: MemoryTransferRepository::new(),
        access_logs: MemoryAccessLogRepository::new(),
        alerts: MemoryAlertRepository::new(),
    };
    let driver = SyncDriver::new(config.sync.clone(), config.seed, sink.clone());
    let mut sim = Simulation::new(repos, sink.clone(), Arc::new(Catalog::standard().unwrap()), config)
        .unwrap()
        .with_start_date(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
    sim.initialize().unwrap();
    (sim, driver, sink)
}

fn completed(outcome: SyncOutcome) -> offsim_engine::SyncSummary {
    match outcome {
        SyncOutcome::Completed(summary) => summary,
        SyncOutcome::Skipped => panic!("sync was skipped"),
    }
}

#[test]
fn full_extraction_pages_with_lineage() {
    let (mut sim, driver, sink) = setup(250);
    sim.run(2);

    let summary = completed(driver.perform_full_extraction(&sim).unwrap());
    assert_eq!(summary.kind, SyncKind::Full);
    assert_eq!(summary.stages["employees"], 250);
    assert_eq!(summary.stages["access_logs"], sim.access_logs().count());

    let employee_batches: Vec<_> = summary
        .batches
        .iter()
        .filter(|b| b.stage == "employees")
        .collect();
    assert_eq!(employee_batches.len(), 3);
    assert_eq!(employee_batches[2].records, 50);
    assert!(summary.batches.iter().all(|b| b.lineage_id.len() == 64));
    assert!(summary.within_limit);
    assert_eq!(driver.last_sync(), Some(sim.now()));
    assert_eq!(sink.count(LogStream::DataCollection), summary.batches.len());
    assert!(sink.count(LogStream::Performance) >= 1);
}

#[test]
fn full_extraction_processes_every_system_once() {
    let (mut sim, driver, _) = setup(60);
    sim.run(2);

    let summary = completed(driver.perform_full_extraction(&sim).unwrap());
    let systems: Vec<&str> = sim.catalog().systems.iter().map(|s| s.name.as_str()).collect();
    let processed: Vec<&str> = summary
        .semi_structured
        .iter()
        .map(|b| b.system.as_str())
        .collect();
    assert_eq!(processed, systems);

    for batch in &summary.semi_structured {
        assert!((50_000..=100_000).contains(&batch.records));
        assert!((1.0..5.0).contains(&batch.processing_secs));
        assert_eq!(batch.lineage_id.len(), 64);
    }
    let total: u64 = summary.semi_structured.iter().map(|b| b.records).sum();
    assert_eq!(summary.stages["semi_structured"], total);

    let lineage: Vec<_> = summary
        .batches
        .iter()
        .filter(|b| b.stage == "semi_structured")
        .collect();
    assert_eq!(lineage.len(), systems.len());
    let distinct: std::collections::HashSet<_> = lineage.iter().map(|b| &b.lineage_id).collect();
    assert_eq!(distinct.len(), lineage.len());
    assert_eq!(
        summary.batches.iter().filter(|b| b.stage == "structured_records").count(),
        1
    );
}

#[test]
fn structured_extraction_follows_account_sets() {
    let (mut sim, driver, _) = setup(80);
    sim.run(10);

    let employees = sim.all_employees().unwrap();
    let logs = sim.access_logs().list_all().unwrap();
    let departing: Vec<_> = employees.iter().filter(|e| !e.is_active()).collect();
    assert!(!departing.is_empty());

    let default = driver.extract_structured_data(&sim, None).unwrap();
    let expected = logs
        .iter()
        .filter(|e| departing.iter().any(|d| d.id == e.user_id && !d.accounts.is_empty()))
        .count();
    assert_eq!(default.records.len(), expected);
    let with_accounts = departing.iter().filter(|d| !d.accounts.is_empty()).count();
    assert_eq!(default.owners, with_accounts);
    assert_eq!(default.lineage.stage, "structured_records");
    assert_eq!(default.lineage.records, expected as u64);

    let target = employees.iter().find(|e| !e.accounts.is_empty()).unwrap();
    let mut accounts: Vec<String> = target.accounts.values().map(|a| a.account_id.clone()).collect();
    accounts.push("EMP999999_nowhere_domain".into());
    let single = driver.extract_structured_data(&sim, Some(accounts.as_slice())).unwrap();
    assert_eq!(single.accounts, target.accounts.len());
    assert_eq!(single.owners, 1);
    assert!(single.records.iter().all(|e| e.user_id == target.id));
    assert_eq!(
        single.records.len(),
        logs.iter().filter(|e| e.user_id == target.id).count()
    );

    let missing = vec!["EMP999999_nowhere_domain".to_string()];
    let unknown = driver
        .extract_structured_data(&sim, Some(missing.as_slice()))
        .unwrap();
    assert_eq!(unknown.owners, 0);
    assert!(unknown.records.is_empty());
}

#[test]
fn overlapping_requests_are_skipped() {
    let (sim, driver, sink) = setup(20);

    let guard = driver.try_begin().unwrap();
    assert!(driver.is_running());
    assert!(matches!(
        driver.perform_full_extraction(&sim).unwrap(),
        SyncOutcome::Skipped
    ));
    assert!(matches!(
        driver.perform_incremental_sync(&sim, sim.now()).unwrap(),
        SyncOutcome::Skipped
    ));
    assert!(driver.try_begin().is_none());
    drop(guard);

    assert!(!driver.is_running());
    completed(driver.perform_incremental_sync(&sim, sim.now()).unwrap());
    let stats = driver.statistics();
    assert_eq!(stats.skipped_syncs, 2);
    assert_eq!(stats.completed_syncs, 1);
    assert_eq!(sink.count(LogStream::Error), 2);
}

#[test]
fn incremental_sync_covers_only_the_new_window() {
    let (mut sim, driver, _) = setup(100);
    sim.run(2);

    let logs = sim.access_logs();
    let before_now = logs.count() - logs.count_since(sim.now());
    let first = completed(driver.perform_incremental_sync(&sim, sim.now()).unwrap());
    assert_eq!(first.stages["access_logs"], before_now.min(5000));
    assert!(first.stages["resignations"] >= 2);
    assert!(first.within_limit);

    sim.run_day();
    let logs = sim.access_logs();
    let logged_today =
        logs.count_since(driver.last_sync().unwrap()) - logs.count_since(sim.now());
    let second = completed(driver.perform_incremental_sync(&sim, sim.now()).unwrap());
    assert_eq!(second.stages["access_logs"], logged_today.min(5000));
    assert!(second.stages["resignations"] >= 1);

    let third = completed(driver.perform_incremental_sync(&sim, sim.now()).unwrap());
    assert_eq!(third.stages["resignations"], 0);
    assert_eq!(third.stages["account_changes"], 0);
}

#[test]
fn records_at_the_sync_boundary_go_to_the_next_batch() {
    let (mut sim, driver, _) = setup(30);
    sim.run(1);
    completed(driver.perform_incremental_sync(&sim, sim.now()).unwrap());
    let boundary = driver.last_sync().unwrap();

    let mut entry = sim.access_logs().list_all().unwrap()[0].clone();
    entry.id = random_uuid(&mut StdRng::seed_from_u64(1));
    entry.timestamp = boundary;
    sim.access_logs().append(vec![entry]).unwrap();
    let later = boundary + chrono::Duration::hours(1);
    let spill = sim.access_logs().count_since(later);

    let next = completed(driver.perform_incremental_sync(&sim, later).unwrap());
    let counted = sim.access_logs().count_since(boundary) - spill;
    assert_eq!(next.stages["access_logs"], counted);
    assert!(counted >= 1);

    let empty = completed(driver.perform_incremental_sync(&sim, later).unwrap());
    assert_eq!(empty.stages["access_logs"], 0);
}

#[test]
fn validation_passes_on_generated_data() {
    let (mut sim, driver, sink) = setup(100);
    sim.run(35);
    completed(driver.perform_full_extraction(&sim).unwrap());

    let results = driver.validate_data(&sim).unwrap();
    assert_eq!(results.checks.len(), 4);
    assert_eq!(results.overall, CheckStatus::Pass, "{:?}", results.checks);
    assert!(sink.count(LogStream::DataSync) >= 4);
}

#[test]
fn validation_warns_before_first_sync() {
    let (sim, driver, _) = setup(10);
    let results = driver.validate_data(&sim).unwrap();
    let timeliness = results
        .checks
        .iter()
        .find(|c| c.name == "timeliness")
        .unwrap();
    assert_eq!(timeliness.status, CheckStatus::Warning);
    assert_eq!(results.overall, CheckStatus::Warning);
}

#[tokio::test]
async fn scheduled_mode_runs_until_shutdown() {
    let (sim, driver, _) = setup(30);
    let sim = Arc::new(tokio::sync::Mutex::new(sim));
    let driver = Arc::new(driver);

    let batches = run_scheduled(
        sim.clone(),
        driver.clone(),
        Duration::from_millis(10),
        tokio::time::sleep(Duration::from_millis(120)),
    )
    .await;

    assert!(batches >= 1);
    let sim = sim.lock().await;
    assert!(sim.days_run() >= 1);
    assert!(driver.last_sync().is_some());
    assert!(!driver.is_running());
}
