//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::settings::Settings;

/// Offboarding log simulator
#[derive(Debug, Parser)]
#[command(name = "offsim")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Overrides applied on top of the settings file.
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// TOML settings file
    #[arg(long, short, global = true, env = "OFFSIM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Seed of the random generator
    #[arg(long, global = true, env = "OFFSIM_SEED")]
    pub seed: Option<u64>,

    /// Directory receiving the log streams
    #[arg(long, global = true, env = "OFFSIM_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Size of the simulated workforce
    #[arg(long, global = true, env = "OFFSIM_EMPLOYEES")]
    pub employees: Option<usize>,

    /// Days to simulate before extracting or reporting
    #[arg(long, global = true, env = "OFFSIM_DAYS")]
    pub days: Option<u32>,

    /// Truncate existing log files instead of appending
    #[arg(long, global = true)]
    pub truncate: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Simulate the configured days, then run a full extraction
    Full,

    /// Simulate one day, then pick up its changes incrementally
    Incremental,

    /// Simulate a day and sync on every tick until ctrl-c
    Continuous {
        /// Seconds between ticks (defaults to the sync frequency)
        #[arg(long, env = "OFFSIM_INTERVAL_SECS")]
        interval_secs: Option<u64>,
    },

    /// Print HR, violation and sync statistics with a health score
    Health,

    /// Print accounts and permissions that outlived employment
    Compliance,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Full => "full",
            Command::Incremental => "incremental",
            Command::Continuous { .. } => "continuous",
            Command::Health => "health",
            Command::Compliance => "compliance",
        }
    }
}

impl Cli {
    /// Load the settings file (if any) and apply flag overrides.
    pub fn settings(&self) -> anyhow::Result<Settings> {
        let mut settings = match &self.global.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        let args = &self.global;
        if let Some(seed) = args.seed {
            settings.engine.seed = seed;
        }
        if let Some(dir) = &args.log_dir {
            settings.log_dir = dir.clone();
        }
        if let Some(employees) = args.employees {
            settings.engine.total_employees = employees;
        }
        if let Some(days) = args.days {
            settings.engine.simulation_days = days;
        }
        if args.truncate {
            settings.append = false;
        }
        settings.engine.validate()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "offsim",
            "--seed",
            "42",
            "--employees",
            "25",
            "full",
            "--days",
            "3",
        ])
        .unwrap();
        let settings = cli.settings().unwrap();
        assert_eq!(settings.engine.seed, 42);
        assert_eq!(settings.engine.total_employees, 25);
        assert_eq!(settings.engine.simulation_days, 3);
        assert!(settings.append);
        assert_eq!(cli.command.name(), "full");
    }

    #[test]
    fn settings_file_is_read_before_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("offsim.toml");
        std::fs::write(
            &path,
            "log_dir = \"out\"\n[engine]\nseed = 5\ntotal_employees = 40\n",
        )
        .unwrap();

        let cli = Cli::try_parse_from([
            "offsim",
            "--config",
            path.to_str().unwrap(),
            "--seed",
            "6",
            "--truncate",
            "compliance",
        ])
        .unwrap();
        let settings = cli.settings().unwrap();
        assert_eq!(settings.engine.seed, 6);
        assert_eq!(settings.engine.total_employees, 40);
        assert_eq!(settings.log_dir, PathBuf::from("out"));
        assert!(!settings.append);
    }

    #[test]
    fn continuous_takes_an_interval() {
        let cli =
            Cli::try_parse_from(["offsim", "continuous", "--interval-secs", "30"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Continuous {
                interval_secs: Some(30)
            }
        ));
    }
}
