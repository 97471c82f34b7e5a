//! OFFSIM: offboarding log simulator entry point.

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod settings;

use cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("offsim=info".parse()?))
        .json()
        .init();

    let cli = Cli::parse();
    let settings = cli.settings()?;

    tracing::info!(
        mode = cli.command.name(),
        seed = settings.engine.seed,
        log_dir = %settings.log_dir.display(),
        "Starting offsim"
    );
    commands::run(cli.command, settings).await?;
    tracing::info!("offsim finished");
    Ok(())
}
