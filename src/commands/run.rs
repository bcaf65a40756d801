//! Agent command handler.
//!
//! Resolves configuration, registers the periodic sampler and runs until
//! Ctrl-C, then unregisters.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::ArgMatches;
use log::info;
use tokio::sync::watch;

use crate::core::config::AgentConfig;
use crate::core::node_stats::{JsonLinesEmitter, PeriodicRunner, RunnerConfig, Sampler};
use crate::platform::{host_info, SysinfoProvider};

/// Execute the run command
pub fn execute(matches: &ArgMatches) -> Result<()> {
    let config = build_config(matches)?;

    info!("nodestats {}", env!("CARGO_PKG_VERSION"));
    info!("host: {}", host_info());
    info!(
        "identity: {} volume: {} interval: {:?}",
        config.identity,
        config.monitored_volume.display(),
        config.interval
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_time()
        .thread_name("nodestats-worker")
        .build()
        .context("Failed to build Tokio runtime")?;

    runtime.block_on(run_agent(config))
}

fn build_config(matches: &ArgMatches) -> Result<AgentConfig> {
    let mut config = AgentConfig::from_env();

    if let Some(secs) = matches.get_one::<u64>("interval").copied() {
        if secs == 0 {
            bail!("Interval must be at least one second");
        }
        config.interval = Duration::from_secs(secs);
    }

    if let Some(volume) = matches.get_one::<String>("volume") {
        config.monitored_volume = PathBuf::from(volume);
    }

    config.cleanup_on_exit = !matches.get_flag("no-cleanup");
    config.emit_records = !matches.get_flag("no-records");

    Ok(config)
}

async fn run_agent(config: AgentConfig) -> Result<()> {
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    ctrlc::set_handler(move || {
        let _ = shutdown_tx.send(true);
    })
    .context("Failed to install Ctrl-C handler")?;

    let sampler = Sampler::new(SysinfoProvider::new(), config.monitored_volume.clone());
    let emitter = JsonLinesEmitter::stdout(config.emitter_config());
    let runner_config = RunnerConfig {
        interval: config.interval,
        ..Default::default()
    };

    let mut runner = PeriodicRunner::new(config.identity.clone(), sampler, emitter, runner_config);
    runner
        .register()
        .await
        .context("Failed to start stats sampler")?;

    // Sender lives in the Ctrl-C handler, so this only returns on a signal
    let _ = shutdown_rx.changed().await;
    info!("shutdown requested");

    runner.unregister(config.cleanup_on_exit).await;
    info!("{} cycles completed", runner.cycles_completed());

    Ok(())
}
