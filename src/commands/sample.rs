use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::ArgMatches;

use crate::core::config::default_monitored_volume;
use crate::core::node_stats::Sampler;
use crate::platform::SysinfoProvider;

/// Take a single sample and print its record as JSON (for scripting)
pub fn execute(matches: &ArgMatches) -> Result<()> {
    let volume = matches
        .get_one::<String>("volume")
        .map(PathBuf::from)
        .unwrap_or_else(default_monitored_volume);

    let mut sampler = Sampler::new(SysinfoProvider::new(), volume);
    sampler.warm_up();
    std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);

    let snapshot = sampler.sample();
    let record = sampler
        .encode(&snapshot)
        .context("Failed to encode sample")?;

    let output = if matches.get_flag("pretty") {
        serde_json::to_string_pretty(&record)?
    } else {
        serde_json::to_string(&record)?
    };
    println!("{}", output);

    Ok(())
}
