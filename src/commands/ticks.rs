use anyhow::Result;
use chrono::{SecondsFormat, Utc};
use clap::ArgMatches;

use crate::core::node_stats::time_codec::{ticks_from_str, timestamp_from_ticks};

/// Convert an RFC 3339 timestamp (or "now") to ticks, or ticks back with --reverse
pub fn execute(matches: &ArgMatches) -> Result<()> {
    let input = matches
        .get_one::<String>("value")
        .map(String::as_str)
        .unwrap_or("now");

    if matches.get_flag("reverse") {
        let ticks: i64 = input
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("'{}' is not a tick count", input))?;
        let timestamp = timestamp_from_ticks(ticks)?;
        println!("{}", timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true));
        return Ok(());
    }

    let timestamp = if input == "now" {
        Utc::now().to_rfc3339()
    } else {
        input.to_string()
    };

    let nanos = matches.get_one::<String>("nanos").map(String::as_str);
    println!("{}", ticks_from_str(&timestamp, nanos)?);

    Ok(())
}
