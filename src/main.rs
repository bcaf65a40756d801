use anyhow::Result;
use clap::{Arg, Command};

use nodestats::commands;

fn main() -> Result<()> {
    let matches = Command::new("nodestats")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Samples node resource counters and emits them as telemetry")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable debug logging (RUST_LOG overrides)")
                .global(true)
                .action(clap::ArgAction::SetTrue)
        )
        .subcommand(
            Command::new("run")
                .about("Register the node and emit stats until interrupted")
                .arg(
                    Arg::new("interval")
                        .short('i')
                        .long("interval")
                        .value_name("SECONDS")
                        .help("Seconds between samples (default: 5)")
                        .value_parser(clap::value_parser!(u64))
                )
                .arg(
                    Arg::new("volume")
                        .long("volume")
                        .value_name("PATH")
                        .help("Volume to report disk usage for")
                )
                .arg(
                    Arg::new("no-cleanup")
                        .long("no-cleanup")
                        .help("Keep the node registration on exit")
                        .action(clap::ArgAction::SetTrue)
                )
                .arg(
                    Arg::new("no-records")
                        .long("no-records")
                        .help("Only emit the memory metrics, not full records")
                        .action(clap::ArgAction::SetTrue)
                )
        )
        .subcommand(
            Command::new("sample")
                .about("Take one sample and print it as JSON")
                .arg(
                    Arg::new("volume")
                        .long("volume")
                        .value_name("PATH")
                        .help("Volume to report disk usage for")
                )
                .arg(
                    Arg::new("pretty")
                        .long("pretty")
                        .help("Pretty-print the record")
                        .action(clap::ArgAction::SetTrue)
                )
        )
        .subcommand(
            Command::new("ticks")
                .about("Convert a timestamp to 100ns ticks since 0001-01-01 UTC")
                .arg(
                    Arg::new("value")
                        .help("RFC 3339 timestamp, \"now\", or a tick count with --reverse")
                        .index(1)
                )
                .arg(
                    Arg::new("nanos")
                        .long("nanos")
                        .value_name("NANOSECONDS")
                        .help("Sub-microsecond nanoseconds to fold in")
                        .allow_hyphen_values(true)
                        .conflicts_with("reverse")
                )
                .arg(
                    Arg::new("reverse")
                        .short('r')
                        .long("reverse")
                        .help("Convert a tick count back to a timestamp")
                        .action(clap::ArgAction::SetTrue)
                )
        )
        .subcommand(
            Command::new("version")
                .about("Shows version information")
        )
        .get_matches();

    nodestats::init_logging(matches.get_flag("verbose"));

    match matches.subcommand() {
        Some(("run", sub_matches)) => commands::run(sub_matches)?,
        Some(("sample", sub_matches)) => commands::sample(sub_matches)?,
        Some(("ticks", sub_matches)) => commands::ticks(sub_matches)?,
        Some(("version", _)) => commands::version()?,
        _ => {
            println!("Use 'nodestats --help' for more information.");
        }
    }

    Ok(())
}
