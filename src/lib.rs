// Nodestats Library - Public API

// Re-export error types
pub mod error;
pub use error::{NodeStatsError, Result};

// Module declarations
pub mod commands;
pub mod core;
pub mod platform;

// Re-export commonly used types
pub use crate::core::config::{AgentConfig, NodeIdentity};

// Initialize logging
pub fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp_millis()
        .init();
}
