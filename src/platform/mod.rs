// Platform-specific code module

pub mod counters;
pub mod diskperf;
pub mod host;
pub mod procfs;
pub mod users;

// Re-exports for cleaner imports
pub use counters::SysinfoProvider;
pub use host::{host_info, HostInfo};
