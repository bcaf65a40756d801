use std::path::Path;

use chrono::{DateTime, Utc};

use super::snapshot::{DiskIoCounters, MemoryReading, NetIoCounters, VolumeUsage};
use crate::error::Result;

/// Trait for OS counter sources
///
/// Implementations live in the platform layer. Methods take `&mut self`
/// because most sources refresh cached state before answering.
pub trait CounterProvider: Send {
    /// Number of logical CPUs
    fn cpu_count(&mut self) -> u64;

    /// Utilization per logical CPU since the previous call.
    ///
    /// With `reset_baseline` the call only establishes the measurement
    /// interval and callers discard the result.
    fn cpu_percentages_per_core(&mut self, reset_baseline: bool) -> Vec<f32>;

    fn boot_time(&mut self) -> Result<DateTime<Utc>>;

    fn swap_memory(&mut self) -> MemoryReading;

    fn virtual_memory(&mut self) -> MemoryReading;

    /// Usage of the volume holding `path`; `PathUnavailable` if it doesn't exist.
    fn disk_usage(&mut self, path: &Path) -> Result<VolumeUsage>;

    fn disk_io_counters(&mut self) -> Result<DiskIoCounters>;

    fn net_io_counters(&mut self) -> Result<NetIoCounters>;

    /// Number of logged-in user sessions
    fn connected_users(&mut self) -> Result<u64>;

    fn process_count(&mut self) -> u64;

    /// One-time platform preparation before the first sample
    fn prepare(&mut self) {}
}
