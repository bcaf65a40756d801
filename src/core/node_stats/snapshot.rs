use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One point-in-time reading of the node's counters.
///
/// Built fresh by the sampler on every cycle and discarded after encoding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CounterSnapshot {
    pub sample_time: DateTime<Utc>,
    pub boot_time: DateTime<Utc>,
    pub num_connected_users: u64,
    pub num_processes: u64,
    pub cpu_count: u64,
    /// Per logical CPU, in provider order
    pub cpu_percentages: Vec<f32>,
    pub memory: MemoryReading,
    pub swap: MemoryReading,
    /// Usage of the monitored volume
    pub disk: VolumeUsage,
    pub disk_io: DiskIoCounters,
    pub net_io: NetIoCounters,
    /// Sub-readings that failed and were left at their defaults
    pub degraded: Vec<SubReading>,
}

impl CounterSnapshot {
    pub fn new(sample_time: DateTime<Utc>) -> Self {
        Self {
            sample_time,
            ..Default::default()
        }
    }

    pub fn is_degraded(&self, reading: SubReading) -> bool {
        self.degraded.contains(&reading)
    }
}

/// Total and available bytes of physical memory or swap
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryReading {
    pub total_bytes: u64,
    pub available_bytes: u64,
}

impl MemoryReading {
    pub fn used_bytes(&self) -> u64 {
        self.total_bytes.saturating_sub(self.available_bytes)
    }
}

/// Total and available bytes of a mounted volume
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeUsage {
    pub total_bytes: u64,
    pub available_bytes: u64,
}

/// Cumulative disk I/O counters since boot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskIoCounters {
    pub read_ops: u64,
    pub write_ops: u64,
    pub read_bytes: u64,
    pub write_bytes: u64,
    pub read_time_ms: u64,
    pub write_time_ms: u64,
}

/// Cumulative network I/O counters since boot, summed over all interfaces
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetIoCounters {
    pub read_packets: u64,
    pub write_packets: u64,
    pub read_bytes: u64,
    pub write_bytes: u64,
    pub read_dropped: u64,
    pub write_dropped: u64,
    pub read_errors: u64,
    pub write_errors: u64,
}

/// Individually fallible parts of a sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubReading {
    BootTime,
    ConnectedUsers,
    DiskUsage,
    DiskIo,
    NetIo,
}

impl SubReading {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubReading::BootTime => "boot_time",
            SubReading::ConnectedUsers => "connected_users",
            SubReading::DiskUsage => "disk_usage",
            SubReading::DiskIo => "disk_io",
            SubReading::NetIo => "net_io",
        }
    }
}

impl std::fmt::Display for SubReading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
