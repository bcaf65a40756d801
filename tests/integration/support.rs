// Test doubles for the counter provider and the telemetry sink

use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};
use nodestats::core::node_stats::{
    CounterProvider, DiskIoCounters, Emitter, MemoryReading, MetricRecord, NetIoCounters,
    VolumeUsage,
};
use nodestats::core::NodeIdentity;
use nodestats::{NodeStatsError, Result};

pub const MEM_TOTAL: u64 = 8_000_000_000;
pub const MEM_AVAILABLE: u64 = 2_000_000_000;

/// Provider whose cumulative counters grow with every sample taken.
///
/// Each non-baseline CPU reading starts a new sample; every other counter is
/// derived from that sample number.
pub struct MockProvider {
    pub samples: u64,
    pub baseline_resets: u64,
    pub prepared: bool,
    pub fail_disk_usage: bool,
    pub fail_net_io: bool,
    /// Panic while reading the process table on this sample number
    pub panic_on_sample: Option<u64>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            samples: 0,
            baseline_resets: 0,
            prepared: false,
            fail_disk_usage: false,
            fail_net_io: false,
            panic_on_sample: None,
        }
    }
}

impl CounterProvider for MockProvider {
    fn cpu_count(&mut self) -> u64 {
        4
    }

    fn cpu_percentages_per_core(&mut self, reset_baseline: bool) -> Vec<f32> {
        if reset_baseline {
            self.baseline_resets += 1;
            return vec![0.0; 4];
        }
        self.samples += 1;
        vec![10.0, 20.0, 30.0, 40.0]
    }

    fn boot_time(&mut self) -> Result<DateTime<Utc>> {
        Ok(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
    }

    fn swap_memory(&mut self) -> MemoryReading {
        MemoryReading {
            total_bytes: 1_073_741_824,
            available_bytes: 536_870_912,
        }
    }

    fn virtual_memory(&mut self) -> MemoryReading {
        MemoryReading {
            total_bytes: MEM_TOTAL,
            available_bytes: MEM_AVAILABLE,
        }
    }

    fn disk_usage(&mut self, path: &Path) -> Result<VolumeUsage> {
        if self.fail_disk_usage || !path.exists() {
            return Err(NodeStatsError::path_unavailable(path));
        }
        Ok(VolumeUsage {
            total_bytes: 100 * 1_048_576,
            available_bytes: 25 * 1_048_576,
        })
    }

    fn disk_io_counters(&mut self) -> Result<DiskIoCounters> {
        let n = self.samples;
        Ok(DiskIoCounters {
            read_ops: 100 * n,
            write_ops: 200 * n,
            read_bytes: 1_048_576 * n,
            write_bytes: 2 * 1_048_576 * n,
            read_time_ms: 1000 * n,
            write_time_ms: 500 * n,
        })
    }

    fn net_io_counters(&mut self) -> Result<NetIoCounters> {
        if self.fail_net_io {
            return Err(NodeStatsError::sub_reading("net_io", "interface vanished"));
        }
        let n = self.samples;
        Ok(NetIoCounters {
            read_packets: 10 * n,
            write_packets: 20 * n,
            read_bytes: 1_048_576 * n,
            write_bytes: 1_048_576 * n,
            read_dropped: n,
            write_dropped: n,
            read_errors: n,
            write_errors: n,
        })
    }

    fn connected_users(&mut self) -> Result<u64> {
        Ok(3)
    }

    fn process_count(&mut self) -> u64 {
        if self.panic_on_sample == Some(self.samples) {
            panic!("process table unreadable on sample {}", self.samples);
        }
        self.samples
    }

    fn prepare(&mut self) {
        self.prepared = true;
    }
}

/// Emitter that keeps everything it is given
#[derive(Default)]
pub struct RecordingEmitter {
    pub metrics: Vec<(String, f64)>,
    pub records: Vec<MetricRecord>,
    pub registered: Vec<NodeIdentity>,
    pub unregistered: Vec<NodeIdentity>,
    pub fail_emits: bool,
}

impl Emitter for RecordingEmitter {
    fn emit(&mut self, metric_name: &str, value: f64) -> Result<()> {
        if self.fail_emits {
            return Err(NodeStatsError::transport("sink offline"));
        }
        self.metrics.push((metric_name.to_string(), value));
        Ok(())
    }

    fn emit_record(&mut self, record: &MetricRecord) -> Result<()> {
        if self.fail_emits {
            return Err(NodeStatsError::transport("sink offline"));
        }
        self.records.push(record.clone());
        Ok(())
    }

    fn register_node(&mut self, identity: &NodeIdentity) -> Result<()> {
        self.registered.push(identity.clone());
        Ok(())
    }

    fn unregister_node(&mut self, identity: &NodeIdentity) -> Result<()> {
        self.unregistered.push(identity.clone());
        Ok(())
    }
}
