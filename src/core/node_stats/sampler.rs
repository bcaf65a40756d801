use std::path::PathBuf;

use chrono::Utc;
use log::{debug, warn};

use super::provider::CounterProvider;
use super::record::{self, MetricRecord};
use super::snapshot::{CounterSnapshot, SubReading};
use crate::error::Result;

/// Produces one snapshot per call from a counter provider.
pub struct Sampler<P: CounterProvider> {
    provider: P,
    monitored_volume: PathBuf,
}

impl<P: CounterProvider> Sampler<P> {
    pub fn new<V: Into<PathBuf>>(provider: P, monitored_volume: V) -> Self {
        Self {
            provider,
            monitored_volume: monitored_volume.into(),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Prepare the provider and take the throwaway CPU baseline reading.
    pub fn warm_up(&mut self) {
        self.provider.prepare();
        let _ = self.provider.cpu_percentages_per_core(true);
        debug!("counter provider warmed up");
    }

    /// Read every counter once.
    ///
    /// Never fails: a sub-reading that errors is left at its default, logged
    /// and listed in `CounterSnapshot::degraded`.
    pub fn sample(&mut self) -> CounterSnapshot {
        let mut snapshot = CounterSnapshot::new(Utc::now());
        let mut degraded = Vec::new();

        snapshot.cpu_count = self.provider.cpu_count();
        snapshot.boot_time = recover(self.provider.boot_time(), SubReading::BootTime, &mut degraded);
        snapshot.cpu_percentages = self.provider.cpu_percentages_per_core(false);
        snapshot.swap = self.provider.swap_memory();
        snapshot.disk = recover(
            self.provider.disk_usage(&self.monitored_volume),
            SubReading::DiskUsage,
            &mut degraded,
        );
        snapshot.num_connected_users = recover(
            self.provider.connected_users(),
            SubReading::ConnectedUsers,
            &mut degraded,
        );
        snapshot.num_processes = self.provider.process_count();
        snapshot.memory = self.provider.virtual_memory();
        snapshot.disk_io = recover(
            self.provider.disk_io_counters(),
            SubReading::DiskIo,
            &mut degraded,
        );
        snapshot.net_io = recover(
            self.provider.net_io_counters(),
            SubReading::NetIo,
            &mut degraded,
        );

        snapshot.degraded = degraded;
        snapshot
    }

    /// Encode a snapshot taken by this sampler
    pub fn encode(&self, snapshot: &CounterSnapshot) -> Result<MetricRecord> {
        record::encode(snapshot)
    }
}

fn recover<T: Default>(result: Result<T>, reading: SubReading, degraded: &mut Vec<SubReading>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            warn!("could not read {}: {}", reading, e);
            degraded.push(reading);
            T::default()
        }
    }
}
