//! sysinfo-backed counter provider.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::debug;
#[cfg(not(target_os = "linux"))]
use sysinfo::Networks;
use sysinfo::{
    CpuRefreshKind, Disks, MemoryRefreshKind, ProcessRefreshKind, ProcessesToUpdate, RefreshKind,
    System,
};

use super::{diskperf, users};
use crate::core::node_stats::{
    CounterProvider, DiskIoCounters, MemoryReading, NetIoCounters, VolumeUsage,
};
use crate::error::{NodeStatsError, Result};

/// Reads node counters through sysinfo, with procfs for cumulative I/O on Linux
pub struct SysinfoProvider {
    system: System,
    disks: Disks,
    #[cfg(not(target_os = "linux"))]
    networks: Networks,
    disk_counters_enabled: bool,
}

impl SysinfoProvider {
    pub fn new() -> Self {
        let refresh_kind = RefreshKind::nothing()
            .with_cpu(CpuRefreshKind::nothing().with_cpu_usage())
            .with_memory(MemoryRefreshKind::everything());

        Self {
            system: System::new_with_specifics(refresh_kind),
            disks: Disks::new_with_refreshed_list(),
            #[cfg(not(target_os = "linux"))]
            networks: Networks::new_with_refreshed_list(),
            disk_counters_enabled: true,
        }
    }
}

impl Default for SysinfoProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl CounterProvider for SysinfoProvider {
    fn cpu_count(&mut self) -> u64 {
        self.system.cpus().len() as u64
    }

    fn cpu_percentages_per_core(&mut self, _reset_baseline: bool) -> Vec<f32> {
        self.system.refresh_cpu_usage();
        self.system.cpus().iter().map(|cpu| cpu.cpu_usage()).collect()
    }

    fn boot_time(&mut self) -> Result<DateTime<Utc>> {
        let secs = System::boot_time();
        if secs == 0 {
            return Err(NodeStatsError::sub_reading("boot_time", "boot time not reported"));
        }

        DateTime::<Utc>::from_timestamp(secs as i64, 0)
            .ok_or_else(|| NodeStatsError::sub_reading("boot_time", format!("invalid boot time {}", secs)))
    }

    fn swap_memory(&mut self) -> MemoryReading {
        self.system.refresh_memory();
        MemoryReading {
            total_bytes: self.system.total_swap(),
            available_bytes: self.system.free_swap(),
        }
    }

    fn virtual_memory(&mut self) -> MemoryReading {
        self.system.refresh_memory();
        MemoryReading {
            total_bytes: self.system.total_memory(),
            available_bytes: self.system.available_memory(),
        }
    }

    fn disk_usage(&mut self, path: &Path) -> Result<VolumeUsage> {
        if !path.exists() {
            return Err(NodeStatsError::path_unavailable(path));
        }

        let resolved = path
            .canonicalize()
            .map(strip_verbatim_prefix)
            .unwrap_or_else(|_| path.to_path_buf());
        self.disks.refresh(true);

        let index = longest_mount_match(&resolved, self.disks.iter().map(|disk| disk.mount_point()))
            .ok_or_else(|| NodeStatsError::path_unavailable(path))?;
        let disk = &self.disks.list()[index];

        Ok(VolumeUsage {
            total_bytes: disk.total_space(),
            available_bytes: disk.available_space(),
        })
    }

    #[cfg(target_os = "linux")]
    fn disk_io_counters(&mut self) -> Result<DiskIoCounters> {
        super::procfs::read_disk_io()
    }

    #[cfg(not(target_os = "linux"))]
    fn disk_io_counters(&mut self) -> Result<DiskIoCounters> {
        if !self.disk_counters_enabled {
            return Err(NodeStatsError::sub_reading("disk_io", "disk counters are disabled"));
        }

        // sysinfo only tracks bytes; operation counts and times stay zero
        self.disks.refresh(true);
        Ok(self.disks.iter().fold(DiskIoCounters::default(), |mut totals, disk| {
            let usage = disk.usage();
            totals.read_bytes = totals.read_bytes.saturating_add(usage.total_read_bytes);
            totals.write_bytes = totals.write_bytes.saturating_add(usage.total_written_bytes);
            totals
        }))
    }

    #[cfg(target_os = "linux")]
    fn net_io_counters(&mut self) -> Result<NetIoCounters> {
        super::procfs::read_net_io()
    }

    #[cfg(not(target_os = "linux"))]
    fn net_io_counters(&mut self) -> Result<NetIoCounters> {
        // sysinfo doesn't provide drops
        self.networks.refresh(true);
        Ok(self.networks.values().fold(NetIoCounters::default(), |mut totals, data| {
            totals.read_packets = totals.read_packets.saturating_add(data.total_packets_received());
            totals.write_packets = totals.write_packets.saturating_add(data.total_packets_transmitted());
            totals.read_bytes = totals.read_bytes.saturating_add(data.total_received());
            totals.write_bytes = totals.write_bytes.saturating_add(data.total_transmitted());
            totals.read_errors = totals.read_errors.saturating_add(data.total_errors_on_received());
            totals.write_errors = totals.write_errors.saturating_add(data.total_errors_on_transmitted());
            totals
        }))
    }

    fn connected_users(&mut self) -> Result<u64> {
        users::connected_users()
    }

    fn process_count(&mut self) -> u64 {
        self.system.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing(),
        );
        self.system.processes().len() as u64
    }

    fn prepare(&mut self) {
        self.disk_counters_enabled = diskperf::enable_disk_counters();
        debug!("counters: enable_disk_perf={}", self.disk_counters_enabled);
    }
}

/// Drop the `\\?\` prefix Windows adds on canonicalize so the path compares
/// against plain drive mount points like `C:\`.
pub fn strip_verbatim_prefix(path: PathBuf) -> PathBuf {
    if let Some(clean) = path.to_str().and_then(|s| s.strip_prefix(r"\\?\")) {
        // UNC shares keep their prefix
        if !clean.starts_with(r"UNC\") {
            return PathBuf::from(clean);
        }
    }
    path
}

/// Index of the mount point that is the longest prefix of `path`
pub fn longest_mount_match<'a, I>(path: &Path, mount_points: I) -> Option<usize>
where
    I: IntoIterator<Item = &'a Path>,
{
    mount_points
        .into_iter()
        .enumerate()
        .filter(|(_, mount)| path.starts_with(mount))
        .max_by_key(|(_, mount)| mount.components().count())
        .map(|(index, _)| index)
}
