//! Flat, telemetry-ready encoding of a counter snapshot.

use serde::{Deserialize, Serialize};

use super::snapshot::CounterSnapshot;
use super::time_codec::ticks_from_timestamp;
use crate::error::Result;

/// Version of the record field set below; bump when a key is added or renamed.
pub const RECORD_SCHEMA_VERSION: u32 = 1;

const MEBIBYTE: f64 = 1_048_576.0;
const MILLIS_PER_SECOND: f64 = 1000.0;

/// Wire representation of one sample.
///
/// Timestamps are ticks since 0001-01-01 UTC, byte counters are MiB and
/// disk time counters are seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    #[serde(rename = "SampleTime")]
    pub sample_time: i64,
    #[serde(rename = "Sys_BootTime")]
    pub boot_time: i64,
    #[serde(rename = "Sys_NumConnectedUsers")]
    pub num_connected_users: u64,
    #[serde(rename = "Sys_NumProcesses")]
    pub num_processes: u64,
    #[serde(rename = "Sys_CpuCount")]
    pub cpu_count: u64,
    #[serde(rename = "Sys_CpuPercentages")]
    pub cpu_percentages: String,
    #[serde(rename = "Sys_MemTotalMiB")]
    pub mem_total_mib: f64,
    #[serde(rename = "Sys_MemAvailableMiB")]
    pub mem_available_mib: f64,
    #[serde(rename = "Sys_SwapTotalMiB")]
    pub swap_total_mib: f64,
    #[serde(rename = "Sys_SwapAvailableMiB")]
    pub swap_available_mib: f64,
    #[serde(rename = "Sys_DiskTotalMiB")]
    pub disk_total_mib: f64,
    #[serde(rename = "Sys_DiskAvailableMiB")]
    pub disk_available_mib: f64,
    #[serde(rename = "Sys_DiskReadOperations")]
    pub disk_read_operations: u64,
    #[serde(rename = "Sys_DiskWriteOperations")]
    pub disk_write_operations: u64,
    #[serde(rename = "Sys_DiskReadMiB")]
    pub disk_read_mib: f64,
    #[serde(rename = "Sys_DiskWriteMiB")]
    pub disk_write_mib: f64,
    #[serde(rename = "Sys_DiskReadTimeSeconds")]
    pub disk_read_time_seconds: f64,
    #[serde(rename = "Sys_DiskWriteTimeSeconds")]
    pub disk_write_time_seconds: f64,
    #[serde(rename = "Sys_NetReadPackets")]
    pub net_read_packets: u64,
    #[serde(rename = "Sys_NetWritePackets")]
    pub net_write_packets: u64,
    #[serde(rename = "Sys_NetReadMiB")]
    pub net_read_mib: f64,
    #[serde(rename = "Sys_NetWriteMiB")]
    pub net_write_mib: f64,
    #[serde(rename = "Sys_NetReadPacketsDropped")]
    pub net_read_packets_dropped: u64,
    #[serde(rename = "Sys_NetWritePacketsDropped")]
    pub net_write_packets_dropped: u64,
    #[serde(rename = "Sys_NetReadErrors")]
    pub net_read_errors: u64,
    #[serde(rename = "Sys_NetWriteErrors")]
    pub net_write_errors: u64,
}

/// Encode a snapshot into its wire record.
///
/// Only fails if a timestamp lies outside the tick range.
pub fn encode(snapshot: &CounterSnapshot) -> Result<MetricRecord> {
    Ok(MetricRecord {
        sample_time: ticks_from_timestamp(&snapshot.sample_time, None)?,
        boot_time: ticks_from_timestamp(&snapshot.boot_time, None)?,
        num_connected_users: snapshot.num_connected_users,
        num_processes: snapshot.num_processes,
        cpu_count: snapshot.cpu_count,
        cpu_percentages: format_cpu_percentages(&snapshot.cpu_percentages),
        mem_total_mib: to_mib(snapshot.memory.total_bytes),
        mem_available_mib: to_mib(snapshot.memory.available_bytes),
        swap_total_mib: to_mib(snapshot.swap.total_bytes),
        swap_available_mib: to_mib(snapshot.swap.available_bytes),
        disk_total_mib: to_mib(snapshot.disk.total_bytes),
        disk_available_mib: to_mib(snapshot.disk.available_bytes),
        disk_read_operations: snapshot.disk_io.read_ops,
        disk_write_operations: snapshot.disk_io.write_ops,
        disk_read_mib: to_mib(snapshot.disk_io.read_bytes),
        disk_write_mib: to_mib(snapshot.disk_io.write_bytes),
        disk_read_time_seconds: to_seconds(snapshot.disk_io.read_time_ms),
        disk_write_time_seconds: to_seconds(snapshot.disk_io.write_time_ms),
        net_read_packets: snapshot.net_io.read_packets,
        net_write_packets: snapshot.net_io.write_packets,
        net_read_mib: to_mib(snapshot.net_io.read_bytes),
        net_write_mib: to_mib(snapshot.net_io.write_bytes),
        net_read_packets_dropped: snapshot.net_io.read_dropped,
        net_write_packets_dropped: snapshot.net_io.write_dropped,
        net_read_errors: snapshot.net_io.read_errors,
        net_write_errors: snapshot.net_io.write_errors,
    })
}

/// Space-separated percentages with one decimal, empty when none were read
pub fn format_cpu_percentages(percentages: &[f32]) -> String {
    percentages
        .iter()
        .map(|p| format!("{:.1}", p))
        .collect::<Vec<_>>()
        .join(" ")
}

fn to_mib(bytes: u64) -> f64 {
    bytes as f64 / MEBIBYTE
}

fn to_seconds(millis: u64) -> f64 {
    millis as f64 / MILLIS_PER_SECOND
}
