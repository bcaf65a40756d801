//! Parsers for the Linux procfs counter files.
//!
//! The parsers take file contents so they can be exercised on any platform;
//! only the readers touch `/proc`.

use crate::core::node_stats::{DiskIoCounters, NetIoCounters};

const SECTOR_SIZE: u64 = 512;

/// Sum `/proc/diskstats` over the devices accepted by `include`.
///
/// Lines that are too short or carry non-numeric counters are skipped.
pub fn parse_diskstats<F: Fn(&str) -> bool>(content: &str, include: F) -> DiskIoCounters {
    let mut totals = DiskIoCounters::default();

    for line in content.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 11 || !include(fields[2]) {
            continue;
        }

        let parsed: Option<Vec<u64>> = fields[3..11].iter().map(|f| f.parse().ok()).collect();
        let Some(counters) = parsed else {
            continue;
        };

        // reads, reads merged, sectors read, ms reading, writes, writes merged, sectors written, ms writing
        totals.read_ops = totals.read_ops.saturating_add(counters[0]);
        totals.read_bytes = totals.read_bytes.saturating_add(counters[2].saturating_mul(SECTOR_SIZE));
        totals.read_time_ms = totals.read_time_ms.saturating_add(counters[3]);
        totals.write_ops = totals.write_ops.saturating_add(counters[4]);
        totals.write_bytes = totals.write_bytes.saturating_add(counters[6].saturating_mul(SECTOR_SIZE));
        totals.write_time_ms = totals.write_time_ms.saturating_add(counters[7]);
    }

    totals
}

/// Sum `/proc/net/dev` over every interface.
pub fn parse_net_dev(content: &str) -> NetIoCounters {
    let mut totals = NetIoCounters::default();

    for line in content.lines() {
        let Some((_iface, rest)) = line.split_once(':') else {
            continue;
        };

        let parsed: Option<Vec<u64>> = rest.split_whitespace().map(|f| f.parse().ok()).collect();
        let Some(counters) = parsed else {
            continue;
        };
        if counters.len() < 12 {
            continue;
        }

        totals.read_bytes = totals.read_bytes.saturating_add(counters[0]);
        totals.read_packets = totals.read_packets.saturating_add(counters[1]);
        totals.read_errors = totals.read_errors.saturating_add(counters[2]);
        totals.read_dropped = totals.read_dropped.saturating_add(counters[3]);
        totals.write_bytes = totals.write_bytes.saturating_add(counters[8]);
        totals.write_packets = totals.write_packets.saturating_add(counters[9]);
        totals.write_errors = totals.write_errors.saturating_add(counters[10]);
        totals.write_dropped = totals.write_dropped.saturating_add(counters[11]);
    }

    totals
}

#[cfg(target_os = "linux")]
pub fn read_disk_io() -> crate::error::Result<DiskIoCounters> {
    use std::path::Path;

    let content = std::fs::read_to_string("/proc/diskstats")?;
    // whole disks only, partitions would double count
    Ok(parse_diskstats(&content, |name| {
        Path::new("/sys/block").join(name.replace('/', "!")).exists()
    }))
}

#[cfg(target_os = "linux")]
pub fn read_net_io() -> crate::error::Result<NetIoCounters> {
    let content = std::fs::read_to_string("/proc/net/dev")?;
    Ok(parse_net_dev(&content))
}
