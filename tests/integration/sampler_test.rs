// Integration tests for one sampling pass: provider -> snapshot -> record

use nodestats::core::node_stats::{Sampler, SubReading};
use tempfile::TempDir;

use super::support::{MockProvider, MEM_AVAILABLE, MEM_TOTAL};

#[test]
fn test_warm_up_takes_baseline_reading() {
    let volume = TempDir::new().unwrap();
    let mut sampler = Sampler::new(MockProvider::new(), volume.path());

    sampler.warm_up();

    assert!(sampler.provider().prepared);
    assert_eq!(sampler.provider().baseline_resets, 1);
    assert_eq!(sampler.provider().samples, 0, "baseline must not count as a sample");
}

#[test]
fn test_full_sample_has_no_defaulted_fields() {
    let volume = TempDir::new().unwrap();
    let mut sampler = Sampler::new(MockProvider::new(), volume.path());

    let snapshot = sampler.sample();
    assert!(snapshot.degraded.is_empty());

    let record = sampler.encode(&snapshot).unwrap();
    assert!(record.sample_time > record.boot_time);
    assert_eq!(record.num_connected_users, 3);
    assert_eq!(record.num_processes, 1);
    assert_eq!(record.cpu_count, 4);
    assert_eq!(record.cpu_percentages, "10.0 20.0 30.0 40.0");
    assert_eq!(record.mem_total_mib, MEM_TOTAL as f64 / 1_048_576.0);
    assert_eq!(record.mem_available_mib, MEM_AVAILABLE as f64 / 1_048_576.0);
    assert_eq!(record.swap_total_mib, 1024.0);
    assert_eq!(record.swap_available_mib, 512.0);
    assert_eq!(record.disk_total_mib, 100.0);
    assert_eq!(record.disk_available_mib, 25.0);
    assert_eq!(record.disk_read_operations, 100);
    assert_eq!(record.disk_write_operations, 200);
    assert_eq!(record.disk_read_mib, 1.0);
    assert_eq!(record.disk_write_mib, 2.0);
    assert_eq!(record.disk_read_time_seconds, 1.0);
    assert_eq!(record.disk_write_time_seconds, 0.5);
    assert_eq!(record.net_read_packets, 10);
    assert_eq!(record.net_write_packets, 20);
    assert_eq!(record.net_read_mib, 1.0);
    assert_eq!(record.net_write_mib, 1.0);
    assert_eq!(record.net_read_packets_dropped, 1);
    assert_eq!(record.net_write_packets_dropped, 1);
    assert_eq!(record.net_read_errors, 1);
    assert_eq!(record.net_write_errors, 1);
}

#[test]
fn test_missing_volume_only_degrades_disk_usage() {
    let dir = TempDir::new().unwrap();
    let healthy_volume = dir.path().to_path_buf();
    let missing_volume = dir.path().join("not-mounted");

    let mut healthy = Sampler::new(MockProvider::new(), &healthy_volume);
    let mut degraded = Sampler::new(MockProvider::new(), &missing_volume);

    let healthy_snapshot = healthy.sample();
    let good = healthy.encode(&healthy_snapshot).unwrap();
    let snapshot = degraded.sample();
    let bad = degraded.encode(&snapshot).unwrap();

    assert_eq!(snapshot.degraded, vec![SubReading::DiskUsage]);
    assert!(snapshot.is_degraded(SubReading::DiskUsage));

    assert_eq!(bad.disk_total_mib, 0.0);
    assert_eq!(bad.disk_available_mib, 0.0);

    // Everything else matches the healthy sample
    assert_eq!(bad.mem_total_mib, good.mem_total_mib);
    assert_eq!(bad.swap_total_mib, good.swap_total_mib);
    assert_eq!(bad.disk_read_operations, good.disk_read_operations);
    assert_eq!(bad.net_read_packets, good.net_read_packets);
    assert_eq!(bad.cpu_percentages, good.cpu_percentages);
    assert_eq!(bad.num_connected_users, good.num_connected_users);
}

#[test]
fn test_disk_usage_failure_on_mounted_volume() {
    let volume = TempDir::new().unwrap();
    let mut provider = MockProvider::new();
    provider.fail_disk_usage = true;
    let mut sampler = Sampler::new(provider, volume.path());

    let snapshot = sampler.sample();
    assert_eq!(snapshot.degraded, vec![SubReading::DiskUsage]);

    let record = sampler.encode(&snapshot).unwrap();
    assert_eq!(record.disk_total_mib, 0.0);
    assert_eq!(record.disk_read_operations, 100);
    assert_eq!(record.net_read_packets, 10);
}

#[test]
fn test_net_failure_is_isolated() {
    let volume = TempDir::new().unwrap();
    let mut provider = MockProvider::new();
    provider.fail_net_io = true;
    let mut sampler = Sampler::new(provider, volume.path());

    let snapshot = sampler.sample();
    assert_eq!(snapshot.degraded, vec![SubReading::NetIo]);

    let record = sampler.encode(&snapshot).unwrap();
    assert_eq!(record.net_read_packets, 0);
    assert_eq!(record.net_write_errors, 0);
    assert_eq!(record.disk_total_mib, 100.0);
    assert_eq!(record.disk_read_operations, 100);
}

#[test]
fn test_encode_is_deterministic() {
    let volume = TempDir::new().unwrap();
    let mut sampler = Sampler::new(MockProvider::new(), volume.path());

    let snapshot = sampler.sample();
    assert_eq!(
        sampler.encode(&snapshot).unwrap(),
        sampler.encode(&snapshot).unwrap()
    );
}

#[test]
fn test_counters_track_each_sample() {
    let volume = TempDir::new().unwrap();
    let mut sampler = Sampler::new(MockProvider::new(), volume.path());

    let first = sampler.sample();
    let second = sampler.sample();

    assert!(second.sample_time >= first.sample_time);
    assert_eq!(first.disk_io.read_ops, 100);
    assert_eq!(second.disk_io.read_ops, 200);
    assert_eq!(second.net_io.read_packets, 20);
}
