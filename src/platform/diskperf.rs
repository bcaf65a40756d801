//! Disk performance counter enablement.

/// Turn on the OS disk performance counters where they are opt-in.
///
/// Returns whether disk counters are expected to be available.
#[cfg(windows)]
pub fn enable_disk_counters() -> bool {
    use std::process::Command;

    match Command::new("cmd").args(["/C", "diskperf -y"]).status() {
        Ok(status) if status.success() => true,
        Ok(status) => {
            log::error!("diskperf -y exited with {}", status);
            false
        }
        Err(e) => {
            log::error!("failed to run diskperf -y: {}", e);
            false
        }
    }
}

#[cfg(not(windows))]
pub fn enable_disk_counters() -> bool {
    true
}
