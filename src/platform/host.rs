use serde::Serialize;
use sysinfo::System;

/// Description of the host, logged once at startup
#[derive(Debug, Clone, Serialize)]
pub struct HostInfo {
    pub os: String,
    pub kernel_version: String,
    pub host_name: String,
    pub architecture: String,
}

pub fn host_info() -> HostInfo {
    HostInfo {
        os: System::long_os_version().unwrap_or_else(|| "Unknown".to_string()),
        kernel_version: System::kernel_version().unwrap_or_else(|| "Unknown".to_string()),
        host_name: System::host_name().unwrap_or_else(|| "Unknown".to_string()),
        architecture: std::env::consts::ARCH.to_string(),
    }
}

impl std::fmt::Display for HostInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (kernel {}) on {} [{}]",
            self.os, self.kernel_version, self.host_name, self.architecture
        )
    }
}
