use anyhow::Result;

use crate::platform::host_info;

pub fn execute() -> Result<()> {
    println!("nodestats version {}", env!("CARGO_PKG_VERSION"));
    println!("host: {}", host_info());
    Ok(())
}
