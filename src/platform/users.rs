//! Logged-in user sessions.

use crate::error::Result;

/// Count `USER_PROCESS` entries in the utmpx database
#[cfg(any(all(target_os = "linux", target_env = "gnu"), target_os = "macos"))]
pub fn connected_users() -> Result<u64> {
    let mut count = 0;

    // utmpx iteration is not reentrant; callers sample from one task at a time
    unsafe {
        libc::setutxent();
        loop {
            let entry = libc::getutxent();
            if entry.is_null() {
                break;
            }
            if (*entry).ut_type == libc::USER_PROCESS {
                count += 1;
            }
        }
        libc::endutxent();
    }

    Ok(count)
}

#[cfg(not(any(all(target_os = "linux", target_env = "gnu"), target_os = "macos")))]
pub fn connected_users() -> Result<u64> {
    Err(crate::error::NodeStatsError::sub_reading(
        "connected_users",
        "session accounting is not supported on this platform",
    ))
}
