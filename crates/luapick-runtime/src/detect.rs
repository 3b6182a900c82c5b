//! Host operating-system detection.

use luapick_core::OsIdentity;
use tracing::{debug, warn};

/// Identify the running host.
///
/// On Unix this reads `uname(2)`; if that fails, or on other platforms, the
/// compile-time target OS name is used with no release.
pub fn detect_os() -> OsIdentity {
    let identity = host_identity();
    debug!(os = %identity, "Detected host");
    identity
}

#[cfg(unix)]
fn host_identity() -> OsIdentity {
    match nix::sys::utsname::uname() {
        Ok(uts) => OsIdentity::from_uname(
            &uts.sysname().to_string_lossy(),
            &uts.release().to_string_lossy(),
            &uts.machine().to_string_lossy(),
        ),
        Err(e) => {
            warn!(error = %e, "uname failed, falling back to target OS name");
            fallback_identity()
        }
    }
}

#[cfg(not(unix))]
fn host_identity() -> OsIdentity {
    fallback_identity()
}

fn fallback_identity() -> OsIdentity {
    OsIdentity::from_uname(std::env::consts::OS, "", std::env::consts::ARCH)
}
