//! Non-writable working directory for probe subprocesses.
//!
//! Probed interpreters run with this directory as their working directory so
//! that nothing they do on startup can leave files behind. It is created on
//! first use and removed when dropped.

use std::io;
use std::path::Path;
use std::sync::OnceLock;
use tempfile::TempDir;
use tracing::{debug, warn};

/// A lazily created, read-only temporary directory.
#[derive(Debug, Default)]
pub struct ScratchDir {
    dir: OnceLock<Result<TempDir, String>>,
}

impl ScratchDir {
    pub fn new() -> Self {
        Self::default()
    }

    /// The directory path, creating it on first call.
    pub fn path(&self) -> Result<&Path, String> {
        self.dir
            .get_or_init(|| {
                create_read_only().map_err(|e| {
                    warn!(error = %e, "Failed to create probe scratch directory");
                    e.to_string()
                })
            })
            .as_ref()
            .map(TempDir::path)
            .map_err(Clone::clone)
    }
}

fn create_read_only() -> io::Result<TempDir> {
    let dir = tempfile::Builder::new().prefix("luapick-probe-").tempdir()?;
    set_writable(dir.path(), false)?;
    debug!(path = %dir.path().display(), "Created probe scratch directory");
    Ok(dir)
}

#[cfg(unix)]
fn set_writable(path: &Path, writable: bool) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mode = if writable { 0o700 } else { 0o555 };
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_writable(path: &Path, writable: bool) -> io::Result<()> {
    let mut perms = std::fs::metadata(path)?.permissions();
    perms.set_readonly(!writable);
    std::fs::set_permissions(path, perms)
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        // TempDir removes the tree after this; give it back write access first.
        if let Some(Ok(dir)) = self.dir.get() {
            if let Err(e) = set_writable(dir.path(), true) {
                warn!(
                    path = %dir.path().display(),
                    error = %e,
                    "Failed to restore scratch directory permissions"
                );
            }
        }
    }
}
