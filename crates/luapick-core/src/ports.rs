//! Port definitions (trait abstractions) for the host the resolver runs on.
//!
//! Ports define what the resolution service expects from infrastructure.
//! Implementations live in `luapick-runtime`; tests supply in-memory fakes.
//!
//! # Design Rules
//!
//! - Probing never fails: an executable that cannot be run reports zero
//!   versions and the selection policy rejects it.
//! - Filesystem enumeration is lazy and restartable; nothing is cached.

use crate::candidate::{DiscoveredCandidate, NameFilter};
use crate::version::{ApiVersion, Version};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Runs candidate interpreters to learn what they are.
#[async_trait]
pub trait InterpreterProbePort: Send + Sync {
    /// The `major.minor` from the interpreter's `_VERSION`, or `0.0`.
    async fn probe_api(&self, interpreter: &Path) -> ApiVersion;

    /// The release from the interpreter's `-v` banner, or `0.0.0`.
    async fn probe_release(&self, interpreter: &Path) -> Version;

    /// Whether the interpreter runs cleanly with `library` preloaded.
    async fn trial_preload(&self, interpreter: &Path, library: &Path) -> bool;
}

/// Read-only view of the filesystem the resolver searches.
pub trait HostFilesystemPort: Send + Sync {
    /// Executables on the search path matching `filter`, in search order.
    fn candidates(
        &self,
        filter: NameFilter,
    ) -> Box<dyn Iterator<Item = DiscoveredCandidate> + Send + '_>;

    /// Files in `dir` whose name starts with `prefix`, sorted by name.
    fn libraries(&self, dir: &Path, prefix: &str) -> Vec<PathBuf>;

    /// Confirm `path` is an executable file, returning its absolute form.
    fn check_executable(&self, path: &Path) -> Result<PathBuf, String>;
}
