//! Threading-library preload policy.
//!
//! Some hosts ship POSIX threads as a separate shared object that a Lua
//! interpreter built without `-lpthread` cannot load later (for example from a
//! C module). The fix is to preload it via `LD_PRELOAD`. Whether that is
//! needed, where to look for the library and whether failure is fatal depends
//! on the OS family; that table lives here.

use crate::platform::{OsFamily, OsIdentity};
use crate::version::Version;
use serde::Serialize;
use std::path::PathBuf;

/// Soname tried first on Linux, resolved by the dynamic linker's own search.
pub const PTHREAD_SONAME: &str = "libpthread.so.0";

/// File name prefix of threading libraries listed from library directories.
pub const PTHREAD_PREFIX: &str = "libpthread.so";

/// Text the trial program must print, and nothing else, for a preload to count.
pub const PRELOAD_SENTINEL: &str = "luapick-preload-ok";

/// First SunOS release with threads folded into libc (Solaris 10).
pub const SUNOS_INTEGRATED_RELEASE: Version = Version::saturating(5, 10, 0);

/// Where to look for a threading library on a given host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibrarySearch {
    /// Names handed to the loader as-is, tried before any directory listing.
    pub bare_names: Vec<String>,
    /// Directories listed for files starting with [`PTHREAD_PREFIX`].
    pub dirs: Vec<PathBuf>,
    /// When false, finding nothing is only worth a warning.
    pub required: bool,
}

/// What the advisor has to do for a host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreloadPlan {
    NotNeeded { reason: String },
    Search(LibrarySearch),
}

/// Outcome of the preload advice for one resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "library", rename_all = "snake_case")]
pub enum PreloadDecision {
    NotNeeded,
    Preload(PathBuf),
    Unavailable { reason: String },
}

impl PreloadDecision {
    pub fn library(&self) -> Option<&PathBuf> {
        match self {
            Self::Preload(library) => Some(library),
            Self::NotNeeded | Self::Unavailable { .. } => None,
        }
    }
}

/// Library directories searched on Linux for `arch`.
pub fn linux_library_dirs(arch: &str) -> Vec<PathBuf> {
    let multiarch = match arch {
        "x86" | "i386" | "i486" | "i586" | "i686" => "i386-linux-gnu".to_string(),
        "arm" | "armv7l" | "armv7" => "arm-linux-gnueabihf".to_string(),
        other => format!("{other}-linux-gnu"),
    };
    vec![
        PathBuf::from(format!("/lib/{multiarch}")),
        PathBuf::from(format!("/usr/lib/{multiarch}")),
        PathBuf::from("/lib64"),
        PathBuf::from("/usr/lib64"),
        PathBuf::from("/lib"),
        PathBuf::from("/usr/lib"),
    ]
}

fn bsd_search(required: bool) -> LibrarySearch {
    LibrarySearch {
        bare_names: Vec::new(),
        dirs: vec![PathBuf::from("/usr/lib")],
        required,
    }
}

/// Decide how to obtain threading support on `os`.
pub fn preload_plan(os: &OsIdentity) -> PreloadPlan {
    match &os.family {
        OsFamily::Linux => PreloadPlan::Search(LibrarySearch {
            bare_names: vec![PTHREAD_SONAME.to_string()],
            dirs: linux_library_dirs(&os.arch),
            required: true,
        }),
        OsFamily::Bsd(_) => PreloadPlan::Search(bsd_search(true)),
        OsFamily::BsdLike(_) => PreloadPlan::Search(bsd_search(false)),
        OsFamily::IntegratedThreads(name) => PreloadPlan::NotNeeded {
            reason: format!("{name} provides threads in its C library"),
        },
        OsFamily::SunOs => match os.release {
            Some(release) if release >= SUNOS_INTEGRATED_RELEASE => PreloadPlan::NotNeeded {
                reason: format!("SunOS {release} provides threads in libc"),
            },
            _ => PreloadPlan::Search(bsd_search(false)),
        },
        OsFamily::Unknown(name) => PreloadPlan::NotNeeded {
            reason: format!("no threading policy known for {name}"),
        },
    }
}
