//! Host operating-system identity, classified by how it ships POSIX threads.
//!
//! Detection (reading `uname`) lives in the runtime crate; this module only
//! turns a system name and release string into an [`OsFamily`].

use crate::version::Version;
use serde::Serialize;
use std::fmt;

/// BSD variants whose dynamic loader cannot pull in `libpthread` late.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BsdFlavor {
    FreeBsd,
    NetBsd,
    OpenBsd,
}

/// How the host provides threading to dynamically linked programs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "family", content = "name", rename_all = "snake_case")]
pub enum OsFamily {
    /// glibc or musl Linux; `libpthread` may be a separate object.
    Linux,
    /// A BSD with a separate `libpthread` that must be named by full path.
    Bsd(BsdFlavor),
    /// Some other BSD descendant, not fully characterized.
    BsdLike(String),
    /// Threads live in the base C library (Darwin, Windows, Haiku).
    IntegratedThreads(String),
    /// SunOS/Solaris/illumos; threads merged into libc as of release 5.10.
    SunOs,
    /// Nothing known about this system.
    Unknown(String),
}

impl OsFamily {
    /// Classify a `uname -s` style system name.
    pub fn from_sysname(sysname: &str) -> Self {
        let name = sysname.trim();
        let lower = name.to_ascii_lowercase();
        match lower.as_str() {
            "linux" => Self::Linux,
            "freebsd" => Self::Bsd(BsdFlavor::FreeBsd),
            "netbsd" => Self::Bsd(BsdFlavor::NetBsd),
            "openbsd" => Self::Bsd(BsdFlavor::OpenBsd),
            "sunos" | "solaris" | "illumos" => Self::SunOs,
            "darwin" | "macos" | "haiku" | "windows" => Self::IntegratedThreads(name.to_string()),
            _ if lower.starts_with("windows")
                || lower.starts_with("mingw")
                || lower.starts_with("msys")
                || lower.starts_with("cygwin") =>
            {
                Self::IntegratedThreads(name.to_string())
            }
            _ if lower.ends_with("bsd") || lower == "dragonfly" => Self::BsdLike(name.to_string()),
            _ => Self::Unknown(name.to_string()),
        }
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linux => f.write_str("Linux"),
            Self::Bsd(BsdFlavor::FreeBsd) => f.write_str("FreeBSD"),
            Self::Bsd(BsdFlavor::NetBsd) => f.write_str("NetBSD"),
            Self::Bsd(BsdFlavor::OpenBsd) => f.write_str("OpenBSD"),
            Self::SunOs => f.write_str("SunOS"),
            Self::BsdLike(name) | Self::IntegratedThreads(name) | Self::Unknown(name) => {
                f.write_str(name)
            }
        }
    }
}

/// The host as seen by the preload advisor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OsIdentity {
    pub family: OsFamily,
    /// Kernel/OS release, when it could be read.
    pub release: Option<Version>,
    /// Machine architecture, e.g. `x86_64`.
    pub arch: String,
}

impl OsIdentity {
    /// Build from `uname` fields.
    ///
    /// The release keeps only its leading dotted number, so `5.15.0-91-generic`
    /// reads as `5.15.0`.
    pub fn from_uname(sysname: &str, release: &str, arch: &str) -> Self {
        Self {
            family: OsFamily::from_sysname(sysname),
            release: leading_version(release),
            arch: arch.to_string(),
        }
    }
}

impl fmt::Display for OsIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.release {
            Some(release) => write!(f, "{} {} ({})", self.family, release, self.arch),
            None => write!(f, "{} ({})", self.family, self.arch),
        }
    }
}

fn leading_version(text: &str) -> Option<Version> {
    let text = text.trim();
    let end = text
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(text.len());
    let token = text[..end].trim_end_matches('.');
    // Keep at most three components; Version rejects more.
    let token = token.splitn(4, '.').take(3).collect::<Vec<_>>().join(".");
    Version::parse_saturating(&token).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_sysnames() {
        assert_eq!(OsFamily::from_sysname("Linux"), OsFamily::Linux);
        assert_eq!(
            OsFamily::from_sysname("OpenBSD"),
            OsFamily::Bsd(BsdFlavor::OpenBsd)
        );
        assert_eq!(OsFamily::from_sysname("SunOS"), OsFamily::SunOs);
        assert!(matches!(
            OsFamily::from_sysname("Darwin"),
            OsFamily::IntegratedThreads(_)
        ));
        assert!(matches!(
            OsFamily::from_sysname("CYGWIN_NT-10.0"),
            OsFamily::IntegratedThreads(_)
        ));
    }

    #[test]
    fn test_bsd_like_fallback() {
        assert_eq!(
            OsFamily::from_sysname("MidnightBSD"),
            OsFamily::BsdLike("MidnightBSD".to_string())
        );
        assert_eq!(
            OsFamily::from_sysname("DragonFly"),
            OsFamily::BsdLike("DragonFly".to_string())
        );
    }

    #[test]
    fn test_unknown_sysname() {
        assert_eq!(
            OsFamily::from_sysname("Plan9"),
            OsFamily::Unknown("Plan9".to_string())
        );
    }

    #[test]
    fn test_release_parsing() {
        let os = OsIdentity::from_uname("Linux", "5.15.0-91-generic", "x86_64");
        assert_eq!(os.release, Some(Version::new(5, 15, 0).unwrap()));

        let os = OsIdentity::from_uname("SunOS", "5.11", "i86pc");
        assert_eq!(os.release, Some(Version::new(5, 11, 0).unwrap()));

        let os = OsIdentity::from_uname("FreeBSD", "13.2.0.1-RELEASE", "amd64");
        assert_eq!(os.release, Some(Version::new(13, 2, 0).unwrap()));

        let os = OsIdentity::from_uname("Plan9", "", "386");
        assert_eq!(os.release, None);
    }
}
