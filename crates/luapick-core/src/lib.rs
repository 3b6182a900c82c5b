//! Core domain for luapick: versions, ranges, candidate naming rules, the
//! selection policy, the threading preload table and the resolution service.
//!
//! Nothing in this crate touches the filesystem or spawns processes; those
//! concerns sit behind the traits in [`ports`] and are implemented by
//! `luapick-runtime`.

pub mod candidate;
pub mod constraints;
pub mod error;
pub mod platform;
pub mod ports;
pub mod preload;
pub mod range;
pub mod selection;
pub mod services;
pub mod version;

// Re-export commonly used types for convenience
pub use candidate::{Candidate, DiscoveredCandidate, Family, NameFilter, NamePattern, family_of};
pub use constraints::Constraints;
pub use error::{ResolveError, ResolveResult};
pub use platform::{BsdFlavor, OsFamily, OsIdentity};
pub use ports::{HostFilesystemPort, InterpreterProbePort};
pub use preload::{PRELOAD_SENTINEL, PreloadDecision, PreloadPlan, preload_plan};
pub use range::{LOCK_MARKER, RangeDefaults, RangeError, RangeSpec, VersionRange, parse_range};
pub use selection::{Rejection, SelectionPolicy, Verdict, select};
pub use services::{Resolution, ResolveRequest, Resolver, SurveyEntry};
pub use version::{ApiVersion, Version, VersionError};
