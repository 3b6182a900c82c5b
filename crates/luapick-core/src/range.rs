//! Version range expressions.
//!
//! A range is written `MIN-MAX`, `MIN-`, `-MAX` or as a bare version `V`
//! (meaning `V-V`). `,` and `:` are accepted as legacy separators. Missing
//! bounds, and missing trailing components of a present bound, are taken from
//! the [`RangeDefaults`] of the context the range is used in.

use crate::version::{ApiVersion, MAX_COMPONENT, Version, VersionError};
use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// Marker that, as the first character of a range, locks it against overrides.
pub const LOCK_MARKER: char = '!';

const SEPARATORS: [char; 3] = ['-', ',', ':'];

/// Errors produced while parsing a range expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    /// One of the bounds is not a valid version.
    #[error("invalid version range '{range}': {source}")]
    Version {
        range: String,
        #[source]
        source: VersionError,
    },

    /// The lower bound is above the upper bound.
    #[error("invalid version range '{range}': {min} is greater than {max}")]
    Inverted {
        range: String,
        min: Version,
        max: Version,
    },
}

/// Bounds used when a range leaves one side (or some components) open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeDefaults {
    pub min: Version,
    pub max: Version,
}

impl RangeDefaults {
    /// Reference interpreter releases: every release from 1.0 up.
    pub const RELEASE: Self = Self {
        min: Version::ONE,
        max: Version::MAX,
    };

    /// LuaJIT releases, versioned independently of the reference family.
    pub const JIT: Self = Self {
        min: Version::ONE,
        max: Version::MAX,
    };

    /// API generations, `1.0` up to `99.99`.
    pub const API: Self = Self {
        min: Version::ONE,
        max: Version::MAX,
    };
}

/// An inclusive interval of versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VersionRange {
    min: Version,
    max: Version,
}

impl VersionRange {
    /// The range no probed interpreter can satisfy; used to exclude a family.
    pub const EMPTY: Self = Self {
        min: Version::ZERO,
        max: Version::ZERO,
    };

    pub fn new(min: Version, max: Version) -> Self {
        Self { min, max }
    }

    /// The range covering everything the defaults allow.
    pub fn full(defaults: RangeDefaults) -> Self {
        Self::new(defaults.min, defaults.max)
    }

    pub const fn min(&self) -> Version {
        self.min
    }

    pub const fn max(&self) -> Version {
        self.max
    }

    /// True when the upper bound is zero, i.e. nothing real can match.
    pub const fn is_empty(&self) -> bool {
        self.max.is_zero()
    }

    pub fn contains(&self, version: Version) -> bool {
        !self.is_empty() && self.min <= version && version <= self.max
    }

    /// Compare only the `major.minor` part of both bounds.
    pub fn contains_api(&self, api: ApiVersion) -> bool {
        !self.is_empty() && self.min.api() <= api && api <= self.max.api()
    }

    /// The API generations spanned by this release range.
    ///
    /// `5.1.3-5.3.0` projects to `5.1.0-5.3.99`.
    pub fn api_projection(&self) -> Self {
        if self.is_empty() {
            return Self::EMPTY;
        }
        Self::new(
            Version::saturating(self.min.major(), self.min.minor(), 0),
            Version::saturating(self.max.major(), self.max.minor(), MAX_COMPONENT),
        )
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "none")
        } else {
            write!(f, "{}-{}", self.min, self.max)
        }
    }
}

impl Serialize for VersionRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Parse a range expression (without lock marker) against `defaults`.
///
/// ```
/// use luapick_core::range::{parse_range, RangeDefaults};
///
/// let range = parse_range("5.2-5.3", RangeDefaults::RELEASE).unwrap();
/// assert_eq!(range.to_string(), "5.2.0-5.3.99");
/// ```
pub fn parse_range(text: &str, defaults: RangeDefaults) -> Result<VersionRange, RangeError> {
    let text = text.trim();
    let (left, right) = text.split_once(SEPARATORS).unwrap_or((text, text));

    let bound = |token: &str, default: Version| -> Result<Version, RangeError> {
        let token = token.trim();
        if token.is_empty() {
            return Ok(default);
        }
        Version::parse_with(token, default).map_err(|source| RangeError::Version {
            range: text.to_string(),
            source,
        })
    };

    let min = bound(left, defaults.min)?;
    let max = bound(right, defaults.max)?;
    if min > max {
        return Err(RangeError::Inverted {
            range: text.to_string(),
            min,
            max,
        });
    }
    Ok(VersionRange::new(min, max))
}

/// A raw range expression as supplied by one configuration source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeSpec {
    text: String,
    locked: bool,
}

impl RangeSpec {
    /// Strip a leading [`LOCK_MARKER`], remembering whether it was present.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match raw.strip_prefix(LOCK_MARKER) {
            Some(rest) => Self {
                text: rest.trim().to_string(),
                locked: true,
            },
            None => Self {
                text: raw.to_string(),
                locked: false,
            },
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub const fn is_locked(&self) -> bool {
        self.locked
    }

    /// Pick between two sources for the same setting.
    ///
    /// A locked spec beats an unlocked one; otherwise `primary` wins when set.
    pub fn prefer(primary: Option<Self>, fallback: Option<Self>) -> Option<Self> {
        match (primary, fallback) {
            (Some(p), Some(f)) if f.locked && !p.locked => Some(f),
            (Some(p), _) => Some(p),
            (None, f) => f,
        }
    }

    pub fn to_range(&self, defaults: RangeDefaults) -> Result<VersionRange, RangeError> {
        parse_range(&self.text, defaults)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(major: u32, minor: u32, patch: u32) -> Version {
        Version::new(major, minor, patch).unwrap()
    }

    #[test]
    fn test_closed_range() {
        let range = parse_range("5.2-5.3", RangeDefaults::RELEASE).unwrap();
        assert_eq!(range.min().encode(), v(5, 2, 0).encode());
        assert_eq!(range.max().encode(), v(5, 3, 99).encode());
    }

    #[test]
    fn test_open_upper_bound() {
        let range = parse_range("5.2-", RangeDefaults::RELEASE).unwrap();
        assert_eq!(range.min(), v(5, 2, 0));
        assert_eq!(range.max(), Version::MAX);
    }

    #[test]
    fn test_open_lower_bound() {
        let range = parse_range("-5.3", RangeDefaults::RELEASE).unwrap();
        assert_eq!(range.min(), RangeDefaults::RELEASE.min);
        assert_eq!(range.max(), v(5, 3, 99));
    }

    #[test]
    fn test_bare_version_spans_its_generation() {
        let range = parse_range("5.2", RangeDefaults::RELEASE).unwrap();
        assert_eq!(range.min(), v(5, 2, 0));
        assert_eq!(range.max(), v(5, 2, 99));
        assert!(range.contains(v(5, 2, 4)));
        assert!(!range.contains(v(5, 3, 0)));
    }

    #[test]
    fn test_legacy_separators() {
        let dash = parse_range("5.1-5.3", RangeDefaults::RELEASE).unwrap();
        assert_eq!(parse_range("5.1,5.3", RangeDefaults::RELEASE).unwrap(), dash);
        assert_eq!(parse_range("5.1:5.3", RangeDefaults::RELEASE).unwrap(), dash);
    }

    #[test]
    fn test_empty_expression_is_full_range() {
        let range = parse_range("", RangeDefaults::RELEASE).unwrap();
        assert_eq!(range, VersionRange::full(RangeDefaults::RELEASE));
        let range = parse_range("-", RangeDefaults::RELEASE).unwrap();
        assert_eq!(range, VersionRange::full(RangeDefaults::RELEASE));
    }

    #[test]
    fn test_malformed_range_is_config_error() {
        let err = parse_range("5.x", RangeDefaults::RELEASE).unwrap_err();
        assert!(matches!(err, RangeError::Version { .. }));
        assert!(err.to_string().contains("5.x"));
    }

    #[test]
    fn test_inverted_range_is_rejected() {
        let err = parse_range("5.3-5.1", RangeDefaults::RELEASE).unwrap_err();
        assert!(matches!(err, RangeError::Inverted { .. }));
    }

    #[test]
    fn test_empty_range_contains_nothing() {
        assert!(!VersionRange::EMPTY.contains(Version::ZERO));
        assert!(!VersionRange::EMPTY.contains_api(ApiVersion::ZERO));
        assert_eq!(VersionRange::EMPTY.to_string(), "none");
    }

    #[test]
    fn test_api_projection() {
        let range = parse_range("5.1.3-5.3.0", RangeDefaults::RELEASE).unwrap();
        let api = range.api_projection();
        assert!(api.contains_api(ApiVersion::new(5, 1).unwrap()));
        assert!(api.contains_api(ApiVersion::new(5, 3).unwrap()));
        assert!(!api.contains_api(ApiVersion::new(5, 4).unwrap()));
    }

    #[test]
    fn test_lock_marker_is_stripped() {
        let spec = RangeSpec::parse("!5.1");
        assert!(spec.is_locked());
        assert_eq!(spec.text(), "5.1");
        assert!(!RangeSpec::parse("5.1").is_locked());
    }

    #[test]
    fn test_locked_fallback_beats_unlocked_primary() {
        let cli = Some(RangeSpec::parse("5.3"));
        let env = Some(RangeSpec::parse("!5.1"));
        assert_eq!(RangeSpec::prefer(cli, env).unwrap().text(), "5.1");
    }

    #[test]
    fn test_primary_wins_otherwise() {
        let cli = Some(RangeSpec::parse("!5.3"));
        let env = Some(RangeSpec::parse("!5.1"));
        assert_eq!(RangeSpec::prefer(cli, env).unwrap().text(), "5.3");

        let env = Some(RangeSpec::parse("5.1"));
        assert_eq!(RangeSpec::prefer(None, env).unwrap().text(), "5.1");
        assert_eq!(
            RangeSpec::prefer(Some(RangeSpec::parse("5.4")), Some(RangeSpec::parse("5.1")))
                .unwrap()
                .text(),
            "5.4"
        );
    }
}
