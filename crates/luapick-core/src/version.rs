//! Version and API version values with a fixed-width integer encoding.
//!
//! A [`Version`] packs into `major * 10000 + minor * 100 + patch`, which keeps
//! every comparison a single integer compare. The encoding only has room for
//! two decimal digits per component, so components are bounded to `0..=99`:
//! values parsed from user input outside that bound are rejected, values
//! scraped from interpreter output are saturated.

use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// Largest value a single version component may hold.
pub const MAX_COMPONENT: u32 = 99;

/// Errors produced while building or parsing a version.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    /// A component does not fit in the two-digit encoding.
    #[error("version component {component} = {value} is out of range (0-{MAX_COMPONENT})")]
    ComponentOutOfRange { component: &'static str, value: u32 },

    /// A component is empty or contains something other than ASCII digits.
    #[error("invalid version '{0}': components must be decimal numbers")]
    InvalidComponent(String),

    /// More than `major.minor.patch` was supplied.
    #[error("invalid version '{0}': at most three components are allowed")]
    TooManyComponents(String),
}

const fn clamp_component(value: u32) -> u32 {
    if value > MAX_COMPONENT {
        MAX_COMPONENT
    } else {
        value
    }
}

const COMPONENT_NAMES: [&str; 3] = ["major", "minor", "patch"];

/// A `major.minor.patch` release version.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    major: u32,
    minor: u32,
    patch: u32,
}

impl Version {
    /// The unversioned sentinel, reported for executables that could not be probed.
    pub const ZERO: Self = Self {
        major: 0,
        minor: 0,
        patch: 0,
    };

    /// `1.0.0`, the oldest release the default ranges admit.
    pub const ONE: Self = Self {
        major: 1,
        minor: 0,
        patch: 0,
    };

    /// The largest representable version, `99.99.99`.
    pub const MAX: Self = Self {
        major: MAX_COMPONENT,
        minor: MAX_COMPONENT,
        patch: MAX_COMPONENT,
    };

    /// Build a version, rejecting components above [`MAX_COMPONENT`].
    pub fn new(major: u32, minor: u32, patch: u32) -> Result<Self, VersionError> {
        for (component, value) in COMPONENT_NAMES.into_iter().zip([major, minor, patch]) {
            if value > MAX_COMPONENT {
                return Err(VersionError::ComponentOutOfRange { component, value });
            }
        }
        Ok(Self {
            major,
            minor,
            patch,
        })
    }

    /// Build a version, clamping each component to [`MAX_COMPONENT`].
    pub const fn saturating(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major: clamp_component(major),
            minor: clamp_component(minor),
            patch: clamp_component(patch),
        }
    }

    pub const fn major(&self) -> u32 {
        self.major
    }

    pub const fn minor(&self) -> u32 {
        self.minor
    }

    pub const fn patch(&self) -> u32 {
        self.patch
    }

    pub const fn is_zero(&self) -> bool {
        self.major == 0 && self.minor == 0 && self.patch == 0
    }

    /// Pack into the comparable integer form.
    pub const fn encode(&self) -> u32 {
        self.major * 10_000 + self.minor * 100 + self.patch
    }

    /// Inverse of [`Version::encode`]. Values above `99.99.99` saturate.
    pub fn decode(encoded: u32) -> Self {
        Self::saturating(encoded / 10_000, (encoded / 100) % 100, encoded % 100)
    }

    /// The compatibility generation (`major.minor`) of this release.
    pub const fn api(&self) -> ApiVersion {
        ApiVersion {
            major: self.major,
            minor: self.minor,
        }
    }

    /// Parse `major[.minor[.patch]]`, filling absent components from `defaults`.
    pub fn parse_with(token: &str, defaults: Self) -> Result<Self, VersionError> {
        let [major, minor, patch] = split_components(token)?;
        Self::new(
            major.unwrap_or(defaults.major),
            minor.unwrap_or(defaults.minor),
            patch.unwrap_or(defaults.patch),
        )
    }

    /// Parse a version scraped from interpreter output.
    ///
    /// Absent components are zero and oversized ones are clamped, so
    /// `"2.1.1700008891"` reads as `2.1.99`.
    pub fn parse_saturating(token: &str) -> Result<Self, VersionError> {
        let [major, minor, patch] = split_components(token)?;
        Ok(Self::saturating(
            major.unwrap_or(0),
            minor.unwrap_or(0),
            patch.unwrap_or(0),
        ))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A `major.minor` compatibility generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ApiVersion {
    major: u32,
    minor: u32,
}

impl ApiVersion {
    /// Reported for candidates whose `_VERSION` could not be read.
    pub const ZERO: Self = Self { major: 0, minor: 0 };

    pub fn new(major: u32, minor: u32) -> Result<Self, VersionError> {
        Version::new(major, minor, 0).map(|v| v.api())
    }

    pub const fn major(&self) -> u32 {
        self.major
    }

    pub const fn minor(&self) -> u32 {
        self.minor
    }

    pub const fn is_zero(&self) -> bool {
        self.major == 0 && self.minor == 0
    }

    /// Pack into the comparable integer form (the release encoding without patch).
    pub const fn encode(&self) -> u32 {
        self.major * 100 + self.minor
    }

    pub fn decode(encoded: u32) -> Self {
        Version::decode(encoded.saturating_mul(100)).api()
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl Serialize for ApiVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Split a dotted token into up to three numeric components.
fn split_components(token: &str) -> Result<[Option<u32>; 3], VersionError> {
    let token = token.trim();
    let mut components = [None; 3];
    for (index, part) in token.split('.').enumerate() {
        if index >= components.len() {
            return Err(VersionError::TooManyComponents(token.to_string()));
        }
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(VersionError::InvalidComponent(token.to_string()));
        }
        // Digit-only strings only fail to parse on overflow; treat that as oversized.
        components[index] = Some(part.parse::<u32>().unwrap_or(u32::MAX));
    }
    Ok(components)
}
