//! The version policy a resolution is run against.

use crate::candidate::NameFilter;
use crate::range::{RangeDefaults, RangeError, RangeSpec, VersionRange};
use serde::Serialize;
use std::fmt;

/// Release, LuaJIT and API ranges for one resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Constraints {
    /// Acceptable reference-family releases (also checked for LuaJIT).
    pub release: VersionRange,
    /// Acceptable LuaJIT releases; empty excludes the JIT family.
    pub jit: VersionRange,
    /// Acceptable `_VERSION` generations, checked for every family.
    pub api: VersionRange,
    /// Only look for `luajit*` executables.
    pub jit_only: bool,
}

impl Default for Constraints {
    fn default() -> Self {
        let release = VersionRange::full(RangeDefaults::RELEASE);
        Self {
            release,
            jit: VersionRange::full(RangeDefaults::JIT),
            api: release.api_projection(),
            jit_only: false,
        }
    }
}

impl Constraints {
    /// Build constraints from already-merged range specs.
    ///
    /// The API range, when not given, spans the generations of the release
    /// range. `exclude_jit` overrides any JIT range.
    pub fn from_specs(
        release: Option<&RangeSpec>,
        jit: Option<&RangeSpec>,
        api: Option<&RangeSpec>,
        exclude_jit: bool,
        jit_only: bool,
    ) -> Result<Self, RangeError> {
        let release = release.map_or_else(
            || Ok(VersionRange::full(RangeDefaults::RELEASE)),
            |spec| spec.to_range(RangeDefaults::RELEASE),
        )?;
        let jit = if exclude_jit {
            VersionRange::EMPTY
        } else {
            jit.map_or_else(
                || Ok(VersionRange::full(RangeDefaults::JIT)),
                |spec| spec.to_range(RangeDefaults::JIT),
            )?
        };
        let api = api.map_or_else(
            || Ok(release.api_projection()),
            |spec| spec.to_range(RangeDefaults::API),
        )?;
        Ok(Self {
            release,
            jit,
            api,
            jit_only,
        })
    }

    /// Which executable names are worth enumerating.
    pub const fn name_filter(&self) -> NameFilter {
        NameFilter {
            reference: !self.jit_only,
            jit: !self.jit.is_empty(),
        }
    }
}

impl fmt::Display for Constraints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "release {}, luajit {}, api {}",
            self.release, self.jit, self.api
        )?;
        if self.jit_only {
            f.write_str(", luajit only")?;
        }
        Ok(())
    }
}
