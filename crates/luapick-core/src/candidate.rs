//! Interpreter candidates and the naming rules used to recognise them.

use crate::version::{ApiVersion, Version};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Interpreter family, decided from the executable's normalized name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    /// The PUC-Rio reference implementation (`lua`).
    Reference,
    /// LuaJIT (`luajit`).
    Jit,
}

impl Family {
    /// The normalized executable name for this family.
    pub const fn base_name(&self) -> &'static str {
        match self {
            Self::Reference => "lua",
            Self::Jit => "luajit",
        }
    }

    /// Map a normalized basename back to its family.
    pub fn from_base_name(name: &str) -> Option<Self> {
        match name {
            "lua" => Some(Self::Reference),
            "luajit" => Some(Self::Jit),
            _ => None,
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Reference => "reference",
            Self::Jit => "jit",
        };
        f.write_str(name)
    }
}

/// Filename pattern tried in every search directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamePattern {
    /// The name must be exactly this string.
    Exact(&'static str),
    /// The name must start with this string.
    Prefix(&'static str),
}

impl NamePattern {
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::Exact(exact) => name == *exact,
            Self::Prefix(prefix) => name.starts_with(prefix),
        }
    }
}

impl fmt::Display for NamePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(exact) => f.write_str(exact),
            Self::Prefix(prefix) => write!(f, "{prefix}*"),
        }
    }
}

const REFERENCE_PATTERNS: [NamePattern; 3] = [
    NamePattern::Exact("lua"),
    NamePattern::Prefix("lua5"),
    NamePattern::Prefix("lua-5"),
];

const JIT_PATTERNS: [NamePattern; 1] = [NamePattern::Prefix("luajit")];

/// Which families the enumerator should look for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameFilter {
    pub reference: bool,
    pub jit: bool,
}

impl NameFilter {
    /// Patterns in the order they are tried within one directory.
    pub fn patterns(&self) -> Vec<NamePattern> {
        let mut patterns = Vec::with_capacity(REFERENCE_PATTERNS.len() + JIT_PATTERNS.len());
        if self.reference {
            patterns.extend(REFERENCE_PATTERNS);
        }
        if self.jit {
            patterns.extend(JIT_PATTERNS);
        }
        patterns
    }
}

const PRERELEASE_TAGS: [&str; 4] = ["alpha", "beta", "dev", "rc"];

fn is_version_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '.' | '_' | '-')
}

/// Strip one trailing pre-release tag such as `-beta` or `_dev`.
fn strip_prerelease_tag(name: &str) -> Option<&str> {
    PRERELEASE_TAGS.iter().find_map(|tag| {
        let rest = name.strip_suffix(tag)?;
        rest.strip_suffix(['.', '_', '-'])
    })
}

/// Reduce an executable name to its family stem.
///
/// Version suffixes (`5.3`, `-5.4.6`, `_2.1`) and pre-release tags
/// (`-beta3`, `.dev`) are removed until the name stops changing, so
/// `luajit-2.1.0-beta3` becomes `luajit` while `lua-tool` is left alone.
pub fn normalize_basename(name: &str) -> &str {
    let mut current = name;
    loop {
        let trimmed = current.trim_end_matches(is_version_char);
        let trimmed = strip_prerelease_tag(trimmed).unwrap_or(trimmed);
        if trimmed == current || trimmed.is_empty() {
            return trimmed;
        }
        current = trimmed;
    }
}

/// Classify a path by its file name, if it names a Lua interpreter.
pub fn family_of(path: &Path) -> Option<Family> {
    let name = path.file_name()?.to_str()?;
    Family::from_base_name(normalize_basename(name))
}

/// An executable found on the search path, not yet probed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredCandidate {
    pub path: PathBuf,
    pub family: Family,
}

/// A probed interpreter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub path: PathBuf,
    pub family: Family,
    pub api: ApiVersion,
    pub release: Version,
}

impl Candidate {
    pub fn new(discovered: DiscoveredCandidate, api: ApiVersion, release: Version) -> Self {
        Self {
            path: discovered.path,
            family: discovered.family,
            api,
            release,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_versioned_names() {
        assert_eq!(normalize_basename("lua"), "lua");
        assert_eq!(normalize_basename("lua5.3"), "lua");
        assert_eq!(normalize_basename("lua-5.4.6"), "lua");
        assert_eq!(normalize_basename("lua51"), "lua");
        assert_eq!(normalize_basename("luajit"), "luajit");
        assert_eq!(normalize_basename("luajit-2.1.0-beta3"), "luajit");
        assert_eq!(normalize_basename("luajit2.1_dev"), "luajit");
        assert_eq!(normalize_basename("lua5.4-rc2"), "lua");
    }

    #[test]
    fn test_normalize_leaves_lookalikes() {
        assert_eq!(normalize_basename("lua-tool"), "lua-tool");
        assert_eq!(normalize_basename("luac5.3"), "luac");
        assert_eq!(normalize_basename("lua5.3-config"), "lua5.3-config");
        assert_eq!(family_of(Path::new("/usr/bin/luarocks")), None);
        assert_eq!(family_of(Path::new("/usr/bin/luac5.1")), None);
    }

    #[test]
    fn test_family_of_paths() {
        assert_eq!(family_of(Path::new("/usr/bin/lua5.1")), Some(Family::Reference));
        assert_eq!(
            family_of(Path::new("/opt/bin/luajit-2.1.0-beta3")),
            Some(Family::Jit)
        );
    }

    #[test]
    fn test_patterns_follow_filter() {
        let both = NameFilter {
            reference: true,
            jit: true,
        };
        let rendered: Vec<String> = both.patterns().iter().map(ToString::to_string).collect();
        assert_eq!(rendered, ["lua", "lua5*", "lua-5*", "luajit*"]);

        let jit_only = NameFilter {
            reference: false,
            jit: true,
        };
        assert_eq!(jit_only.patterns(), vec![NamePattern::Prefix("luajit")]);

        let none = NameFilter {
            reference: false,
            jit: false,
        };
        assert!(none.patterns().is_empty());
    }

    #[test]
    fn test_pattern_matching() {
        assert!(NamePattern::Exact("lua").matches("lua"));
        assert!(!NamePattern::Exact("lua").matches("lua5.1"));
        assert!(NamePattern::Prefix("lua5").matches("lua5.1"));
        assert!(!NamePattern::Prefix("lua5").matches("luajit"));
    }
}
