//! Choosing one interpreter among probed candidates.
//!
//! Candidates are offered in enumeration order. A candidate qualifies when it
//! reported an API version, that API is in range, and its release is in the
//! release range (or, for LuaJIT, in the JIT range). Among qualifying
//! candidates a later one replaces the current best only when its API is at
//! least as high and its release is strictly higher, so on an exact tie the
//! first one found wins and search-path order acts as priority.

use crate::candidate::{Candidate, Family};
use crate::constraints::Constraints;
use crate::version::ApiVersion;
use std::fmt;

/// Why a candidate was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The executable did not report a version.
    Unprobed,
    ApiOutOfRange,
    ReleaseOutOfRange,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::Unprobed => "did not report a version",
            Self::ApiOutOfRange => "API version out of range",
            Self::ReleaseOutOfRange => "release out of range",
        };
        f.write_str(reason)
    }
}

/// Result of offering a candidate to the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Qualifies and became the current best.
    Selected,
    /// Qualifies but does not beat the current best.
    Outranked,
    Rejected(Rejection),
}

/// Incremental best-candidate selection.
#[derive(Debug, Clone)]
pub struct SelectionPolicy {
    constraints: Constraints,
    best: Option<Candidate>,
}

impl SelectionPolicy {
    pub const fn new(constraints: Constraints) -> Self {
        Self {
            constraints,
            best: None,
        }
    }

    /// Check the API alone, before spending a probe on the release.
    pub fn screen_api(&self, api: ApiVersion) -> Result<(), Rejection> {
        if api.is_zero() {
            return Err(Rejection::Unprobed);
        }
        if !self.constraints.api.contains_api(api) {
            return Err(Rejection::ApiOutOfRange);
        }
        Ok(())
    }

    /// Whether a candidate qualifies, ignoring the current best.
    pub fn check(&self, candidate: &Candidate) -> Result<(), Rejection> {
        self.screen_api(candidate.api)?;
        let release = candidate.release;
        let in_release = self.constraints.release.contains(release);
        let in_jit = candidate.family == Family::Jit && self.constraints.jit.contains(release);
        if in_release || in_jit {
            Ok(())
        } else {
            Err(Rejection::ReleaseOutOfRange)
        }
    }

    /// Offer the next candidate in enumeration order.
    pub fn offer(&mut self, candidate: Candidate) -> Verdict {
        if let Err(rejection) = self.check(&candidate) {
            return Verdict::Rejected(rejection);
        }
        let replaces = self
            .best
            .as_ref()
            .is_none_or(|best| candidate.api >= best.api && candidate.release > best.release);
        if replaces {
            self.best = Some(candidate);
            Verdict::Selected
        } else {
            Verdict::Outranked
        }
    }

    pub fn finish(self) -> Option<Candidate> {
        self.best
    }
}

/// Run the policy over a complete, ordered candidate list.
pub fn select<I>(constraints: Constraints, candidates: I) -> Option<Candidate>
where
    I: IntoIterator<Item = Candidate>,
{
    let mut policy = SelectionPolicy::new(constraints);
    for candidate in candidates {
        policy.offer(candidate);
    }
    policy.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::{RangeSpec, VersionRange};
    use crate::version::Version;
    use std::path::PathBuf;

    fn candidate(
        path: &str,
        family: Family,
        api: (u32, u32),
        release: (u32, u32, u32),
    ) -> Candidate {
        Candidate {
            path: PathBuf::from(path),
            family,
            api: ApiVersion::new(api.0, api.1).unwrap(),
            release: Version::new(release.0, release.1, release.2).unwrap(),
        }
    }

    fn constraints(release: &str) -> Constraints {
        let spec = RangeSpec::parse(release);
        Constraints::from_specs(Some(&spec), None, None, false, false).unwrap()
    }

    #[test]
    fn test_prefers_higher_api_and_release() {
        let winner = select(
            constraints("5.1-5.3"),
            vec![
                candidate("/a/lua5.1", Family::Reference, (5, 1), (5, 1, 5)),
                candidate("/b/lua5.3", Family::Reference, (5, 3), (5, 3, 4)),
            ],
        )
        .unwrap();
        assert_eq!(winner.path, PathBuf::from("/b/lua5.3"));
    }

    #[test]
    fn test_first_seen_wins_exact_tie() {
        let winner = select(
            Constraints::default(),
            vec![
                candidate("/a/lua", Family::Reference, (5, 4), (5, 4, 6)),
                candidate("/b/lua", Family::Reference, (5, 4), (5, 4, 6)),
            ],
        )
        .unwrap();
        assert_eq!(winner.path, PathBuf::from("/a/lua"));
    }

    #[test]
    fn test_lower_api_never_displaces() {
        let winner = select(
            Constraints::default(),
            vec![
                candidate("/a/lua5.3", Family::Reference, (5, 3), (5, 3, 0)),
                candidate("/b/luajit", Family::Jit, (5, 1), (5, 3, 99)),
            ],
        )
        .unwrap();
        assert_eq!(winner.path, PathBuf::from("/a/lua5.3"));
    }

    #[test]
    fn test_selection_is_deterministic() {
        let input = vec![
            candidate("/a/lua5.2", Family::Reference, (5, 2), (5, 2, 4)),
            candidate("/b/lua5.4", Family::Reference, (5, 4), (5, 4, 0)),
            candidate("/c/lua5.4", Family::Reference, (5, 4), (5, 4, 0)),
            candidate("/d/lua5.3", Family::Reference, (5, 3), (5, 3, 6)),
        ];
        let first = select(Constraints::default(), input.clone());
        let second = select(Constraints::default(), input);
        assert_eq!(first, second);
        assert_eq!(first.unwrap().path, PathBuf::from("/b/lua5.4"));
    }

    #[test]
    fn test_unprobed_is_never_selected() {
        let permissive = Constraints {
            release: VersionRange::new(Version::ZERO, Version::MAX),
            jit: VersionRange::new(Version::ZERO, Version::MAX),
            api: VersionRange::new(Version::ZERO, Version::MAX),
            jit_only: false,
        };
        let unprobed = Candidate {
            path: PathBuf::from("/a/lua"),
            family: Family::Reference,
            api: ApiVersion::ZERO,
            release: Version::new(5, 4, 0).unwrap(),
        };
        let mut policy = SelectionPolicy::new(permissive);
        assert_eq!(
            policy.offer(unprobed),
            Verdict::Rejected(Rejection::Unprobed)
        );
        assert!(policy.finish().is_none());
    }

    #[test]
    fn test_jit_release_checked_against_jit_range() {
        let release = RangeSpec::parse("5.1");
        let jit = RangeSpec::parse("2.0-2.1");
        let c = Constraints::from_specs(Some(&release), Some(&jit), None, false, false).unwrap();
        let policy = SelectionPolicy::new(c);

        let luajit = candidate("/a/luajit", Family::Jit, (5, 1), (2, 1, 0));
        assert_eq!(policy.check(&luajit), Ok(()));

        let impostor = candidate("/a/lua", Family::Reference, (5, 1), (2, 1, 0));
        assert_eq!(policy.check(&impostor), Err(Rejection::ReleaseOutOfRange));
    }

    #[test]
    fn test_api_out_of_range() {
        let policy = SelectionPolicy::new(constraints("5.3"));
        let old = candidate("/a/lua5.1", Family::Reference, (5, 1), (5, 1, 5));
        assert_eq!(policy.check(&old), Err(Rejection::ApiOutOfRange));
    }

    #[test]
    fn test_verdicts() {
        let mut policy = SelectionPolicy::new(Constraints::default());
        let a = candidate("/a/lua", Family::Reference, (5, 4), (5, 4, 6));
        let b = candidate("/b/lua", Family::Reference, (5, 3), (5, 3, 6));
        assert_eq!(policy.offer(a), Verdict::Selected);
        assert_eq!(policy.offer(b), Verdict::Outranked);
    }
}
