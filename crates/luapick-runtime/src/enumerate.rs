//! Search-path enumeration of interpreter candidates.
//!
//! Directories are visited in search-path order and each one is read only
//! when the caller asks for more candidates. Within a directory the name
//! patterns are tried in order (`lua`, `lua5*`, `lua-5*`, `luajit*`), each
//! pattern's matches sorted by name, so the resulting sequence is
//! deterministic for a given filesystem state.

use luapick_core::{DiscoveredCandidate, HostFilesystemPort, NameFilter, NamePattern, family_of};
use std::collections::{HashSet, VecDeque};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Filesystem adapter over an ordered list of search directories.
#[derive(Debug, Clone, Default)]
pub struct SearchPath {
    dirs: Vec<PathBuf>,
}

impl SearchPath {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    /// Split a `PATH`-style value with the platform separator.
    pub fn from_path_var(value: &OsString) -> Self {
        Self::new(std::env::split_paths(value).collect())
    }

    /// Snapshot the process `PATH`.
    pub fn from_env() -> Self {
        std::env::var_os("PATH")
            .map(|value| Self::from_path_var(&value))
            .unwrap_or_default()
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Look a bare command name up in the search directories.
    fn lookup(&self, name: &Path) -> Option<PathBuf> {
        self.dirs
            .iter()
            .map(|dir| dir.join(name))
            .find(|candidate| is_executable_file(candidate))
    }
}

impl HostFilesystemPort for SearchPath {
    fn candidates(
        &self,
        filter: NameFilter,
    ) -> Box<dyn Iterator<Item = DiscoveredCandidate> + Send + '_> {
        Box::new(Candidates::new(&self.dirs, filter.patterns()))
    }

    fn libraries(&self, dir: &Path, prefix: &str) -> Vec<PathBuf> {
        let mut names = read_names(dir);
        names.retain(|name| name.starts_with(prefix));
        names
            .into_iter()
            .map(|name| dir.join(name))
            .filter(|path| path.is_file())
            .collect()
    }

    fn check_executable(&self, path: &Path) -> Result<PathBuf, String> {
        let is_bare_name = path.components().count() == 1 && !path.exists();
        let located = if is_bare_name {
            self.lookup(path)
                .ok_or_else(|| "not found on the search path".to_string())?
        } else {
            path.to_path_buf()
        };

        let metadata = fs::metadata(&located).map_err(|e| e.to_string())?;
        if !metadata.is_file() {
            return Err("not a file".to_string());
        }
        if !is_executable_file(&located) {
            return Err("not executable".to_string());
        }
        // Absolute, but symlinks keep the name they were configured under.
        std::path::absolute(&located).map_err(|e| e.to_string())
    }
}

/// Lazy iterator over the candidates of a search path.
struct Candidates<'a> {
    dirs: std::slice::Iter<'a, PathBuf>,
    patterns: Vec<NamePattern>,
    seen: HashSet<PathBuf>,
    pending: VecDeque<DiscoveredCandidate>,
}

impl<'a> Candidates<'a> {
    fn new(dirs: &'a [PathBuf], patterns: Vec<NamePattern>) -> Self {
        Self {
            dirs: dirs.iter(),
            patterns,
            seen: HashSet::new(),
            pending: VecDeque::new(),
        }
    }

    /// Queue the candidates of one directory. Unusable entries are skipped.
    fn scan(&mut self, dir: &Path) {
        let Ok(dir) = dir.canonicalize() else {
            trace!(dir = %dir.display(), "Skipping missing search directory");
            return;
        };
        if !dir.is_dir() || !self.seen.insert(dir.clone()) {
            return;
        }

        let names = read_names(&dir);
        for pattern in &self.patterns {
            for name in names.iter().filter(|name| pattern.matches(name)) {
                let path = dir.join(name);
                let Some(family) = family_of(&path) else {
                    trace!(path = %path.display(), "Ignoring lookalike executable");
                    continue;
                };
                if !is_executable_file(&path) {
                    continue;
                }
                debug!(path = %path.display(), %family, "Found candidate");
                self.pending.push_back(DiscoveredCandidate { path, family });
            }
        }
    }
}

impl Iterator for Candidates<'_> {
    type Item = DiscoveredCandidate;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(candidate) = self.pending.pop_front() {
                return Some(candidate);
            }
            let dir = self.dirs.next()?;
            self.scan(dir);
        }
    }
}

/// UTF-8 entry names of `dir`, sorted. Unreadable directories yield nothing.
fn read_names(dir: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .filter_map(Result::ok)
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect();
    names.sort();
    names
}

#[cfg(unix)]
fn is_executable_file(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path).is_ok_and(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable_file(path: &Path) -> bool {
    path.is_file()
}
