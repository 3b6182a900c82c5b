//! Interpreter resolution service.
//!
//! Walks the candidates the filesystem port yields, probes each one in turn
//! and feeds the selection policy, then asks the preload advisor about the
//! winner. Candidates are probed strictly one after another; their order is
//! what breaks ties.

use crate::candidate::{Candidate, DiscoveredCandidate, Family, family_of};
use crate::constraints::Constraints;
use crate::error::{ResolveError, ResolveResult};
use crate::platform::{OsFamily, OsIdentity};
use crate::ports::{HostFilesystemPort, InterpreterProbePort};
use crate::preload::{PTHREAD_PREFIX, PreloadDecision, PreloadPlan, preload_plan};
use crate::selection::{Rejection, SelectionPolicy, Verdict};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Everything one resolution call needs besides the ports.
#[derive(Debug, Clone)]
pub struct ResolveRequest {
    pub constraints: Constraints,
    /// Skip the search and use this interpreter.
    pub interpreter: Option<PathBuf>,
    /// Work out whether a threading library must be preloaded.
    pub preload: bool,
    pub os: OsIdentity,
}

/// The chosen interpreter and how to launch it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub interpreter: Candidate,
    pub preload: PreloadDecision,
}

/// One line of a full survey of the search path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurveyEntry {
    pub candidate: Candidate,
    pub verdict: Result<(), Rejection>,
    /// This entry is the one `resolve` would return.
    pub selected: bool,
}

/// Resolution service over a filesystem and a probe.
pub struct Resolver<'a> {
    fs: &'a dyn HostFilesystemPort,
    probe: &'a dyn InterpreterProbePort,
}

impl<'a> Resolver<'a> {
    pub fn new(fs: &'a dyn HostFilesystemPort, probe: &'a dyn InterpreterProbePort) -> Self {
        Self { fs, probe }
    }

    /// Resolve one interpreter for `request`.
    pub async fn resolve(&self, request: &ResolveRequest) -> ResolveResult<Resolution> {
        let interpreter = match &request.interpreter {
            Some(path) => self.use_override(path).await?,
            None => self.search(&request.constraints).await?,
        };

        let preload = if request.preload {
            self.advise_preload(&interpreter.path, &request.os).await
        } else {
            PreloadDecision::NotNeeded
        };
        if let PreloadDecision::Unavailable { reason } = preload {
            return Err(ResolveError::PreloadUnavailable {
                os: request.os.to_string(),
                reason,
            });
        }

        info!(
            interpreter = %interpreter.path.display(),
            family = %interpreter.family,
            api = %interpreter.api,
            release = %interpreter.release,
            "Resolved Lua interpreter"
        );
        Ok(Resolution {
            interpreter,
            preload,
        })
    }

    /// Walk the search path and return the best qualifying candidate.
    pub async fn search(&self, constraints: &Constraints) -> ResolveResult<Candidate> {
        let mut policy = SelectionPolicy::new(*constraints);

        for discovered in self.fs.candidates(constraints.name_filter()) {
            let api = self.probe.probe_api(&discovered.path).await;
            if let Err(rejection) = policy.screen_api(api) {
                debug!(
                    candidate = %discovered.path.display(),
                    %api,
                    %rejection,
                    "Skipping candidate"
                );
                continue;
            }

            let release = self.probe.probe_release(&discovered.path).await;
            let path = discovered.path.clone();
            match policy.offer(Candidate::new(discovered, api, release)) {
                Verdict::Rejected(rejection) => {
                    debug!(
                        candidate = %path.display(),
                        %api,
                        %release,
                        %rejection,
                        "Skipping candidate"
                    );
                }
                Verdict::Outranked => {
                    debug!(
                        candidate = %path.display(),
                        %api,
                        %release,
                        "Candidate qualifies but is outranked"
                    );
                }
                Verdict::Selected => {
                    debug!(candidate = %path.display(), %api, %release, "New best candidate");
                }
            }
        }

        policy
            .finish()
            .ok_or_else(|| ResolveError::NoInterpreter {
                constraints: constraints.to_string(),
            })
    }

    /// Probe every candidate on the search path and report how each fares.
    pub async fn survey(&self, constraints: &Constraints) -> Vec<SurveyEntry> {
        let mut policy = SelectionPolicy::new(*constraints);
        let mut entries: Vec<SurveyEntry> = Vec::new();
        let mut winner = None;

        for discovered in self.fs.candidates(constraints.name_filter()) {
            let candidate = self.probe_candidate(discovered).await;
            let verdict = policy.check(&candidate);
            if policy.offer(candidate.clone()) == Verdict::Selected {
                winner = Some(entries.len());
            }
            entries.push(SurveyEntry {
                candidate,
                verdict,
                selected: false,
            });
        }

        if let Some(index) = winner {
            entries[index].selected = true;
        }
        entries
    }

    /// Use a caller-supplied interpreter without range checks.
    async fn use_override(&self, path: &Path) -> ResolveResult<Candidate> {
        let path = self
            .fs
            .check_executable(path)
            .map_err(|reason| ResolveError::invalid_override(path, reason))?;
        let family = family_of(&path).unwrap_or(Family::Reference);
        let candidate = self
            .probe_candidate(DiscoveredCandidate { path, family })
            .await;
        if candidate.api.is_zero() {
            warn!(
                interpreter = %candidate.path.display(),
                "Configured interpreter did not report a version; using it anyway"
            );
        }
        Ok(candidate)
    }

    async fn probe_candidate(&self, discovered: DiscoveredCandidate) -> Candidate {
        let api = self.probe.probe_api(&discovered.path).await;
        let release = self.probe.probe_release(&discovered.path).await;
        Candidate::new(discovered, api, release)
    }

    /// Decide whether `interpreter` needs a threading library preloaded on `os`.
    pub async fn advise_preload(&self, interpreter: &Path, os: &OsIdentity) -> PreloadDecision {
        let search = match preload_plan(os) {
            PreloadPlan::NotNeeded { reason } => {
                if matches!(os.family, OsFamily::Unknown(_)) {
                    warn!(%os, %reason, "Unrecognized host; assuming no threading preload");
                } else {
                    debug!(%os, %reason, "No threading preload needed");
                }
                return PreloadDecision::NotNeeded;
            }
            PreloadPlan::Search(search) => search,
        };

        let mut libraries: Vec<PathBuf> = search.bare_names.iter().map(PathBuf::from).collect();
        for dir in &search.dirs {
            libraries.extend(self.fs.libraries(dir, PTHREAD_PREFIX));
        }

        for library in libraries {
            if self.probe.trial_preload(interpreter, &library).await {
                debug!(library = %library.display(), "Threading library preload works");
                return PreloadDecision::Preload(library);
            }
            debug!(library = %library.display(), "Threading library preload failed");
        }

        let searched: Vec<String> = search
            .dirs
            .iter()
            .map(|dir| dir.display().to_string())
            .collect();
        let reason = format!(
            "no usable {PTHREAD_PREFIX}* found (searched {})",
            searched.join(", ")
        );
        if search.required {
            PreloadDecision::Unavailable { reason }
        } else {
            warn!(%os, %reason, "Continuing without a threading library preload");
            PreloadDecision::NotNeeded
        }
    }
}
