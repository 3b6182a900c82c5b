//! Entry points that wire the real adapters into the core resolver.
//!
//! Each call snapshots the search path and owns its own probe (and so its
//! own scratch directory); nothing is cached between calls.

use crate::enumerate::SearchPath;
use crate::probe::ProcessProbe;
use luapick_core::{Constraints, Resolution, ResolveRequest, ResolveResult, Resolver, SurveyEntry};
use std::time::Duration;

/// Resolve an interpreter over `search` with a fresh process probe.
pub async fn resolve_with(
    search: &SearchPath,
    request: &ResolveRequest,
    timeout: Duration,
) -> ResolveResult<Resolution> {
    let probe = ProcessProbe::new(timeout);
    Resolver::new(search, &probe).resolve(request).await
}

/// Resolve an interpreter over the current `PATH`.
pub async fn resolve_interpreter(
    request: &ResolveRequest,
    timeout: Duration,
) -> ResolveResult<Resolution> {
    resolve_with(&SearchPath::from_env(), request, timeout).await
}

/// Probe and judge every candidate on `search`.
pub async fn survey_with(
    search: &SearchPath,
    constraints: &Constraints,
    timeout: Duration,
) -> Vec<SurveyEntry> {
    let probe = ProcessProbe::new(timeout);
    Resolver::new(search, &probe).survey(constraints).await
}

/// Probe and judge every candidate on the current `PATH`.
pub async fn survey_path(constraints: &Constraints, timeout: Duration) -> Vec<SurveyEntry> {
    survey_with(&SearchPath::from_env(), constraints, timeout).await
}
