//! Subprocess probes that ask a candidate interpreter what it is.
//!
//! Every probe runs the candidate with Lua's own search and init variables
//! removed, from a read-only scratch directory, under a timeout. Any failure
//! is logged and reported to the resolver as a zero version; it never aborts
//! the search.

use crate::scratch::ScratchDir;
use async_trait::async_trait;
use luapick_core::{ApiVersion, InterpreterProbePort, PRELOAD_SENTINEL, Version};
use regex::Regex;
use std::ffi::OsStr;
use std::path::Path;
use std::process::{Output, Stdio};
use std::sync::LazyLock;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

/// Default per-probe timeout.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Variables that would let the environment run code inside a probe or
/// change where the interpreter looks for modules.
const SCRUBBED_VARS: [&str; 3] = ["LUA_INIT", "LUA_PATH", "LUA_CPATH"];
const VERSIONED_SUFFIXES: [&str; 4] = ["_5_1", "_5_2", "_5_3", "_5_4"];

/// Lua chunk printing the API generation, e.g. `Lua 5.3`.
const API_CHUNK: &str = "print(_VERSION)";

static API_BANNER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bLua\s+([0-9]+(?:\.[0-9]+)*)").expect("static regex"));

static RELEASE_BANNER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*Lua(?:JIT)?\s+([0-9]+(?:\.[0-9]+){0,2})").expect("static regex")
});

/// Why a probe produced no version.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("scratch directory unavailable: {0}")]
    Scratch(String),

    #[error("failed to run: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("exited with {0}")]
    Failed(std::process::ExitStatus),

    #[error("no version in output: {0:?}")]
    NoVersion(String),
}

/// Probe adapter backed by real subprocesses.
///
/// One instance belongs to one resolution call; its scratch directory is
/// removed when it is dropped.
#[derive(Debug)]
pub struct ProcessProbe {
    scratch: ScratchDir,
    timeout: Duration,
}

impl Default for ProcessProbe {
    fn default() -> Self {
        Self::new(DEFAULT_PROBE_TIMEOUT)
    }
}

impl ProcessProbe {
    pub fn new(timeout: Duration) -> Self {
        Self {
            scratch: ScratchDir::new(),
            timeout,
        }
    }

    /// Run `interpreter` with `args` in the sandbox and collect its output.
    async fn run(
        &self,
        interpreter: &Path,
        args: &[&str],
        preload: Option<&OsStr>,
    ) -> Result<Output, ProbeError> {
        let scratch = self.scratch.path().map_err(ProbeError::Scratch)?;
        let mut cmd = sandboxed_command(interpreter, args, scratch, preload);

        let output = tokio::time::timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| ProbeError::Timeout(self.timeout))??;
        if !output.status.success() {
            return Err(ProbeError::Failed(output.status));
        }
        Ok(output)
    }

    async fn try_probe_api(&self, interpreter: &Path) -> Result<ApiVersion, ProbeError> {
        let output = self.run(interpreter, &["-e", API_CHUNK], None).await?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_api(&stdout).ok_or_else(|| ProbeError::NoVersion(stdout.trim().to_string()))
    }

    async fn try_probe_release(&self, interpreter: &Path) -> Result<Version, ProbeError> {
        let output = self.run(interpreter, &["-v"], None).await?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        parse_release(&stdout)
            .or_else(|| parse_release(&stderr))
            .ok_or_else(|| ProbeError::NoVersion(format!("{}{}", stdout.trim(), stderr.trim())))
    }

    async fn try_trial_preload(
        &self,
        interpreter: &Path,
        library: &Path,
    ) -> Result<bool, ProbeError> {
        let chunk = format!("io.write(\"{PRELOAD_SENTINEL}\")");
        let output = self
            .run(interpreter, &["-e", &chunk], Some(library.as_os_str()))
            .await?;
        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        Ok(combined.trim() == PRELOAD_SENTINEL)
    }
}

#[async_trait]
impl InterpreterProbePort for ProcessProbe {
    async fn probe_api(&self, interpreter: &Path) -> ApiVersion {
        match self.try_probe_api(interpreter).await {
            Ok(api) => {
                debug!(interpreter = %interpreter.display(), %api, "Probed API version");
                api
            }
            Err(e) => {
                debug!(interpreter = %interpreter.display(), error = %e, "API probe failed");
                ApiVersion::ZERO
            }
        }
    }

    async fn probe_release(&self, interpreter: &Path) -> Version {
        match self.try_probe_release(interpreter).await {
            Ok(release) => {
                debug!(interpreter = %interpreter.display(), %release, "Probed release");
                release
            }
            Err(e) => {
                debug!(interpreter = %interpreter.display(), error = %e, "Release probe failed");
                Version::ZERO
            }
        }
    }

    async fn trial_preload(&self, interpreter: &Path, library: &Path) -> bool {
        self.try_trial_preload(interpreter, library)
            .await
            .unwrap_or_else(|e| {
                debug!(
                    interpreter = %interpreter.display(),
                    library = %library.display(),
                    error = %e,
                    "Preload trial failed"
                );
                false
            })
    }
}

/// Build a sandboxed probe invocation: scrubbed Lua variables, `cwd` as the
/// working directory, no stdin, captured output.
pub(crate) fn sandboxed_command(
    interpreter: &Path,
    args: &[&str],
    cwd: &Path,
    preload: Option<&OsStr>,
) -> Command {
    let mut cmd = Command::new(interpreter);
    cmd.args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    for var in SCRUBBED_VARS {
        cmd.env_remove(var);
        for suffix in VERSIONED_SUFFIXES {
            cmd.env_remove(format!("{var}{suffix}"));
        }
    }
    if let Some(library) = preload {
        cmd.env("LD_PRELOAD", library);
    }
    cmd
}

/// Keep at most `major.minor.patch` of a dotted number.
fn first_three_components(token: &str) -> String {
    token.split('.').take(3).collect::<Vec<_>>().join(".")
}

/// Extract the API generation from `_VERSION` output (`Lua 5.3` -> `5.3`).
///
/// Only a number following the word `Lua` counts; output from anything else
/// yields `None`. The first such number wins.
pub fn parse_api(output: &str) -> Option<ApiVersion> {
    let token = API_BANNER.captures(output)?.get(1)?.as_str();
    let version = Version::parse_saturating(&first_three_components(token)).ok()?;
    Some(version.api())
}

/// Extract the release from `-v` output (`Lua 5.3.6  Copyright ...`).
pub fn parse_release(output: &str) -> Option<Version> {
    output.lines().find_map(|line| {
        let captures = RELEASE_BANNER.captures(line)?;
        Version::parse_saturating(captures.get(1)?.as_str()).ok()
    })
}
