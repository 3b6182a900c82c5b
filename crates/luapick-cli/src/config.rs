//! Merging command-line flags and environment variables into a resolution
//! request.
//!
//! Each range setting can come from a flag or from a `LUAPICK_*` variable.
//! The flag normally wins; a value written with a leading `!` is locked and
//! wins over an unlocked value from the other source.

use luapick_core::{Constraints, OsIdentity, RangeSpec, ResolveRequest};
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

use crate::error::CliError;
use crate::parser::Cli;

pub const ENV_LUA: &str = "LUAPICK_LUA";
pub const ENV_LUAJIT: &str = "LUAPICK_LUAJIT";
pub const ENV_API: &str = "LUAPICK_API";

/// Everything a command needs to run a resolution.
#[derive(Debug, Clone)]
pub struct Settings {
    pub constraints: Constraints,
    pub interpreter: Option<PathBuf>,
    pub preload: bool,
    pub probe_timeout: Duration,
}

impl Settings {
    /// Build settings from parsed flags and an environment lookup.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Config`] if any range, from either source, is
    /// malformed or inverted.
    pub fn from_cli<F>(cli: &Cli, env: F) -> Result<Self, CliError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| env(name).filter(|value| !value.trim().is_empty());

        let release = merge(cli.lua.as_deref(), lookup(ENV_LUA));
        let jit = merge(cli.luajit.as_deref(), lookup(ENV_LUAJIT));
        let api = merge(cli.api.as_deref(), lookup(ENV_API));

        let constraints = Constraints::from_specs(
            release.as_ref(),
            jit.as_ref(),
            api.as_ref(),
            cli.no_luajit,
            cli.luajit_only,
        )?;
        debug!(%constraints, "Effective constraints");

        Ok(Self {
            constraints,
            interpreter: cli.interpreter.clone(),
            preload: cli.pthread,
            probe_timeout: Duration::from_secs(cli.probe_timeout),
        })
    }

    /// Settings from the process environment.
    pub fn from_process_env(cli: &Cli) -> Result<Self, CliError> {
        Self::from_cli(cli, |name| std::env::var(name).ok())
    }

    pub fn request(&self, os: OsIdentity) -> ResolveRequest {
        ResolveRequest {
            constraints: self.constraints,
            interpreter: self.interpreter.clone(),
            preload: self.preload,
            os,
        }
    }
}

fn merge(flag: Option<&str>, env: Option<String>) -> Option<RangeSpec> {
    RangeSpec::prefer(flag.map(RangeSpec::parse), env.as_deref().map(RangeSpec::parse))
}
