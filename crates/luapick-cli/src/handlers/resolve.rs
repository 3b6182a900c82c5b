//! Resolve command handler.
//!
//! Prints the selected interpreter in one of three formats.

use anyhow::{Context, Result};
use luapick_core::{PreloadDecision, Resolution};
use luapick_runtime::{detect_os, resolve_interpreter};

use crate::commands::OutputFormat;
use crate::config::Settings;
use crate::error::CliError;
use crate::handlers::emit;

/// Execute the resolve command.
///
/// # Errors
///
/// Returns a [`CliError`] when no interpreter qualifies or a required
/// preload library cannot be found.
pub async fn execute(settings: &Settings, format: OutputFormat) -> Result<()> {
    let request = settings.request(detect_os());
    let resolution = resolve_interpreter(&request, settings.probe_timeout)
        .await
        .map_err(CliError::from)?;
    emit(std::io::stdout().lock(), &render(&resolution, format)?)?;
    Ok(())
}

/// Format a resolution for stdout.
pub fn render(resolution: &Resolution, format: OutputFormat) -> Result<String> {
    let interpreter = &resolution.interpreter;
    let text = match format {
        OutputFormat::Text => {
            let mut lines = vec![interpreter.path.display().to_string()];
            if let PreloadDecision::Preload(library) = &resolution.preload {
                lines.push(library.display().to_string());
            }
            lines.join("\n")
        }
        OutputFormat::Json => {
            serde_json::to_string_pretty(resolution).context("Failed to serialize resolution")?
        }
        OutputFormat::Shell => {
            let mut lines = vec![
                assignment("LUAPICK_INTERPRETER", &interpreter.path.display().to_string()),
                assignment("LUAPICK_FAMILY", &interpreter.family.to_string()),
                assignment("LUAPICK_API", &interpreter.api.to_string()),
                assignment("LUAPICK_RELEASE", &interpreter.release.to_string()),
            ];
            if let PreloadDecision::Preload(library) = &resolution.preload {
                // Prepend to whatever the launching shell already preloads.
                lines.push(format!(
                    "{}\"${{LD_PRELOAD:+:$LD_PRELOAD}}\"",
                    assignment("LD_PRELOAD", &library.display().to_string())
                ));
            }
            lines.join("\n")
        }
    };
    Ok(text)
}

/// `NAME='value'`, safe to `eval` in a POSIX shell.
fn assignment(name: &str, value: &str) -> String {
    format!("{name}='{}'", value.replace('\'', r"'\''"))
}
