//! List command handler.
//!
//! Probes every interpreter on PATH and shows how each one fares against the
//! active constraints. The row marked `*` is what `resolve` would pick.

use anyhow::Result;
use luapick_core::{Rejection, SurveyEntry};
use luapick_runtime::survey_path;

use crate::config::Settings;
use crate::handlers::emit;

const TABLE_WIDTH: usize = 90;

/// Execute the list command.
pub async fn execute(settings: &Settings) -> Result<()> {
    let entries = survey_path(&settings.constraints, settings.probe_timeout).await;

    let out = std::io::stdout().lock();
    if entries.is_empty() {
        emit(out, "No Lua interpreters found on PATH.")?;
        return Ok(());
    }

    let mut lines = vec![
        format!("Constraints: {}\n", settings.constraints),
        format!(
            "  {:<10} {:<6} {:<10} {:<26} Path",
            "Family", "API", "Release", "Status"
        ),
        "-".repeat(TABLE_WIDTH),
    ];
    lines.extend(entries.iter().map(format_row));
    emit(out, &lines.join("\n"))?;
    Ok(())
}

fn status(verdict: Result<(), Rejection>) -> String {
    match verdict {
        Ok(()) => "ok".to_string(),
        Err(rejection) => rejection.to_string(),
    }
}

fn format_row(entry: &SurveyEntry) -> String {
    let candidate = &entry.candidate;
    let marker = if entry.selected { '*' } else { ' ' };
    format!(
        "{marker} {:<10} {:<6} {:<10} {:<26} {}",
        candidate.family.to_string(),
        candidate.api.to_string(),
        candidate.release.to_string(),
        status(entry.verdict),
        candidate.path.display()
    )
}
