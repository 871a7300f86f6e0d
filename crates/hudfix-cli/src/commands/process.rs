//! Process command implementation

use std::path::Path;

use colored::Colorize;
use hudfix_core::{BackupStatus, BackupStore, Stage, WorkflowResult};

use crate::context::RunContext;
use crate::error::Result;
use crate::interactive;

/// Options for one process run; `None` falls back to settings.
#[derive(Debug, Clone, Default)]
pub struct ProcessOptions<'a> {
    pub pattern: Option<&'a str>,
    pub resolution: Option<&'a str>,
    pub yes: bool,
}

/// Run the process command.
///
/// Returns `None` when the user declined the confirmation prompt.
pub fn run_process(
    ctx: &RunContext,
    root: &Path,
    options: &ProcessOptions<'_>,
) -> Result<Option<WorkflowResult>> {
    let pattern = options.pattern.unwrap_or(ctx.settings.pattern.as_str());
    let resolution = options
        .resolution
        .map(str::to_string)
        .unwrap_or_else(|| ctx.settings.resolution.to_string());

    if !options.yes && !interactive::confirm_process(root, &ctx.store.root().to_native())? {
        println!("{}", "Aborted; nothing was changed.".yellow());
        return Ok(None);
    }

    let outcome = ctx
        .coordinator()
        .process_with(root, pattern, &resolution, &mut print_stage);
    report_status(&outcome, &ctx.store);
    let result = outcome?;
    println!("{} {}", "OK".green().bold(), result);
    Ok(Some(result))
}

/// Print what the backup offers now that a run finished with `outcome`.
pub(crate) fn report_status<T>(outcome: &hudfix_core::Result<T>, store: &BackupStore) -> BackupStatus {
    let status = BackupStatus::after(outcome, store);
    println!("{} {}", "Status:".dimmed(), status.label());
    status
}

pub(crate) fn print_stage(stage: Stage) {
    if stage != Stage::Report {
        println!("{} {}", "::".dimmed(), stage.message());
    }
}
