//! Revert command implementation

use std::path::Path;

use colored::Colorize;
use hudfix_core::{RevertReport, Stage};

use crate::commands::process::{print_stage, report_status};
use crate::context::RunContext;
use crate::error::Result;

/// Run the revert command, optionally discarding the backup afterwards.
pub fn run_revert(ctx: &RunContext, root: &Path, discard: bool) -> Result<RevertReport> {
    let coordinator = ctx.coordinator();

    print_stage(Stage::Revert);
    let outcome = coordinator.revert(root);
    if outcome.is_err() || !discard {
        report_status(&outcome, &ctx.store);
    }
    let report = outcome?;
    println!("{} {}", "OK".green().bold(), report);

    if discard {
        print_stage(Stage::DiscardStale);
        let discarded = coordinator.discard();
        report_status(&discarded, &ctx.store);
        discarded?;
        println!("{} Backup discarded", "OK".green().bold());
    }
    Ok(report)
}
