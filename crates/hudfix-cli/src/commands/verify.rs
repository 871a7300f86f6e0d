//! Verify command implementation

use colored::Colorize;

use crate::context::RunContext;
use crate::error::{CliError, Result};

/// Run the verify command; a backup that does not match is an error.
pub fn run_verify(ctx: &RunContext, json: bool) -> Result<()> {
    let report = ctx.store.verify()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for relpath in &report.verified {
            println!("  {} {}", "ok".green(), relpath);
        }
        for relpath in &report.mismatched {
            println!("  {} {}", "changed".red(), relpath);
        }
        for relpath in &report.missing {
            println!("  {} {}", "missing".red(), relpath);
        }
    }

    if report.is_clean() {
        if !json {
            println!("{} {} files match", "OK".green().bold(), report.verified.len());
        }
        Ok(())
    } else {
        Err(CliError::user(format!(
            "backup does not match its snapshot: {} changed, {} missing",
            report.mismatched.len(),
            report.missing.len()
        )))
    }
}
