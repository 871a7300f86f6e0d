//! Discard command implementation

use colored::Colorize;

use crate::context::RunContext;
use crate::error::Result;
use crate::interactive;

/// Run the discard command. Returns whether the backup was deleted.
pub fn run_discard(ctx: &RunContext, yes: bool) -> Result<bool> {
    let backup = ctx.store.root().to_native();
    if !ctx.store.has_contents() {
        println!("{} No backup at {}", "-".dimmed(), backup.display());
        return Ok(false);
    }
    if !yes && !interactive::confirm_discard(&backup)? {
        println!("{}", "Aborted; the backup was kept.".yellow());
        return Ok(false);
    }

    ctx.coordinator().discard()?;
    println!("{} Backup discarded", "OK".green().bold());
    Ok(true)
}
