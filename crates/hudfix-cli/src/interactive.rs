//! Confirmation prompts for destructive commands
//!
//! Uses dialoguer when attached to a terminal. Without one, commands must
//! be given `--yes`.

use std::io::IsTerminal;
use std::path::Path;

use colored::Colorize;
use dialoguer::Confirm;

use crate::error::{CliError, Result};

/// Ask before archives under `root` are rewritten in place.
pub fn confirm_process(root: &Path, backup: &Path) -> Result<bool> {
    println!(
        "{} Archives under {} will be modified in place.",
        "!".yellow().bold(),
        root.display().to_string().cyan()
    );
    println!(
        "  Originals are backed up to {}; any previous backup there is replaced.",
        backup.display().to_string().cyan()
    );
    confirm("Continue?")
}

/// Ask before the backup is deleted.
pub fn confirm_discard(backup: &Path) -> Result<bool> {
    println!(
        "{} The backup at {} will be deleted; revert will no longer be possible.",
        "!".yellow().bold(),
        backup.display().to_string().cyan()
    );
    confirm("Delete the backup?")
}

fn confirm(prompt: &str) -> Result<bool> {
    if !std::io::stdin().is_terminal() {
        return Err(CliError::user(
            "refusing to continue without confirmation; pass --yes to skip the prompt",
        ));
    }
    Ok(Confirm::new().with_prompt(prompt).default(false).interact()?)
}
