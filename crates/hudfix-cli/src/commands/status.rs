//! Status command implementation

use colored::Colorize;
use hudfix_core::{BackupStatus, SnapshotManifest};
use serde::Serialize;

use crate::context::RunContext;
use crate::error::Result;

/// Machine-readable status for `--json`.
#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub status: BackupStatus,
    pub backup_dir: String,
    /// Whether the backup finished; absent when there is no backup
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complete: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<SnapshotManifest>,
}

impl StatusReport {
    pub fn collect(ctx: &RunContext) -> Result<Self> {
        let status = BackupStatus::derive(&ctx.store);
        let snapshot = if status.can_revert() {
            ctx.store.manifest()?
        } else {
            None
        };
        Ok(Self {
            status,
            backup_dir: ctx.store.root().to_string(),
            complete: status.can_revert().then_some(snapshot.is_some()),
            snapshot,
        })
    }
}

/// Run the status command
pub fn run_status(ctx: &RunContext, json: bool) -> Result<()> {
    let report = StatusReport::collect(ctx)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", "Backup Status".bold());
    println!();
    println!("{}:  {}", "Backup".dimmed(), report.backup_dir);

    let label = match report.status {
        BackupStatus::BackupPresent => report.status.label().green(),
        _ => report.status.label().yellow(),
    };
    println!("{}:  {}", "Status".dimmed(), label);

    match (&report.snapshot, report.complete) {
        (Some(snapshot), _) => {
            println!("{}:  {}", "Taken".dimmed(), snapshot.created.to_rfc3339());
            println!("{}:  {}", "From".dimmed(), snapshot.collection_root);
            println!("{}:  {}", "Width".dimmed(), snapshot.target_resolution);
            println!("{}:", "Archives".bold());
            for record in &snapshot.archives {
                println!("  {} {}", "+".green(), record.relpath.cyan());
            }
            println!();
            println!("Run {} to restore them.", "hudfix revert --root <dir>".cyan());
        }
        (None, Some(false)) => {
            println!(
                "{}: the backup was interrupted before it finished",
                "Warning".yellow().bold()
            );
        }
        _ => {
            println!();
            println!("Run {} to back up and transform.", "hudfix process --root <dir>".cyan());
        }
    }
    Ok(())
}
