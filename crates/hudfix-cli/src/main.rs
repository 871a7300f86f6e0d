//! hudfix CLI
//!
//! Backs up, re-anchors and restores the HUD layout entries of a packed
//! archive collection.

mod cli;
mod commands;
mod context;
mod error;
mod interactive;

use std::io;
use std::path::Path;

use clap::{CommandFactory, Parser};
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use commands::process::ProcessOptions;
use context::RunContext;
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing if verbose
    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .with_writer(io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .map_err(|e| CliError::user(format!("failed to set up logging: {e}")))?;
        tracing::debug!("Verbose mode enabled");
    }

    match cli.command {
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(shell, &mut Cli::command(), "hudfix", &mut io::stdout());
            Ok(())
        }
        Some(cmd) => {
            let ctx = RunContext::load(cli.config.as_deref(), cli.backup_dir)?;
            execute_command(&ctx, cmd)
        }
        None => {
            // No command provided - show help hint
            println!("{} HUD layout fixer", "hudfix".green().bold());
            println!();
            println!("Run {} for available commands.", "hudfix --help".cyan());
            Ok(())
        }
    }
}

fn execute_command(ctx: &RunContext, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Process {
            root,
            pattern,
            resolution,
            yes,
        } => cmd_process(ctx, &root, pattern.as_deref(), resolution.as_deref(), yes),
        Commands::Revert { root, discard } => {
            commands::run_revert(ctx, &root, discard).map(|_| ())
        }
        Commands::Discard { yes } => commands::run_discard(ctx, yes).map(|_| ()),
        Commands::Status { json } => commands::run_status(ctx, json),
        Commands::Verify { json } => commands::run_verify(ctx, json),
        Commands::Completions { .. } => Ok(()),
    }
}

fn cmd_process(
    ctx: &RunContext,
    root: &Path,
    pattern: Option<&str>,
    resolution: Option<&str>,
    yes: bool,
) -> Result<()> {
    let options = ProcessOptions {
        pattern,
        resolution,
        yes,
    };
    commands::run_process(ctx, root, &options).map(|_| ())
}
