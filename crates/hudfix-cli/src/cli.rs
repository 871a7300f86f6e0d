//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// hudfix - Re-anchor HUD layouts to the central monitor, with backup and revert
#[derive(Parser, Debug)]
#[command(name = "hudfix")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Settings file (default: ./hudfix.toml, then the user config directory)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Backup directory (overrides the settings file)
    #[arg(long, global = true, env = "HUDFIX_BACKUP_DIR", value_name = "DIR")]
    pub backup_dir: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Back up and transform every layout entry under the pattern
    ///
    /// Any previous backup is discarded first. Archives are rewritten in
    /// place; use `hudfix revert` to restore them.
    ///
    /// Examples:
    ///   hudfix process --root "C:/Games/Game"
    ///   hudfix process --root ./game --resolution 2560 --yes
    Process {
        /// Root directory of the archive collection
        #[arg(long, value_name = "DIR")]
        root: PathBuf,

        /// Search pattern selecting the entries (default from settings)
        #[arg(long)]
        pattern: Option<String>,

        /// Width of a single monitor in pixels (default from settings)
        #[arg(short, long, allow_hyphen_values = true)]
        resolution: Option<String>,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Restore archives from the backup
    Revert {
        /// Root directory of the archive collection
        #[arg(long, value_name = "DIR")]
        root: PathBuf,

        /// Discard the backup after a successful revert
        #[arg(long)]
        discard: bool,
    },

    /// Delete the backup
    Discard {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show whether a backup is present
    Status {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Check the backup against the checksums recorded when it was taken
    Verify {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    ///
    /// Examples:
    ///   hudfix completions bash > ~/.local/share/bash-completion/completions/hudfix
    ///   hudfix completions zsh > ~/.zfunc/_hudfix
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
