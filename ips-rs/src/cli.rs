//! Root CLI structure for ips-rs

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ips-rs")]
#[command(about = "Apply and inspect IPS binary patches", long_about = None)]
#[command(version)]
#[command(author)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Apply a patch to a ROM, writing a new file
    Apply {
        /// Path to the ROM (base image); it is never modified
        rom: PathBuf,

        /// Path to the IPS patch
        patch: PathBuf,

        /// Where to write the patched ROM (default: <name>.patched.<ext> next to the ROM)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Marker inserted before the extension when no output path is given
        #[arg(long, default_value = ips_patch::fs::DEFAULT_OUTPUT_MARKER, conflicts_with = "output")]
        marker: String,

        /// Apply in memory and report, without writing anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Display information about a patch
    Info {
        /// Path to the IPS patch
        patch: PathBuf,

        /// List every record
        #[arg(long)]
        records: bool,
    },

    /// Check that a patch decodes completely
    Validate {
        /// Path to the IPS patch
        patch: PathBuf,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
