//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "codex")]
#[command(
    about = "Compile pipe-delimited rules tables into per-faction JSON documents",
    long_about = None
)]
pub(crate) struct Cli {
    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write log output to a file (ANSI codes stripped)
    #[arg(long, global = true)]
    pub logfile: Option<PathBuf>,

    /// Read settings from this file instead of the default config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Directory overrides shared by commands that touch the output.
#[derive(Args, Clone, Default)]
pub(crate) struct OutputArgs {
    /// Directory faction documents are written to and read from
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// File name of the summary document
    #[arg(long)]
    pub summary_file: Option<String>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Compile the source tables into faction documents
    Compile {
        /// Directory holding the source tables
        #[arg(short, long)]
        source: Option<PathBuf>,

        #[command(flatten)]
        output: OutputArgs,

        /// Do not recover unit images from documents already in the output
        #[arg(long)]
        no_preserve: bool,

        /// Compile and report without writing any documents
        #[arg(short = 'n', long)]
        dry_run: bool,
    },

    /// List the factions in the summary document
    Factions {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show effective settings and their sources
    Show,

    /// Print the config file path
    Path,
}
