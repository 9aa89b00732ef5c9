use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// dirsize - Sorted directory sizes with interactive drill-down and deletion
#[derive(Parser, Debug)]
#[command(name = "dirsize")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the size of every entry in a directory, largest first
    Scan(ScanArgs),

    /// Browse directory sizes interactively
    Tui(TuiArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Directory to analyze
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Show top N entries by size (0 = all)
    #[arg(short = 'n', long, value_name = "N")]
    pub top: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct TuiArgs {
    /// Starting directory
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Delete without asking for confirmation
    #[arg(long)]
    pub no_confirm: bool,
}
