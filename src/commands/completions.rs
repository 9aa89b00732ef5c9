//! Completions command implementation

use clap::CommandFactory;

use crate::cli::{Cli, CompletionsArgs};

/// Write completions for the requested shell to stdout
pub fn run(args: CompletionsArgs) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(args.shell, &mut cmd, name, &mut std::io::stdout());
}
