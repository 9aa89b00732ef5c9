use anyhow::Result;
use clap::Parser;

use dirsize::cli::{Cli, Command};
use dirsize::commands;
use dirsize::config::Config;
use dirsize::DirsizeError;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // stderr shares the alternate screen in TUI mode
    let interactive = matches!(cli.command, Command::Tui(_));
    init_logging(cli.verbose, cli.quiet, interactive);

    // Load configuration
    let config = Config::load(cli.config.as_deref())?;

    tracing::debug!(?config, "Loaded configuration");

    // Dispatch to subcommand
    match cli.command {
        Command::Scan(args) => {
            tracing::info!(?args, "Starting scan");
            commands::scan::run(args, &config.scan, cli.quiet)?;
        }
        Command::Tui(args) => {
            tracing::info!(?args, "Starting TUI");
            let root = args.path.canonicalize()?;
            if !root.is_dir() {
                return Err(DirsizeError::InvalidPath(format!(
                    "{} is not a directory",
                    root.display()
                ))
                .into());
            }
            let mut tui_config = config.tui.clone();
            if args.no_confirm {
                tui_config.confirm_delete = false;
            }
            dirsize::tui::run(root, &tui_config)?;
        }
        Command::Completions(args) => {
            commands::completions::run(args);
        }
    }

    Ok(())
}

fn init_logging(verbosity: u8, quiet: bool, interactive: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let level = if interactive {
        "off"
    } else if quiet {
        "error"
    } else {
        match verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("dirsize={}", level)));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
