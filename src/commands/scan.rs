//! Scan command implementation

use std::path::Path;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::cli::ScanArgs;
use crate::config::ScanConfig;
use crate::error::Result;
use crate::fs::{normalize, OsFileSystem};
use crate::scanner::{
    format_json, format_size, format_table, scan_top_level, total_size, FormatOptions,
};

/// Run the scan command
pub fn run(args: ScanArgs, config: &ScanConfig, quiet: bool) -> Result<()> {
    let json = args.json || config.json;
    let top = args.top.unwrap_or(config.top);
    let path = normalize(&args.path);

    tracing::info!(path = %path.display(), "Scanning directory");

    let spinner = if quiet { None } else { Some(scan_spinner(&path)) };
    let scanned = scan_top_level(&OsFileSystem, &path);
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let entries = scanned?;

    let format_options = FormatOptions::new().with_top_n(top);

    if json {
        println!("{}", format_json(&entries, &format_options, true)?);
        return Ok(());
    }

    print!("{}", format_table(&entries, &format_options));

    let partial = entries.iter().filter(|e| e.is_partial()).count();
    println!();
    println!(
        "Total: {} in {} entries",
        format_size(total_size(&entries)),
        entries.len()
    );
    if partial > 0 && !quiet {
        println!("[!] {} entries could only be partially read", partial);
    }

    Ok(())
}

/// Spinner on stderr; hidden when stderr is not a terminal.
fn scan_spinner(path: &Path) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg} ({elapsed})")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("Scanning {}", path.display()));
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
