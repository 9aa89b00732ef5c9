use serde::Serialize;

use super::entry::ScanEntry;
use super::size::format_size;

/// Format options for listing output
#[derive(Debug, Clone, Default)]
pub struct FormatOptions {
    /// Show only the N largest entries
    pub top_n: Option<usize>,
}

impl FormatOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit output to `n` entries; 0 means no limit.
    pub fn with_top_n(mut self, n: usize) -> Self {
        self.top_n = if n == 0 { None } else { Some(n) };
        self
    }

    fn shown<'a>(&self, entries: &'a [ScanEntry]) -> &'a [ScanEntry] {
        match self.top_n {
            Some(n) if n < entries.len() => &entries[..n],
            _ => entries,
        }
    }
}

/// Format a sorted listing as aligned `size | kind | path` rows.
pub fn format_table(entries: &[ScanEntry], options: &FormatOptions) -> String {
    let mut output = String::new();
    let shown = options.shown(entries);

    for entry in shown {
        let warning_indicator = if entry.is_partial() { " [!]" } else { "" };
        output.push_str(&format!(
            "{:>14} | {:<4} | {}{}\n",
            format_size(entry.size),
            entry.kind.to_string(),
            entry.path.display(),
            warning_indicator
        ));
    }

    let hidden = entries.len() - shown.len();
    if hidden > 0 {
        output.push_str(&format!("... and {} more\n", hidden));
    }

    output
}

#[derive(Serialize)]
struct JsonListing<'a> {
    total: u64,
    entries: &'a [ScanEntry],
}

/// Format a sorted listing as JSON with a total.
pub fn format_json(entries: &[ScanEntry], options: &FormatOptions, pretty: bool) -> serde_json::Result<String> {
    let listing = JsonListing {
        total: total_size(entries),
        entries: options.shown(entries),
    };

    if pretty {
        serde_json::to_string_pretty(&listing)
    } else {
        serde_json::to_string(&listing)
    }
}

/// Sum of all entry sizes.
pub fn total_size(entries: &[ScanEntry]) -> u64 {
    entries.iter().map(|e| e.size).sum()
}
